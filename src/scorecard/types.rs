use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rating data for one course/tee combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Course {
    pub course_name: String,
    pub course_rating: f64,
    pub slope_rating: i32,
    #[serde(default)]
    pub par: Option<u32>,
    #[serde(default)]
    pub yardage: Option<u32>,
    #[serde(default)]
    pub tee: Option<String>,
}

/// A scorecard as recorded, before it is joined to its course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScorecardEntry {
    #[serde(default)]
    pub player: Option<String>,
    pub date: NaiveDate,
    pub course_name: String,
    pub gross_score: i32,
    /// Differential carried over from an upstream store. Only compared, never used.
    #[serde(default)]
    pub stored_differential: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScorecardFile {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub rounds: Vec<ScorecardEntry>,
}
