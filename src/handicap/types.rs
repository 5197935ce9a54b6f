use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single played round, already joined to the rating of the tee it was played from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub date: NaiveDate,
    pub course_name: String,
    pub gross_score: i32,
    pub course_rating: f64,
    pub slope_rating: i32,
    /// Display-only; the engine never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tee: Option<String>,
}

impl Round {
    pub fn new(
        date: NaiveDate,
        course_name: impl Into<String>,
        gross_score: i32,
        course_rating: f64,
        slope_rating: i32,
    ) -> Self {
        Self {
            date,
            course_name: course_name.into(),
            gross_score,
            course_rating,
            slope_rating,
            player: None,
            tee: None,
        }
    }
}

/// A round with its recomputed differential and whether it counted toward the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRound {
    pub round: Round,
    pub differential: f64,
    pub used: bool,
}

/// Best-k selection over a set of rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// All rounds, ascending by differential, ties in input order.
    pub ranked: Vec<RankedRound>,
    /// Number of leading entries in `ranked` that are used.
    pub used_count: usize,
}

impl Selection {
    pub fn used(&self) -> &[RankedRound] {
        &self.ranked[..self.used_count]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandicapResult {
    pub handicap_index: f64,
    pub total_rounds_considered: usize,
    pub differentials_used_count: usize,
    pub rounds_used: Vec<RankedRound>,
    pub all_rounds_ranked: Vec<RankedRound>,
}

impl HandicapResult {
    /// Mean of the used differentials, before the 0.96 multiplier and rounding.
    pub fn average_differential(&self) -> f64 {
        if self.rounds_used.is_empty() {
            return 0.0;
        }
        self.rounds_used.iter().map(|r| r.differential).sum::<f64>()
            / self.rounds_used.len() as f64
    }
}
