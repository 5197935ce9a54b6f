use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::types::{Course, ScorecardFile};
use crate::handicap::{compute_differential, Round};

/// Number of recent rounds considered when no limit is configured.
pub const DEFAULT_RECENT_ROUNDS: usize = 20;

/// Largest tolerated gap between a stored and a recomputed differential.
const STORED_DIFFERENTIAL_TOLERANCE: f64 = 0.05;

/// Load a scorecard file. `.json` files are parsed as JSON, anything else as YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_scorecards(path: &Path) -> Result<ScorecardFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scorecard file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let file: ScorecardFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scorecards: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse scorecards: invalid YAML in {}", path.display()))?
    };

    debug!(
        courses = file.courses.len(),
        rounds = file.rounds.len(),
        "loaded scorecards from {}",
        path.display()
    );

    Ok(file)
}

impl ScorecardFile {
    /// Distinct player names in first-seen order. Rounds without a player are skipped.
    pub fn players(&self) -> Vec<String> {
        let mut players: Vec<String> = Vec::new();
        for entry in &self.rounds {
            if let Some(ref name) = entry.player {
                if !players.iter().any(|p| p == name) {
                    players.push(name.clone());
                }
            }
        }
        players
    }

    /// Join every scorecard to its course and return the rounds of the
    /// matching player(s), in file order.
    ///
    /// The player filter is a case-insensitive substring match; `None` keeps
    /// every round. A scorecard naming an unknown course fails the whole call.
    pub fn rounds_for(&self, player: Option<&str>) -> Result<Vec<Round>> {
        let courses = self.course_index()?;
        let needle = player.map(str::to_lowercase);

        let mut rounds = Vec::new();
        for (i, entry) in self.rounds.iter().enumerate() {
            if let Some(ref needle) = needle {
                let matched = entry
                    .player
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(needle.as_str()));
                if !matched {
                    continue;
                }
            }

            let Some(course) = courses.get(entry.course_name.as_str()) else {
                bail!(
                    "rounds[{}] ({}): unknown course '{}'",
                    i,
                    entry.date,
                    entry.course_name
                );
            };

            let round = Round {
                date: entry.date,
                course_name: entry.course_name.clone(),
                gross_score: entry.gross_score,
                course_rating: course.course_rating,
                slope_rating: course.slope_rating,
                player: entry.player.clone(),
                tee: course.tee.clone(),
            };

            if let Some(stored) = entry.stored_differential {
                check_stored_differential(i, &round, stored);
            }

            rounds.push(round);
        }

        Ok(rounds)
    }

    fn course_index(&self) -> Result<HashMap<&str, &Course>> {
        let mut index = HashMap::with_capacity(self.courses.len());
        for course in &self.courses {
            if index.insert(course.course_name.as_str(), course).is_some() {
                bail!("Duplicate course '{}' in scorecard file", course.course_name);
            }
        }
        Ok(index)
    }
}

/// Returns true when a mismatch warning was logged.
fn check_stored_differential(index: usize, round: &Round, stored: f64) -> bool {
    // Invalid rounds are reported by the engine
    let Ok(recomputed) = compute_differential(round) else {
        return false;
    };
    if (recomputed - stored).abs() <= STORED_DIFFERENTIAL_TOLERANCE {
        return false;
    }
    warn!(
        "rounds[{}] ({}, {}): stored differential {:.2} disagrees with recomputed {:.2}; using recomputed",
        index, round.date, round.course_name, stored, recomputed
    );
    true
}

/// Keep the `limit` most recent rounds, returned oldest first.
///
/// Rounds sharing a date keep their file order; the later entry counts as more recent.
pub fn most_recent(mut rounds: Vec<Round>, limit: usize) -> Vec<Round> {
    rounds.sort_by_key(|r| r.date);
    if rounds.len() > limit {
        let dropped = rounds.len() - limit;
        debug!(dropped, limit, "keeping most recent rounds only");
        rounds = rounds.split_off(dropped);
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_YAML: &str = r#"
courses:
  - course_name: Augusta National Golf Club
    course_rating: 76.2
    slope_rating: 148
    par: 72
    yardage: 7485
  - course_name: Muni
    course_rating: 68.9
    slope_rating: 117
    tee: White
rounds:
  - player: Ada Lovelace
    date: "2025-04-01"
    course_name: Augusta National Golf Club
    gross_score: 85
  - player: Grace Hopper
    date: "2025-04-02"
    course_name: Muni
    gross_score: 92
  - player: Ada Lovelace
    date: "2025-04-08"
    course_name: Muni
    gross_score: 80
    stored_differential: 10.7
"#;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn parse(yaml: &str) -> ScorecardFile {
        serde_saphyr::from_str(yaml).unwrap()
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SAMPLE_YAML.as_bytes()).unwrap();

        let scorecards = load_scorecards(file.path()).unwrap();
        assert_eq!(scorecards.courses.len(), 2);
        assert_eq!(scorecards.rounds.len(), 3);
        assert_eq!(scorecards.courses[0].par, Some(72));
        assert_eq!(scorecards.rounds[2].stored_differential, Some(10.7));
    }

    #[test]
    fn test_load_json_file() {
        let json = r#"{
            "courses": [{"course_name": "Muni", "course_rating": 68.9, "slope_rating": 117}],
            "rounds": [{"date": "2025-04-02", "course_name": "Muni", "gross_score": 92}]
        }"#;
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let scorecards = load_scorecards(file.path()).unwrap();
        assert_eq!(scorecards.rounds[0].gross_score, 92);
        assert!(scorecards.rounds[0].player.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_scorecards(Path::new("/nonexistent/scorecards.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read scorecard file"));
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"courses: []\nrounds: []\nhandicap: 12.0\n").unwrap();
        assert!(load_scorecards(file.path()).is_err());
    }

    #[test]
    fn test_rounds_join_course_ratings() {
        let rounds = parse(SAMPLE_YAML).rounds_for(None).unwrap();
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].course_rating, 76.2);
        assert_eq!(rounds[0].slope_rating, 148);
        assert_eq!(rounds[1].tee.as_deref(), Some("White"));
        assert_eq!(rounds[1].player.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn test_player_filter_is_case_insensitive_substring() {
        let rounds = parse(SAMPLE_YAML).rounds_for(Some("lovelace")).unwrap();
        assert_eq!(rounds.len(), 2);
        assert!(rounds
            .iter()
            .all(|r| r.player.as_deref() == Some("Ada Lovelace")));

        let none = parse(SAMPLE_YAML).rounds_for(Some("nobody")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_unknown_course_fails_whole_load() {
        let yaml = r#"
courses:
  - { course_name: Muni, course_rating: 68.9, slope_rating: 117 }
rounds:
  - { date: "2025-04-02", course_name: Muni, gross_score: 92 }
  - { date: "2025-04-03", course_name: Elsewhere, gross_score: 88 }
"#;
        let err = parse(yaml).rounds_for(None).unwrap_err();
        assert!(err.to_string().contains("unknown course 'Elsewhere'"));
    }

    #[test]
    fn test_duplicate_course_is_rejected() {
        let yaml = r#"
courses:
  - { course_name: Muni, course_rating: 68.9, slope_rating: 117 }
  - { course_name: Muni, course_rating: 70.1, slope_rating: 121 }
"#;
        let err = parse(yaml).rounds_for(None).unwrap_err();
        assert!(err.to_string().contains("Duplicate course"));
    }

    #[test]
    fn test_players_first_seen_order() {
        let players = parse(SAMPLE_YAML).players();
        assert_eq!(players, vec!["Ada Lovelace", "Grace Hopper"]);
    }

    #[test]
    fn test_stored_differential_is_ignored() {
        // Stored 10.7 is stale; the recomputed value is (80 - 68.9) * 113 / 117
        let file = parse(SAMPLE_YAML);
        let rounds = file.rounds_for(Some("ada")).unwrap();
        let diff = compute_differential(&rounds[1]).unwrap();
        assert!((diff - 11.1 * 113.0 / 117.0).abs() < 1e-9);
    }

    #[test]
    fn test_stored_differential_tolerance() {
        let round = Round::new(date(1), "Muni", 80, 68.9, 117);
        let recomputed = 11.1 * 113.0 / 117.0;
        assert!(!check_stored_differential(0, &round, 10.7));
        assert!(!check_stored_differential(0, &round, recomputed + 0.04));
        assert!(!check_stored_differential(0, &round, recomputed - 0.04));
        assert!(check_stored_differential(0, &round, recomputed + 0.06));
        assert!(check_stored_differential(0, &round, 9.0));

        // Nothing to compare against when the round itself is invalid
        let bad = Round::new(date(2), "Muni", 80, 68.9, 0);
        assert!(!check_stored_differential(0, &bad, 99.0));
    }

    #[test]
    fn test_most_recent_keeps_newest() {
        let rounds: Vec<Round> = [5, 1, 9, 3, 7]
            .iter()
            .map(|d| Round::new(date(*d), "Muni", 90, 68.9, 117))
            .collect();

        let recent = most_recent(rounds, 3);
        let days: Vec<NaiveDate> = recent.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![date(5), date(7), date(9)]);
    }

    #[test]
    fn test_most_recent_under_limit_keeps_all() {
        let rounds = vec![
            Round::new(date(2), "Muni", 90, 68.9, 117),
            Round::new(date(1), "Muni", 91, 68.9, 117),
        ];
        let recent = most_recent(rounds, DEFAULT_RECENT_ROUNDS);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date(1));
    }

    #[test]
    fn test_most_recent_same_date_prefers_later_entry() {
        let rounds = vec![
            Round::new(date(1), "Muni", 90, 68.9, 117),
            Round::new(date(1), "Muni", 95, 68.9, 117),
        ];
        let recent = most_recent(rounds, 1);
        assert_eq!(recent[0].gross_score, 95);
    }
}
