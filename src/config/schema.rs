use serde::{Deserialize, Serialize};

use crate::handicap::TierBucket;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// scorecards: ~/golf/scorecards.yaml
/// recent_rounds: 20
/// tiers:
///   - { range: ">=16", use: 8 }
///   - { range: "5-15", use: 1 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Scorecard file; a leading `~/` expands to the home directory
    #[serde(default)]
    pub scorecards: Option<String>,

    /// How many of the most recent rounds are considered (default: 20)
    #[serde(default)]
    pub recent_rounds: Option<usize>,

    /// Replaces the standard tier table when present
    #[serde(default)]
    pub tiers: Option<Vec<TierBucket>>,
}
