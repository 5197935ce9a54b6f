use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Most differentials any tier may use.
pub const MAX_DIFFERENTIALS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(usize),
    LessEqual(usize),
    GreaterThan(usize),
    GreaterEqual(usize),
    Equal(usize),
    Between(usize, usize), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low: usize = parts[0].trim().parse()?;
                let high: usize = parts[1].trim().parse()?;
                if low > high {
                    bail!("Range start {} is above range end {}", low, high);
                }
                Ok(RangeOp::Between(low, high))
            } else {
                bail!("Invalid range format: {}", s)
            }
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: usize) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// One configured tier: a round-count range and the number of differentials it uses.
///
/// Example YAML:
/// ```yaml
/// tiers:
///   - { range: ">=16", use: 8 }
///   - { range: "7-8", use: 3 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierBucket {
    /// Range expression (e.g., "<=4", "7-8", ">=16")
    pub range: String,

    /// Differentials used when the range matches
    #[serde(rename = "use")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<(RangeOp, usize)>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::canonical()
    }
}

impl TierTable {
    /// The WHS-style sliding scale. Fewer than 5 rounds select nothing.
    pub fn canonical() -> Self {
        Self {
            tiers: vec![
                (RangeOp::GreaterEqual(16), 8),
                (RangeOp::Between(14, 15), 6),
                (RangeOp::Between(12, 13), 5),
                (RangeOp::Between(9, 11), 4),
                (RangeOp::Between(7, 8), 3),
                (RangeOp::Equal(6), 2),
                (RangeOp::Equal(5), 1),
                (RangeOp::LessEqual(4), 0),
            ],
        }
    }

    /// Build a table from configured buckets. Run `validate_tiers` first for
    /// per-bucket error messages; this stops at the first bad range.
    pub fn from_buckets(buckets: &[TierBucket]) -> Result<Self> {
        let tiers = buckets
            .iter()
            .map(|b| Ok((RangeOp::parse(&b.range)?, b.count)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tiers })
    }

    /// Number of differentials to use for `total_rounds`. First matching tier
    /// wins; the result never exceeds `total_rounds`.
    pub fn differentials_to_use(&self, total_rounds: usize) -> usize {
        self.tiers
            .iter()
            .find(|(range, _)| range.matches(total_rounds))
            .map(|(_, count)| (*count).min(total_rounds))
            .unwrap_or(0)
    }
}
