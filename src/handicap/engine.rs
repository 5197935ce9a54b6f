use tracing::debug;

use super::error::{HandicapError, Result};
use super::tiers::TierTable;
use super::types::{HandicapResult, RankedRound, Round, Selection};

/// Slope rating of a course of standard difficulty.
pub const STANDARD_SLOPE: f64 = 113.0;

/// Applied to the averaged differentials.
pub const INDEX_MULTIPLIER: f64 = 0.96;

/// Below this many rounds no index exists.
pub const MIN_ROUNDS: usize = 5;

/// Score differential of a single round: `(gross - rating) * 113 / slope`.
///
/// Fails with `InvalidInput` for a zero or negative slope rating, a
/// non-positive course rating, or a non-positive gross score.
pub fn compute_differential(round: &Round) -> Result<f64> {
    if round.slope_rating == 0 {
        return Err(HandicapError::invalid(
            "slope_rating",
            round.slope_rating,
            "must not be zero",
        ));
    }
    if round.slope_rating < 0 {
        return Err(HandicapError::invalid(
            "slope_rating",
            round.slope_rating,
            "must be positive",
        ));
    }
    if !round.course_rating.is_finite() || round.course_rating <= 0.0 {
        return Err(HandicapError::invalid(
            "course_rating",
            round.course_rating,
            "must be a positive number",
        ));
    }
    if round.gross_score <= 0 {
        return Err(HandicapError::invalid(
            "gross_score",
            round.gross_score,
            "must be positive",
        ));
    }

    Ok((f64::from(round.gross_score) - round.course_rating) * STANDARD_SLOPE
        / f64::from(round.slope_rating))
}

/// Round half up (toward positive infinity) to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Select the best differentials using the canonical tier table.
pub fn select_best_differentials(rounds: &[Round]) -> Result<Selection> {
    HandicapEngine::default().select_best_differentials(rounds)
}

/// Compute a Handicap Index using the canonical tier table.
pub fn compute_handicap_index(rounds: &[Round]) -> Result<HandicapResult> {
    HandicapEngine::default().compute_handicap_index(rounds)
}

/// Stateless handicap calculator parameterised by its tier table.
#[derive(Debug, Clone, Default)]
pub struct HandicapEngine {
    tiers: TierTable,
}

impl HandicapEngine {
    pub fn new(tiers: TierTable) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn select_best_differentials(&self, rounds: &[Round]) -> Result<Selection> {
        let mut ranked = rounds
            .iter()
            .map(|round| {
                Ok(RankedRound {
                    differential: compute_differential(round)?,
                    round: round.clone(),
                    used: false,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // sort_by is stable, so equal differentials keep input order
        ranked.sort_by(|a, b| a.differential.total_cmp(&b.differential));

        let used_count = self.tiers.differentials_to_use(ranked.len());
        for entry in ranked.iter_mut().take(used_count) {
            entry.used = true;
        }

        debug!(
            total_rounds = ranked.len(),
            used_count, "selected best differentials"
        );

        Ok(Selection { ranked, used_count })
    }

    pub fn compute_handicap_index(&self, rounds: &[Round]) -> Result<HandicapResult> {
        // Validate every round before judging eligibility
        let selection = self.select_best_differentials(rounds)?;
        let total = selection.ranked.len();

        if total < MIN_ROUNDS || selection.used_count == 0 {
            return Err(HandicapError::InsufficientData {
                rounds: total,
                required: MIN_ROUNDS,
            });
        }

        let used = selection.used();
        let average = used.iter().map(|r| r.differential).sum::<f64>() / used.len() as f64;
        let handicap_index = round_to_tenth(average * INDEX_MULTIPLIER);

        debug!(average, handicap_index, "computed handicap index");

        Ok(HandicapResult {
            handicap_index,
            total_rounds_considered: total,
            differentials_used_count: selection.used_count,
            rounds_used: used.to_vec(),
            all_rounds_ranked: selection.ranked,
        })
    }
}
