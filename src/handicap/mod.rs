pub mod engine;
pub mod error;
pub mod tiers;
pub mod types;
pub mod validation;

pub use engine::{
    compute_differential, compute_handicap_index, round_to_tenth, select_best_differentials,
    HandicapEngine, INDEX_MULTIPLIER, MIN_ROUNDS, STANDARD_SLOPE,
};
pub use error::{HandicapError, Result};
pub use tiers::{RangeOp, TierBucket, TierTable, MAX_DIFFERENTIALS};
pub use types::{HandicapResult, RankedRound, Round, Selection};
pub use validation::validate_tiers;
