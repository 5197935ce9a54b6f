use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandicapError {
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Insufficient data: {rounds} rounds supplied, at least {required} required")]
    InsufficientData { rounds: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, HandicapError>;

impl HandicapError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        HandicapError::InvalidInput {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
