use thiserror::Error;

/// Rejection of malformed input handed to the ledger.
///
/// This is the only failure the aggregator itself reports; lookups of unknown
/// ids resolve to zero, no-op or empty results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity} {field} must not be empty")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("amount `{0}` is not a finite number")]
    NonFiniteAmount(String),
    #[error("duplicate {entity} id `{id}`")]
    DuplicateId { entity: &'static str, id: String },
    #[error("malformed amount `{0}`")]
    MalformedAmount(String),
    #[error("rating {0} is outside the 0-5 range")]
    RatingOutOfRange(u8),
    #[error("amount `{0}` would push the ledger totals out of range")]
    AmountOutOfRange(String),
}

impl ValidationError {
    pub(crate) fn empty(entity: &'static str, field: &'static str) -> Self {
        Self::EmptyField { entity, field }
    }
}

/// Error type for the I/O facing surfaces around the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(String),
}
