use super::{AggregateError, GeoError, PaginationError};

/// The three failure categories a query can surface.
///
/// Everything the validator or the storage translator can report collapses
/// into one of these variants at the dispatch boundary; adapters map them
/// onto their transport's status vocabulary (HTTP: 400 / 422 / 500) without
/// ever inspecting the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum QueryFailure {
    /// Malformed request shape or unsupported parameter combination.
    #[error("{0}")]
    Usage(String),
    /// Well-formed but semantically invalid parameter value.
    #[error("{0}")]
    InvalidParameter(String),
    /// Anything else. The cause is preserved for logging but is never shown
    /// to the caller in detail.
    #[error(transparent)]
    Unexpected(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl QueryFailure {
    /// A usage failure with the given description.
    pub fn usage(description: impl Into<String>) -> Self {
        Self::Usage(description.into())
    }

    /// An invalid-parameter failure with the given description.
    pub fn invalid(description: impl Into<String>) -> Self {
        Self::InvalidParameter(description.into())
    }

    /// An unclassified failure wrapping its cause.
    pub fn unexpected(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unexpected(cause.into())
    }
}

impl From<AggregateError> for QueryFailure {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::PeriodWithoutMethod => Self::Usage(err.to_string()),
            _ => Self::InvalidParameter(err.to_string()),
        }
    }
}

impl From<GeoError> for QueryFailure {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::PartialSpecification => Self::Usage(err.to_string()),
            _ => Self::InvalidParameter(err.to_string()),
        }
    }
}

impl From<PaginationError> for QueryFailure {
    fn from(err: PaginationError) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}
