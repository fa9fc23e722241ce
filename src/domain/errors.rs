use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not available for sale: {0}")]
    Unavailable(String),

    #[error("Catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Cart storage unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Cannot combine amounts in {expected} and {found}")]
    CurrencyMismatch { expected: String, found: String },
}

impl DomainError {
    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::UpstreamUnavailable(_) | DomainError::PersistenceUnavailable(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
