use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No storage is available in this environment
    #[error("Session storage is unavailable")]
    Unavailable,

    /// The underlying storage rejected the operation (quota, security policy)
    #[error("Session storage backend error: {0}")]
    Backend(String),
}
