use motorchain_storage::StoreError;
use thiserror::Error;

/// Errors surfaced by identity operations that are allowed to fail (login
/// initiation, persisting a session). Resolution itself never errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The login provider rejected or failed an operation
    #[error("Login provider error: {0}")]
    Provider(String),

    /// Persisted storage failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session could not be serialized for storage
    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// The login redirect URL does not parse
    #[error("Invalid redirect URL '{url}': {source}")]
    InvalidRedirect {
        /// The offending URL
        url: String,
        /// Parser error
        source: url::ParseError,
    },

    /// Federated login was requested without an OAuth client id configured
    #[error("No OAuth client id is configured for federated login")]
    MissingClientId,
}
