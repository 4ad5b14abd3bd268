use thiserror::Error;

/// Errors produced by a [`crate::ChainQuery`] implementation.
///
/// None of these are fatal to callers: resolvers recover from every variant
/// locally and report an indeterminate result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainQueryError {
    /// The RPC endpoint could not be reached or the request timed out
    #[error("Failed to reach chain RPC endpoint: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object
    #[error("Chain RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Message reported by the node
        message: String,
    },

    /// The node answered, but not in the shape we expected
    #[error("Unexpected chain RPC response: {0}")]
    Decode(String),

    /// A paginated read was still unfinished after the page limit
    #[error("Gave up on {method} after {pages} pages")]
    TooManyPages {
        /// RPC method being paginated
        method: &'static str,
        /// Pages read before giving up
        pages: usize,
    },

    /// The endpoint URL could not be parsed
    #[error("Invalid chain RPC endpoint '{0}'")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for ChainQueryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ChainQueryError::Decode(error.to_string())
        } else {
            ChainQueryError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ChainQueryError {
    fn from(error: serde_json::Error) -> Self {
        ChainQueryError::Decode(error.to_string())
    }
}
