//! Error types for the query client.

/// Query client errors.
///
/// A missing run, page, report or spec is never an error: fetch operations
/// return `Ok(None)` for it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or body read failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// Non-2xx response from the endpoint.
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },

    /// Body is not a well-formed query envelope.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The endpoint answered with errors and no data.
    #[error("query failed: {}", messages.join("; "))]
    Query { messages: Vec<String> },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,

            Self::Network { .. } => 3,
            Self::Http { .. } => 3,

            Self::InvalidResponse { .. } => 4,
            Self::Query { .. } => 4,
        }
    }

    /// Whether the error came from talking to the endpoint, as opposed to
    /// building the client.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
