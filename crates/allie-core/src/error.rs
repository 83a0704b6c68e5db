use thiserror::Error;

/// Coarse classification used by the HTTP layer to pick a status code and
/// envelope for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something unusable (missing prompt, missing file).
    BadRequest,
    /// A third-party provider failed: network, non-2xx, malformed payload.
    Upstream,
    /// Our own plumbing failed: database, filesystem, configuration.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Upstream => "upstream",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Error)]
pub enum AllieError {
    #[error("llm error ({provider}): {message}")]
    Llm { provider: String, message: String },
    #[error("http error ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("integration error: {0}")]
    Integration(String),
    #[error("transcription error: {0}")]
    Transcription(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AllieError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Llm { .. } | Self::Http { .. } | Self::Integration(_) | Self::Transcription(_) => {
                ErrorKind::Upstream
            }
            Self::Database(_) | Self::Config(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, AllieError>;
