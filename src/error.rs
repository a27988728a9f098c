#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API Error: {status} - {body}")]
    Backend { status: u16, body: String },

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session invalid: {0}")]
    SessionInvalid(Box<CollectionError>),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A failure inside the SDK itself (poisoned lock, lost worker task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for CollectionError {
    fn from(err: reqwest::Error) -> Self {
        CollectionError::Transport(err.to_string())
    }
}

impl CollectionError {
    /// HTTP status of a backend rejection, looking through session invalidation.
    pub fn status(&self) -> Option<u16> {
        match self {
            CollectionError::Backend { status, .. } => Some(*status),
            CollectionError::SessionInvalid(inner) => inner.status(),
            _ => None,
        }
    }

    /// True when the backend refused the bearer token.
    ///
    /// Matches a 401 status or an error body mentioning `Unauthenticated`
    /// (the backend's stock message for a missing or revoked token).
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            CollectionError::Backend { status, body } => {
                *status == 401 || body.contains("Unauthenticated")
            }
            CollectionError::SessionInvalid(inner) => inner.is_unauthenticated(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectionError>;
