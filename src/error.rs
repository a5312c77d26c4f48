use std::path::PathBuf;

/// All errors that can occur while loading fixtures or persisting favorites.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    /// The data source holds no record for the requested match.
    #[error("no record for match {match_id}")]
    NotFound { match_id: String },

    /// The data source could not be reached or answered with a failure.
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The request was superseded by a newer one. Never shown to users.
    #[error("request cancelled")]
    Cancelled,

    /// Reading or writing the favorites file failed.
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The favorites file did not contain a JSON array of ids.
    #[error("invalid favorites data: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    pub fn transport(message: impl Into<String>) -> Self {
        FeedError::Transport {
            message: message.into(),
        }
    }

    pub fn not_found(match_id: impl Into<String>) -> Self {
        FeedError::NotFound {
            match_id: match_id.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FeedError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
