use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Feed parse error: {0}")]
    FeedParse(#[from] feed_rs::parser::ParseFeedError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("YouTube API error: {0}")]
    YouTubeApi(String),

    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    /// A row with the same unique key is already stored.
    #[error("{0}")]
    Duplicate(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::Duplicate(_))
    }

    /// Upstream failures (transport or non-2xx) from one of the HTTP APIs.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::YouTubeApi(_) | AppError::GeminiApi(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
