use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Importance used whenever no AI rating is available.
pub const DEFAULT_IMPORTANCE: i64 = 5;

/// Short AI summary attached to a video at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
    pub importance: i64,
}

impl Summary {
    pub fn fallback(description: &str) -> Self {
        Self {
            summary: description.to_string(),
            importance: DEFAULT_IMPORTANCE,
        }
    }
}

/// Long-form markdown report generated on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub video_id: i64,
    pub content: String,
    pub model_version: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStatus {
    #[default]
    NotGenerated,
    Generating,
    Generated,
    Failed,
    NoApiKey,
}
