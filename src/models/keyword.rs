use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_KEYWORD_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    /// Matched keywords become the video's tag.
    #[default]
    Include,
    /// Matching titles are hidden from the dashboard.
    Exclude,
}

impl KeywordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordKind::Include => "include",
            KeywordKind::Exclude => "exclude",
        }
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(KeywordKind::Include),
            "exclude" => Ok(KeywordKind::Exclude),
            other => Err(format!("unknown keyword kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
    pub color: String,
    pub kind: KeywordKind,
    pub tag_group_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewKeyword {
    pub keyword: String,
    pub color: String,
    pub kind: KeywordKind,
}

impl NewKeyword {
    pub fn new(keyword: impl Into<String>, kind: KeywordKind) -> Self {
        Self {
            keyword: keyword.into(),
            color: DEFAULT_KEYWORD_COLOR.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagGroupMember {
    pub keyword_id: i64,
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagGroup {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<TagGroupMember>,
}
