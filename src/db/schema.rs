pub const SCHEMA: &str = r#"
-- videos table
CREATE TABLE IF NOT EXISTS videos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    thumbnail_url TEXT,
    summary TEXT,
    published_at TEXT NOT NULL,
    importance INTEGER NOT NULL DEFAULT 5,
    tag TEXT,
    channel_title TEXT,
    channel_id TEXT,
    is_saved INTEGER NOT NULL DEFAULT 0,
    duration_sec INTEGER,
    score INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_videos_published_at ON videos(published_at DESC);
CREATE INDEX IF NOT EXISTS idx_videos_importance ON videos(importance DESC);
CREATE INDEX IF NOT EXISTS idx_videos_is_saved ON videos(is_saved);

-- reports table (one cached AI report per video)
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    video_id INTEGER NOT NULL UNIQUE REFERENCES videos(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    model_version TEXT NOT NULL,
    generated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- channels table
CREATE TABLE IF NOT EXISTS channels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- tag_groups table
CREATE TABLE IF NOT EXISTS tag_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    color TEXT NOT NULL DEFAULT '#3B82F6',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- keywords table
CREATE TABLE IF NOT EXISTS keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword TEXT NOT NULL UNIQUE,
    color TEXT NOT NULL DEFAULT '#3B82F6',
    kind TEXT NOT NULL DEFAULT 'include' CHECK (kind IN ('include', 'exclude')),
    tag_group_id INTEGER REFERENCES tag_groups(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_keywords_tag_group_id ON keywords(tag_group_id);
"#;
