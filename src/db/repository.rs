use chrono::{DateTime, Days, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{
    Channel, Keyword, KeywordKind, NewChannel, NewKeyword, NewVideo, Report, SortOrder, TagGroup,
    TagGroupMember, Video, VideoFilter, VideoQuery,
};

use super::schema::SCHEMA;

const VIDEO_COLUMNS: &str = "id, title, url, thumbnail_url, summary, published_at, importance, tag, \
     channel_title, channel_id, is_saved, duration_sec, score, created_at";

#[derive(Clone)]
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Video operations

    /// Plain insert. The unique index on `url` decides duplicates, so two
    /// racing inserts for one URL resolve to exactly one row.
    pub async fn insert_video(&self, video: NewVideo) -> Result<i64> {
        let url = video.url.clone();
        let id = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    r#"INSERT INTO videos (title, url, thumbnail_url, summary, published_at, importance,
                                          tag, channel_title, channel_id, duration_sec, score)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
                    params![
                        video.title,
                        video.url,
                        video.thumbnail_url,
                        video.summary,
                        format_datetime(&video.published_at),
                        video.importance,
                        video.tag,
                        video.channel_title,
                        video.channel_id,
                        video.duration_sec,
                        video.score,
                    ],
                );
                match inserted {
                    Ok(_) => Ok(Some(conn.last_insert_rowid())),
                    Err(e) if is_unique_violation(&e) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        id.ok_or_else(|| AppError::Duplicate(format!("Video already added: {url}")))
    }

    pub async fn get_video(&self, id: i64) -> Result<Option<Video>> {
        let video = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1");
                let video = conn
                    .query_row(&sql, params![id], video_from_row)
                    .optional()?;
                Ok(video)
            })
            .await?;
        Ok(video)
    }

    pub async fn video_url_exists(&self, url: &str) -> Result<bool> {
        let url = url.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM videos WHERE url = ?1",
                    params![url],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    /// Dashboard listing. Titles matching an exclude keyword are always hidden.
    pub async fn list_videos(&self, query: VideoQuery) -> Result<Vec<Video>> {
        let mut sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos v WHERE NOT EXISTS (
                 SELECT 1 FROM keywords k
                 WHERE k.kind = 'exclude' AND instr(lower(v.title), lower(k.keyword)) > 0
             )"
        );
        let mut args: Vec<String> = Vec::new();

        if let Some(title) = query.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            args.push(format!("%{}%", escape_like(title)));
            sql.push_str(&format!(" AND v.title LIKE ?{} ESCAPE '\\'", args.len()));
        }
        if let Some(start) = query.start_date {
            args.push(format!("{}T00:00:00", start.format("%Y-%m-%d")));
            sql.push_str(&format!(" AND v.published_at >= ?{}", args.len()));
        }
        if let Some(end) = query.end_date.and_then(|d| d.checked_add_days(Days::new(1))) {
            args.push(format!("{}T00:00:00", end.format("%Y-%m-%d")));
            sql.push_str(&format!(" AND v.published_at < ?{}", args.len()));
        }
        if query.filter == VideoFilter::Saved {
            sql.push_str(" AND v.is_saved = 1");
        }
        sql.push_str(match query.sort {
            SortOrder::Newest => " ORDER BY v.published_at DESC, v.id DESC",
            SortOrder::Importance => " ORDER BY v.importance DESC, v.published_at DESC, v.id DESC",
        });

        let videos = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let videos = stmt
                    .query_map(params_from_iter(args.iter()), video_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(videos)
            })
            .await?;
        Ok(videos)
    }

    /// Flips the bookmark flag and returns the new state.
    pub async fn toggle_video_saved(&self, id: i64) -> Result<bool> {
        let saved = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE videos SET is_saved = NOT is_saved WHERE id = ?1",
                    params![id],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                let saved: bool = conn.query_row(
                    "SELECT is_saved FROM videos WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )?;
                Ok(Some(saved))
            })
            .await?;
        saved.ok_or_else(|| AppError::NotFound(format!("video {id}")))
    }

    pub async fn delete_video(&self, id: i64) -> Result<()> {
        self.delete_videos(vec![id]).await.map(|_| ())
    }

    /// Removes all given videos in one transaction and returns how many existed.
    pub async fn delete_videos(&self, ids: Vec<i64>) -> Result<usize> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput("No IDs provided".to_string()));
        }

        let deleted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut deleted = 0;
                for id in &ids {
                    tx.execute("DELETE FROM reports WHERE video_id = ?1", params![id])?;
                    deleted += tx.execute("DELETE FROM videos WHERE id = ?1", params![id])?;
                }
                tx.commit()?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted)
    }

    // Report operations

    pub async fn get_report(&self, video_id: i64) -> Result<Option<Report>> {
        let report = self
            .conn
            .call(move |conn| {
                let report = conn
                    .query_row(
                        "SELECT id, video_id, content, model_version, generated_at FROM reports WHERE video_id = ?1",
                        params![video_id],
                        report_from_row,
                    )
                    .optional()?;
                Ok(report)
            })
            .await?;
        Ok(report)
    }

    pub async fn save_report(&self, video_id: i64, content: String, model: String) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO reports (video_id, content, model_version)
                       VALUES (?1, ?2, ?3)
                       ON CONFLICT(video_id) DO UPDATE SET
                           content = excluded.content,
                           model_version = excluded.model_version,
                           generated_at = datetime('now')"#,
                    params![video_id, content, model],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    // Channel operations

    pub async fn insert_channel(&self, channel: NewChannel) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO channels (channel_id, name) VALUES (?1, ?2)",
                    params![channel.channel_id, channel.name],
                );
                match inserted {
                    Ok(_) => Ok(Some(conn.last_insert_rowid())),
                    Err(e) if is_unique_violation(&e) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        id.ok_or_else(|| AppError::Duplicate("Channel already registered".to_string()))
    }

    pub async fn get_all_channels(&self) -> Result<Vec<Channel>> {
        let channels = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, channel_id, name, created_at FROM channels ORDER BY created_at DESC, id DESC",
                )?;
                let channels = stmt
                    .query_map([], channel_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(channels)
            })
            .await?;
        Ok(channels)
    }

    pub async fn delete_channel(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM channels WHERE id = ?1", params![id])?;
                Ok(deleted > 0)
            })
            .await?;
        Ok(deleted)
    }

    // Keyword operations

    pub async fn insert_keyword(&self, keyword: NewKeyword) -> Result<i64> {
        let text = keyword.keyword.trim().to_string();
        if text.is_empty() {
            return Err(AppError::InvalidInput("Keyword is required".to_string()));
        }

        let id = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO keywords (keyword, color, kind) VALUES (?1, ?2, ?3)",
                    params![text, keyword.color, keyword.kind.as_str()],
                );
                match inserted {
                    Ok(_) => Ok(Some(conn.last_insert_rowid())),
                    Err(e) if is_unique_violation(&e) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        id.ok_or_else(|| AppError::Duplicate("Keyword already exists".to_string()))
    }

    pub async fn delete_keyword(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM keywords WHERE id = ?1", params![id])?;
                Ok(deleted > 0)
            })
            .await?;
        Ok(deleted)
    }

    pub async fn update_keyword_color(&self, id: i64, color: String) -> Result<()> {
        let updated = self
            .conn
            .call(move |conn| {
                let updated = conn.execute(
                    "UPDATE keywords SET color = ?1 WHERE id = ?2",
                    params![color, id],
                )?;
                Ok(updated > 0)
            })
            .await?;
        updated
            .then_some(())
            .ok_or_else(|| AppError::NotFound(format!("keyword {id}")))
    }

    pub async fn get_all_keywords(&self) -> Result<Vec<Keyword>> {
        let keywords = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, keyword, color, kind, tag_group_id, created_at FROM keywords ORDER BY created_at DESC, id DESC",
                )?;
                let keywords = stmt
                    .query_map([], keyword_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(keywords)
            })
            .await?;
        Ok(keywords)
    }

    pub async fn get_keywords_by_kind(&self, kind: KeywordKind) -> Result<Vec<Keyword>> {
        let keywords = self.get_all_keywords().await?;
        Ok(keywords.into_iter().filter(|k| k.kind == kind).collect())
    }

    // Tag group operations

    pub async fn insert_tag_group(&self, name: String, color: String) -> Result<i64> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Group name is required".to_string()));
        }

        let id = self
            .conn
            .call(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO tag_groups (name, color) VALUES (?1, ?2)",
                    params![name, color],
                );
                match inserted {
                    Ok(_) => Ok(Some(conn.last_insert_rowid())),
                    Err(e) if is_unique_violation(&e) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        id.ok_or_else(|| AppError::Duplicate("A group with this name already exists".to_string()))
    }

    pub async fn update_tag_group(
        &self,
        id: i64,
        name: Option<String>,
        color: Option<String>,
    ) -> Result<()> {
        let updated = self
            .conn
            .call(move |conn| {
                let updated = conn.execute(
                    "UPDATE tag_groups SET name = COALESCE(?1, name), color = COALESCE(?2, color) WHERE id = ?3",
                    params![name, color, id],
                );
                match updated {
                    Ok(changed) => Ok(Some(changed > 0)),
                    Err(e) if is_unique_violation(&e) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        match updated {
            Some(true) => Ok(()),
            Some(false) => Err(AppError::NotFound(format!("group {id}"))),
            None => Err(AppError::Duplicate(
                "A group with this name already exists".to_string(),
            )),
        }
    }

    /// Deletes the group; its keywords stay but become ungrouped.
    pub async fn delete_tag_group(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "UPDATE keywords SET tag_group_id = NULL WHERE tag_group_id = ?1",
                    params![id],
                )?;
                tx.execute("DELETE FROM tag_groups WHERE id = ?1", params![id])?;
                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn add_keyword_to_group(&self, group_id: i64, keyword_id: i64) -> Result<()> {
        let missing = self
            .conn
            .call(move |conn| {
                let group_exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM tag_groups WHERE id = ?1)",
                    params![group_id],
                    |row| row.get(0),
                )?;
                if !group_exists {
                    return Ok(Some(format!("group {group_id}")));
                }
                let updated = conn.execute(
                    "UPDATE keywords SET tag_group_id = ?1 WHERE id = ?2",
                    params![group_id, keyword_id],
                )?;
                Ok((updated == 0).then(|| format!("keyword {keyword_id}")))
            })
            .await?;

        match missing {
            Some(what) => Err(AppError::NotFound(what)),
            None => Ok(()),
        }
    }

    /// Only ungroups the keyword if it currently belongs to `group_id`.
    pub async fn remove_keyword_from_group(&self, group_id: i64, keyword_id: i64) -> Result<bool> {
        let removed = self
            .conn
            .call(move |conn| {
                let removed = conn.execute(
                    "UPDATE keywords SET tag_group_id = NULL WHERE id = ?1 AND tag_group_id = ?2",
                    params![keyword_id, group_id],
                )?;
                Ok(removed > 0)
            })
            .await?;
        Ok(removed)
    }

    pub async fn get_tag_groups(&self) -> Result<Vec<TagGroup>> {
        let groups = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, color, created_at FROM tag_groups ORDER BY created_at DESC, id DESC",
                )?;
                let mut groups = stmt
                    .query_map([], tag_group_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                let mut stmt = conn.prepare(
                    "SELECT id, keyword, tag_group_id FROM keywords WHERE tag_group_id IS NOT NULL ORDER BY keyword",
                )?;
                let members = stmt
                    .query_map([], |row| {
                        Ok((
                            row.get::<_, i64>(2)?,
                            TagGroupMember {
                                keyword_id: row.get(0)?,
                                keyword: row.get(1)?,
                            },
                        ))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                for (group_id, member) in members {
                    if let Some(group) = groups.iter_mut().find(|g| g.id == group_id) {
                        group.members.push(member);
                    }
                }
                Ok(groups)
            })
            .await?;
        Ok(groups)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // RFC3339 as written by insert_video (e.g., "2026-01-11T12:34:56Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime('now') defaults (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    Ok(row
        .get::<_, String>(idx)
        .ok()
        .and_then(|s| parse_datetime(&s))
        .unwrap_or_else(Utc::now))
}

fn video_from_row(row: &Row) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        thumbnail_url: row.get(3)?,
        summary: row.get(4)?,
        published_at: timestamp_at(row, 5)?,
        importance: row.get(6)?,
        tag: row.get(7)?,
        channel_title: row.get(8)?,
        channel_id: row.get(9)?,
        is_saved: row.get(10)?,
        duration_sec: row.get(11)?,
        score: row.get(12)?,
        created_at: timestamp_at(row, 13)?,
    })
}

fn report_from_row(row: &Row) -> rusqlite::Result<Report> {
    Ok(Report {
        id: row.get(0)?,
        video_id: row.get(1)?,
        content: row.get(2)?,
        model_version: row.get(3)?,
        generated_at: timestamp_at(row, 4)?,
    })
}

fn channel_from_row(row: &Row) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        name: row.get(2)?,
        created_at: timestamp_at(row, 3)?,
    })
}

fn keyword_from_row(row: &Row) -> rusqlite::Result<Keyword> {
    Ok(Keyword {
        id: row.get(0)?,
        keyword: row.get(1)?,
        color: row.get(2)?,
        // the CHECK constraint keeps this column to known values
        kind: row.get::<_, String>(3)?.parse().unwrap_or_default(),
        tag_group_id: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
    })
}

fn tag_group_from_row(row: &Row) -> rusqlite::Result<TagGroup> {
    Ok(TagGroup {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: timestamp_at(row, 3)?,
        members: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    async fn repository() -> (TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.db");
        let repo = Repository::new(path.to_str().unwrap()).await.unwrap();
        (dir, repo)
    }

    fn new_video(url: &str, title: &str, published_at: DateTime<Utc>, importance: i64) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            url: url.to_string(),
            thumbnail_url: None,
            summary: Some("summary".to_string()),
            published_at,
            importance,
            tag: None,
            channel_title: Some("Channel".to_string()),
            channel_id: None,
            duration_sec: Some(60),
            score: Some(10),
        }
    }

    #[tokio::test]
    async fn duplicate_url_is_rejected_and_keeps_one_row() {
        let (_dir, repo) = repository().await;
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

        let id = assert_ok!(repo.insert_video(new_video(url, "first", Utc::now(), 3)).await);
        let err = assert_err!(repo.insert_video(new_video(url, "second", Utc::now(), 1)).await);
        assert!(err.is_duplicate());

        let videos = repo.list_videos(VideoQuery::default()).await.unwrap();
        assert_eq!(videos.iter().filter(|v| v.url == url).count(), 1);
        let stored = repo.get_video(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "first");
        assert!(!stored.is_saved);
    }

    #[tokio::test]
    async fn round_trips_record_fields() {
        let (_dir, repo) = repository().await;
        let published = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        let mut video = new_video("https://youtu.be/abcdefghijk", "Rust news", published, 4);
        video.tag = Some("rust, async".to_string());
        video.thumbnail_url = Some("https://i.ytimg.com/vi/x/hqdefault.jpg".to_string());

        let id = repo.insert_video(video).await.unwrap();
        let stored = repo.get_video(id).await.unwrap().unwrap();

        assert_eq!(stored.published_at, published);
        assert_eq!(stored.importance, 4);
        assert_eq!(stored.tag.as_deref(), Some("rust, async"));
        assert_eq!(stored.duration_sec, Some(60));
        assert_eq!(stored.score, Some(10));
        assert!(repo.video_url_exists("https://youtu.be/abcdefghijk").await.unwrap());
        assert!(!repo.video_url_exists("https://youtu.be/zzzzzzzzzzz").await.unwrap());
    }

    #[tokio::test]
    async fn toggles_bookmark_and_filters_saved() {
        let (_dir, repo) = repository().await;
        let a = repo.insert_video(new_video("u1", "a", Utc::now(), 3)).await.unwrap();
        repo.insert_video(new_video("u2", "b", Utc::now(), 3)).await.unwrap();

        assert!(repo.toggle_video_saved(a).await.unwrap());

        let saved = repo
            .list_videos(VideoQuery {
                filter: VideoFilter::Saved,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, a);

        assert!(!repo.toggle_video_saved(a).await.unwrap());
        assert!(matches!(
            repo.toggle_video_saved(9999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn bulk_delete_removes_videos_and_reports() {
        let (_dir, repo) = repository().await;
        let a = repo.insert_video(new_video("u1", "a", Utc::now(), 3)).await.unwrap();
        let b = repo.insert_video(new_video("u2", "b", Utc::now(), 3)).await.unwrap();
        let c = repo.insert_video(new_video("u3", "c", Utc::now(), 3)).await.unwrap();
        repo.save_report(a, "# report".into(), "gemini".into()).await.unwrap();

        assert_eq!(repo.delete_videos(vec![a, b, 4242]).await.unwrap(), 2);

        let remaining = repo.list_videos(VideoQuery::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, c);
        assert!(repo.get_report(a).await.unwrap().is_none());

        assert!(matches!(
            repo.delete_videos(Vec::new()).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn list_applies_title_date_sort_and_exclusions() {
        let (_dir, repo) = repository().await;
        let day = |d| Utc.with_ymd_and_hms(2026, 5, d, 12, 0, 0).unwrap();
        repo.insert_video(new_video("u1", "Rust 2026 roadmap", day(1), 2)).await.unwrap();
        repo.insert_video(new_video("u2", "rust async deep dive", day(3), 5)).await.unwrap();
        repo.insert_video(new_video("u3", "Cooking pasta", day(5), 4)).await.unwrap();
        repo.insert_video(new_video("u4", "Rust crypto scam", day(6), 1)).await.unwrap();
        repo.insert_keyword(NewKeyword::new("scam", KeywordKind::Exclude))
            .await
            .unwrap();

        let titles = |videos: Vec<Video>| videos.into_iter().map(|v| v.title).collect::<Vec<_>>();

        let newest = repo.list_videos(VideoQuery::default()).await.unwrap();
        assert_eq!(
            titles(newest),
            vec!["Cooking pasta", "rust async deep dive", "Rust 2026 roadmap"]
        );

        let rust = repo
            .list_videos(VideoQuery {
                title: Some("RUST".into()),
                sort: SortOrder::Importance,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(rust), vec!["rust async deep dive", "Rust 2026 roadmap"]);

        let ranged = repo
            .list_videos(VideoQuery {
                start_date: NaiveDate::from_ymd_opt(2026, 5, 3),
                end_date: NaiveDate::from_ymd_opt(2026, 5, 5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(ranged), vec!["Cooking pasta", "rust async deep dive"]);

        let percent = repo
            .list_videos(VideoQuery {
                title: Some("100%".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(percent.is_empty());
    }

    #[tokio::test]
    async fn channels_are_unique() {
        let (_dir, repo) = repository().await;
        let channel = NewChannel {
            channel_id: "UC123".into(),
            name: "Rust Channel".into(),
        };
        let id = repo.insert_channel(channel.clone()).await.unwrap();
        let err = repo.insert_channel(channel).await.unwrap_err();
        assert_eq!(err.to_string(), "Channel already registered");

        assert_eq!(repo.get_all_channels().await.unwrap().len(), 1);
        assert!(repo.delete_channel(id).await.unwrap());
        assert!(repo.get_all_channels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keywords_and_tag_groups() {
        let (_dir, repo) = repository().await;

        assert!(matches!(
            repo.insert_keyword(NewKeyword::new("   ", KeywordKind::Include)).await,
            Err(AppError::InvalidInput(_))
        ));
        let rust = repo
            .insert_keyword(NewKeyword::new(" rust ", KeywordKind::Include))
            .await
            .unwrap();
        let tokio = repo
            .insert_keyword(NewKeyword::new("tokio", KeywordKind::Include))
            .await
            .unwrap();
        assert!(repo
            .insert_keyword(NewKeyword::new("rust", KeywordKind::Exclude))
            .await
            .unwrap_err()
            .is_duplicate());

        repo.update_keyword_color(rust, "#FF0000".into()).await.unwrap();
        let keywords = repo.get_all_keywords().await.unwrap();
        assert_eq!(keywords.len(), 2);
        let stored = keywords.iter().find(|k| k.id == rust).unwrap();
        assert_eq!(stored.keyword, "rust");
        assert_eq!(stored.color, "#FF0000");
        assert_eq!(stored.kind, KeywordKind::Include);

        let group = repo
            .insert_tag_group("Languages".into(), "#00FF00".into())
            .await
            .unwrap();
        assert!(repo
            .insert_tag_group("Languages".into(), "#000000".into())
            .await
            .unwrap_err()
            .is_duplicate());

        repo.add_keyword_to_group(group, rust).await.unwrap();
        repo.add_keyword_to_group(group, tokio).await.unwrap();
        assert!(!repo.remove_keyword_from_group(group + 1, tokio).await.unwrap());
        assert!(repo.remove_keyword_from_group(group, tokio).await.unwrap());

        repo.update_tag_group(group, Some("Langs".into()), None)
            .await
            .unwrap();
        let groups = repo.get_tag_groups().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Langs");
        assert_eq!(groups[0].color, "#00FF00");
        assert_eq!(groups[0].members.len(), 1);
        assert_eq!(groups[0].members[0].keyword, "rust");

        repo.delete_tag_group(group).await.unwrap();
        assert!(repo.get_tag_groups().await.unwrap().is_empty());
        let keywords = repo.get_all_keywords().await.unwrap();
        assert!(keywords.iter().all(|k| k.tag_group_id.is_none()));

        assert!(repo.delete_keyword(tokio).await.unwrap());
        assert_eq!(
            repo.get_keywords_by_kind(KeywordKind::Include).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn updates_to_missing_rows_are_not_found() {
        let (_dir, repo) = repository().await;
        let keyword = repo
            .insert_keyword(NewKeyword::new("rust", KeywordKind::Include))
            .await
            .unwrap();
        let group = repo
            .insert_tag_group("Languages".into(), "#00FF00".into())
            .await
            .unwrap();
        repo.insert_tag_group("Tools".into(), "#0000FF".into())
            .await
            .unwrap();

        assert!(matches!(
            repo.update_keyword_color(keyword + 100, "#FF0000".into()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.update_tag_group(group + 100, Some("Other".into()), None).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.update_tag_group(group + 100, None, Some("#111111".into())).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.add_keyword_to_group(group + 100, keyword).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.add_keyword_to_group(group, keyword + 100).await,
            Err(AppError::NotFound(_))
        ));

        // renaming onto an existing name is still a duplicate, not a missing row
        assert!(repo
            .update_tag_group(group, Some("Tools".into()), None)
            .await
            .unwrap_err()
            .is_duplicate());

        let keywords = repo.get_all_keywords().await.unwrap();
        assert_eq!(keywords[0].color, "#3B82F6");
        assert_eq!(keywords[0].tag_group_id, None);
    }
}
