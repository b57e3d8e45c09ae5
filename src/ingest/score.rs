use chrono::{DateTime, Utc};

/// Views per hour since publish, with elapsed time floored at one hour.
pub fn recency_score(view_count: u64, published_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if view_count == 0 {
        return 0;
    }

    let hours = (now - published_at).num_milliseconds() as f64 / 3_600_000.0;
    (view_count as f64 / hours.max(1.0)).round() as i64
}
