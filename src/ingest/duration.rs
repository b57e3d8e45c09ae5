use std::sync::OnceLock;

use regex::Regex;

static DURATION_RE: OnceLock<Regex> = OnceLock::new();

fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("valid duration pattern")
    })
}

/// Total seconds of a `PT[nH][nM][nS]` duration.
///
/// Missing groups count as zero. Anything that doesn't match, or that
/// overflows `i64`, yields 0 so a malformed value reads as "unknown"
/// instead of failing ingestion.
pub fn parse_duration(duration: &str) -> i64 {
    let Some(caps) = duration_re().captures(duration) else {
        return 0;
    };

    let group = |i: usize| match caps.get(i) {
        Some(m) => m.as_str().parse::<i64>().ok(),
        None => Some(0),
    };

    match (group(1), group(2), group(3)) {
        (Some(h), Some(m), Some(s)) => total_seconds(h, m, s).unwrap_or(0),
        _ => 0,
    }
}

fn total_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}
