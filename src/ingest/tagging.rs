use crate::models::{Keyword, KeywordKind};

/// Comma-joined include keywords found in the title or description.
pub fn tag_for(keywords: &[Keyword], title: &str, description: &str) -> Option<String> {
    let haystack = format!("{title}\n{description}").to_lowercase();

    let matched: Vec<&str> = keywords
        .iter()
        .filter(|k| k.kind == KeywordKind::Include)
        .map(|k| k.keyword.as_str())
        .filter(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
        .collect();

    if matched.is_empty() {
        None
    } else {
        Some(matched.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn keyword(text: &str, kind: KeywordKind) -> Keyword {
        Keyword {
            id: 0,
            keyword: text.to_string(),
            color: "#3B82F6".to_string(),
            kind,
            tag_group_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn joins_matching_include_keywords() {
        let keywords = vec![
            keyword("Rust", KeywordKind::Include),
            keyword("tokio", KeywordKind::Include),
            keyword("python", KeywordKind::Include),
            keyword("async", KeywordKind::Exclude),
        ];

        assert_eq!(
            tag_for(&keywords, "RUST async patterns", "built on Tokio").as_deref(),
            Some("Rust, tokio")
        );
    }

    #[test]
    fn none_when_nothing_matches() {
        let keywords = vec![keyword("rust", KeywordKind::Include)];
        assert_eq!(tag_for(&keywords, "Cooking", "pasta"), None);
        assert_eq!(tag_for(&[], "Rust", ""), None);
    }
}
