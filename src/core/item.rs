//! # Forum Items
//!
//! One node of a Hacker News discussion tree, exactly as the Firebase API
//! returns it. Field names follow the wire format so the same type is used
//! for fetching and for the save file cache.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Job,
    Story,
    Comment,
    Poll,
    #[serde(rename = "pollopt")]
    PollOption,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Creation time, unix seconds.
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body in HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead: Option<bool>,
    /// For poll options: the poll they belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<u64>,
    /// For polls: the option ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<u64>>,
}

impl Item {
    /// Case-insensitive substring search over the raw body.
    /// Items without a body never match.
    pub fn text_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.text
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    }

    pub fn is_comment(&self) -> bool {
        self.kind == ItemKind::Comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_comment() {
        let json = r#"{
            "by": "someone",
            "id": 42,
            "kids": [43, 44],
            "parent": 1,
            "text": "Acme Corp | Remote<p>We are hiring",
            "time": 1700000000,
            "type": "comment"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 42);
        assert_eq!(item.kind, ItemKind::Comment);
        assert_eq!(item.kids, vec![43, 44]);
        assert_eq!(item.by.as_deref(), Some("someone"));
        assert!(item.title.is_none());
    }

    #[test]
    fn test_missing_kids_defaults_to_empty() {
        let json = r#"{"id": 7, "time": 0, "type": "pollopt", "poll": 6, "score": 3}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::PollOption);
        assert!(item.kids.is_empty());
        assert_eq!(item.poll, Some(6));
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let json = r#"{"id": 1, "time": 5, "type": "story", "title": "Ask HN"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["type"], "story");
        assert!(out.get("text").is_none());
        assert!(out.get("by").is_none());
    }

    #[test]
    fn test_text_contains_is_case_insensitive() {
        let json = r#"{"id": 1, "time": 5, "type": "comment", "text": "Senior RUST engineer"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.text_contains("rust"));
        assert!(item.text_contains("Rust Eng"));
        assert!(!item.text_contains("python"));
    }

    #[test]
    fn test_text_contains_without_body() {
        let json = r#"{"id": 1, "time": 5, "type": "comment"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(!item.text_contains(""));
    }
}
