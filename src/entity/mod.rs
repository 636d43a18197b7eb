use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single logged accomplishment.
///
/// Field names stay camelCase on the wire and on disk so existing `db.json`
/// documents keep loading unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Set once by the store at creation. Hand-edited documents may lack it;
    /// such entries never match a time window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Client-supplied payload for creating an entry. The store assigns `id`
/// and `timestamp`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Accepted for wire compatibility with the original form payload and
    /// ignored; the store's clock is authoritative.
    #[serde(default)]
    pub date: Option<String>,
}

/// Full replacement of an entry's mutable fields. `id` and `timestamp`
/// are preserved by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Split user-entered tag text on commas, trim, and drop empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_splits_and_trims() {
        assert_eq!(parse_tags("rust, cli , web"), vec!["rust", "cli", "web"]);
    }

    #[test]
    fn test_parse_tags_drops_empty() {
        assert_eq!(parse_tags("a,,b, ,"), vec!["a", "b"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_entry_roundtrips_camel_case() {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            title: "Shipped a feature".to_string(),
            description: "Landed the big refactor".to_string(),
            image_url: Some("https://example.com/pic.png".to_string()),
            tags: vec!["rust".to_string()],
            timestamp: Some(Utc::now()),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"imageUrl\""));

        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, entry.id);
        assert_eq!(back.title, entry.title);
        assert_eq!(back.image_url, entry.image_url);
    }

    #[test]
    fn test_entry_without_timestamp_parses() {
        let json = r#"{"id":"b4b9ec56-6f1c-4c4f-9df5-0c6a72b7a3a1","title":"t","description":"d"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.timestamp.is_none());
        assert!(entry.tags.is_empty());
    }
}
