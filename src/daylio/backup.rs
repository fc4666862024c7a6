use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A single `dayEntries` item.
///
/// Only the fields every entry carries are typed. Everything else, including
/// `note`, `tags` and other optional keys, stays in `extra` exactly as read,
/// so `null` and absent keys survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub datetime: i64,
    pub day: u32,
    pub hour: u32,
    pub id: i64,
    pub minute: u32,
    pub month: u32,
    pub mood: i64,
    pub year: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DayEntry {
    pub fn note(&self) -> Option<&str> {
        self.extra.get("note").and_then(Value::as_str)
    }

    pub fn tag_ids(&self) -> Option<Vec<i64>> {
        self.extra
            .get("tags")?
            .as_array()?
            .iter()
            .map(Value::as_i64)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub id_tag_group: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagGroup {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub number_of_entries: u64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaylioBackup {
    #[serde(rename = "dayEntries")]
    pub day_entries: Vec<DayEntry>,
    pub tags: Vec<Tag>,
    pub tag_groups: Vec<TagGroup>,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DaylioBackup {
    pub fn max_entry_id(&self) -> Option<i64> {
        self.day_entries.iter().map(|entry| entry.id).max()
    }

    /// First id free for appended entries.
    pub fn next_entry_id(&self) -> i64 {
        self.max_entry_id().map_or(1, |max| max + 1)
    }
}

pub fn parse(raw: &str) -> Result<DaylioBackup> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load(path: &Path) -> Result<DaylioBackup> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse(&raw).with_context(|| format!("failed to parse Daylio backup {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "version": 15,
            "dayEntries": [
                {
                    "assets": [], "datetime": 1_686_880_800_000_i64, "day": 15, "hour": 22,
                    "id": 7, "isFavorite": false, "minute": 0, "month": 5, "mood": 2,
                    "note": "", "note_title": "", "tags": [1], "timeZoneOffset": -14_400_000,
                    "year": 2023, "customField": {"kept": true}
                },
                {
                    "datetime": 1, "day": 1, "hour": 0, "id": 3, "minute": 0,
                    "month": 0, "mood": 1, "year": 2020
                }
            ],
            "tags": [{"id": 1, "name": "work", "id_tag_group": 2, "icon": 9}],
            "tag_groups": [{"id": 2, "name": "Activities", "order": 1}],
            "metadata": {"number_of_entries": 2, "created_at": 0, "platform": "android"}
        })
    }

    #[test]
    fn round_trip_preserves_unknown_and_absent_fields() {
        let original = sample();
        let backup: DaylioBackup = serde_json::from_value(original.clone()).expect("parse");
        assert_eq!(backup.day_entries[0].extra["customField"], json!({"kept": true}));
        assert_eq!(backup.day_entries[0].tag_ids(), Some(vec![1]));
        assert!(backup.day_entries[1].note().is_none());

        let back = serde_json::to_value(&backup).expect("serialize");
        assert_eq!(back, original);
    }

    #[test]
    fn round_trip_keeps_null_fields_distinct_from_absent() {
        let mut original = sample();
        original["dayEntries"][1]["note"] = Value::Null;
        original["dayEntries"][1]["tags"] = Value::Null;
        original["dayEntries"][1]["isFavorite"] = Value::Null;

        let backup: DaylioBackup = serde_json::from_value(original.clone()).expect("parse");
        let back = serde_json::to_value(&backup).expect("serialize");
        assert_eq!(back["dayEntries"][1], original["dayEntries"][1]);
        assert_eq!(back["dayEntries"][1]["note"], Value::Null);
        assert!(back["dayEntries"][1].get("assets").is_none());
        assert_eq!(back, original);
    }

    #[test]
    fn next_entry_id_follows_max_not_last() {
        let backup: DaylioBackup = serde_json::from_value(sample()).expect("parse");
        assert_eq!(backup.max_entry_id(), Some(7));
        assert_eq!(backup.next_entry_id(), 8);
    }

    #[test]
    fn next_entry_id_starts_at_one_when_empty() {
        let mut backup: DaylioBackup = serde_json::from_value(sample()).expect("parse");
        backup.day_entries.clear();
        assert_eq!(backup.next_entry_id(), 1);
    }

    #[test]
    fn missing_required_section_is_an_error() {
        let mut raw = sample();
        raw.as_object_mut().expect("object").remove("tag_groups");
        assert!(serde_json::from_value::<DaylioBackup>(raw).is_err());
    }
}
