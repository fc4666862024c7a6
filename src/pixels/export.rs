use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const MOOD_RECORD_TYPE: &str = "Mood";

/// One category of tags attached to a Pixels record, e.g. `Emotions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PixelsTagGroup {
    #[serde(rename = "type")]
    pub group: String,
    #[serde(default)]
    pub entries: Vec<String>,
}

/// A single event from a Pixels export. Only `type` is required; everything
/// else is checked once the record is known to be a mood entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PixelsRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub scores: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<PixelsTagGroup>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PixelsRecord {
    pub fn is_mood(&self) -> bool {
        self.kind == MOOD_RECORD_TYPE
    }
}

pub fn parse(raw: &str) -> Result<Vec<PixelsRecord>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load(path: &Path) -> Result<Vec<PixelsRecord>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse(&raw).with_context(|| format!("failed to parse Pixels export {}", path.display()))
}
