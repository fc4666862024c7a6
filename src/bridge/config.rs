use crate::error::BridgeError;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

const MAX_OFFSET_MS: i64 = 24 * 60 * 60 * 1000;

/// How a date-only source record becomes a timestamped Daylio entry.
///
/// The defaults (22:00 at UTC-4, a 1..=5 scale, `<br>` line breaks) are the
/// values every historical merge used; changing them changes the output for
/// the same input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    pub hour: u32,
    pub minute: u32,
    pub tz_offset_ms: i64,
    pub mood_scale_max: i64,
    pub line_break: String,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            hour: 22,
            minute: 0,
            tz_offset_ms: -14_400_000,
            mood_scale_max: 5,
            line_break: "<br>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingsConfig {
    pub tag_mappings: PathBuf,
    pub keyword_mappings: PathBuf,
}

impl Default for MappingsConfig {
    fn default() -> Self {
        Self {
            tag_mappings: PathBuf::from("tag_mappings.csv"),
            keyword_mappings: PathBuf::from("keyword_mappings.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    pub entry: EntryConfig,
    pub mappings: MappingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialBridgeConfig {
    entry: Option<EntryConfig>,
    mappings: Option<MappingsConfig>,
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_i64(var: &str, fallback: i64) -> i64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<i64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn env_or_path(var: &str, fallback: &PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback.clone(),
    }
}

fn validate(cfg: &BridgeConfig) -> Result<()> {
    let entry = &cfg.entry;
    if entry.hour > 23 {
        return Err(BridgeError::InvalidConfig(format!(
            "entry hour {} out of range: require 0..=23",
            entry.hour
        ))
        .into());
    }
    if entry.minute > 59 {
        return Err(BridgeError::InvalidConfig(format!(
            "entry minute {} out of range: require 0..=59",
            entry.minute
        ))
        .into());
    }
    if entry.tz_offset_ms.abs() >= MAX_OFFSET_MS {
        return Err(BridgeError::InvalidConfig(format!(
            "timezone offset {}ms out of range: must be within one day",
            entry.tz_offset_ms
        ))
        .into());
    }
    if entry.tz_offset_ms % 1000 != 0 {
        return Err(BridgeError::InvalidConfig(
            "timezone offset must be a whole number of seconds".to_string(),
        )
        .into());
    }
    if entry.mood_scale_max < 1 {
        return Err(BridgeError::InvalidConfig(
            "mood scale max must be >= 1".to_string(),
        )
        .into());
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("DAYLIO_BRIDGE_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let base = dirs::config_dir()?;
    Some(base.join("daylio-bridge").join("config.toml"))
}

fn merge_file_config(base: &mut BridgeConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialBridgeConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    if let Some(entry) = parsed.entry {
        base.entry = entry;
    }
    if let Some(mappings) = parsed.mappings {
        base.mappings = mappings;
    }
    Ok(())
}

pub fn load_config() -> Result<BridgeConfig> {
    let mut cfg = BridgeConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.entry.hour = env_or_u32("DAYLIO_BRIDGE_ENTRY_HOUR", cfg.entry.hour);
    cfg.entry.minute = env_or_u32("DAYLIO_BRIDGE_ENTRY_MINUTE", cfg.entry.minute);
    cfg.entry.tz_offset_ms = env_or_i64("DAYLIO_BRIDGE_TZ_OFFSET_MS", cfg.entry.tz_offset_ms);
    cfg.entry.mood_scale_max =
        env_or_i64("DAYLIO_BRIDGE_MOOD_SCALE_MAX", cfg.entry.mood_scale_max);
    cfg.entry.line_break = env_or_string("DAYLIO_BRIDGE_LINE_BREAK", &cfg.entry.line_break);
    cfg.mappings.tag_mappings =
        env_or_path("DAYLIO_BRIDGE_TAG_MAPPINGS", &cfg.mappings.tag_mappings);
    cfg.mappings.keyword_mappings = env_or_path(
        "DAYLIO_BRIDGE_KEYWORD_MAPPINGS",
        &cfg.mappings.keyword_mappings,
    );

    validate(&cfg)?;
    Ok(cfg)
}
