use crate::bridge::config::EntryConfig;
use crate::error::BridgeError;
use anyhow::{Result, anyhow};
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar and timestamp fields of a Daylio entry. `month` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub datetime_ms: i64,
    pub tz_offset_ms: i64,
}

pub fn parse_source_date(value: &str, cfg: &EntryConfig) -> Result<EntryDate> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| {
        BridgeError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })?;
    let time = NaiveTime::from_hms_opt(cfg.hour, cfg.minute, 0)
        .ok_or_else(|| anyhow!("invalid entry time {:02}:{:02}", cfg.hour, cfg.minute))?;
    let offset_secs = i32::try_from(cfg.tz_offset_ms / 1000)?;
    let offset = FixedOffset::east_opt(offset_secs)
        .ok_or_else(|| anyhow!("invalid timezone offset {}ms", cfg.tz_offset_ms))?;
    let local = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| anyhow!("ambiguous local time for {value}"))?;

    Ok(EntryDate {
        year: date.year(),
        month: date.month0(),
        day: date.day(),
        hour: cfg.hour,
        minute: cfg.minute,
        datetime_ms: local.timestamp_millis(),
        tz_offset_ms: cfg.tz_offset_ms,
    })
}
