use crate::bridge::config::EntryConfig;
use crate::bridge::dates::parse_source_date;
use crate::bridge::mappings::Mappings;
use crate::bridge::tags::{TagIndex, resolve_tags};
use crate::daylio::backup::{DayEntry, DaylioBackup};
use crate::error::BridgeError;
use crate::pixels::export::PixelsRecord;
use anyhow::Result;
use serde_json::{Map, json};

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub backup: DaylioBackup,
    pub existing: usize,
    pub appended: usize,
    pub skipped: usize,
    pub first_new_id: Option<i64>,
}

pub fn invert_mood(score: i64, scale_max: i64) -> i64 {
    (scale_max + 1) - score
}

pub fn render_note(note: Option<&str>, line_break: &str) -> String {
    note.map(|text| text.replace('\n', line_break))
        .unwrap_or_default()
}

fn build_entry(
    index: usize,
    record: &PixelsRecord,
    id: i64,
    tags: &TagIndex,
    mappings: &Mappings,
    cfg: &EntryConfig,
) -> Result<DayEntry> {
    let date = record
        .date
        .as_deref()
        .ok_or(BridgeError::MissingField {
            index,
            field: "date",
        })?;
    let date = parse_source_date(date, cfg)?;
    let score = *record.scores.first().ok_or(BridgeError::MissingField {
        index,
        field: "scores",
    })?;
    if !(1..=cfg.mood_scale_max).contains(&score) {
        tracing::warn!(
            index,
            score,
            max = cfg.mood_scale_max,
            "score outside the source scale; inverting anyway"
        );
    }

    let tag_ids = resolve_tags(&record.tags, record.notes.as_deref(), tags, mappings);

    let mut extra = Map::new();
    extra.insert("assets".to_string(), json!([]));
    extra.insert("isFavorite".to_string(), json!(false));
    extra.insert(
        "note".to_string(),
        json!(render_note(record.notes.as_deref(), &cfg.line_break)),
    );
    extra.insert("note_title".to_string(), json!(""));
    extra.insert("tags".to_string(), json!(tag_ids));
    extra.insert("timeZoneOffset".to_string(), json!(date.tz_offset_ms));

    Ok(DayEntry {
        datetime: date.datetime_ms,
        day: date.day,
        hour: date.hour,
        id,
        minute: date.minute,
        month: date.month,
        mood: invert_mood(score, cfg.mood_scale_max),
        year: date.year,
        extra,
    })
}

/// Append every mood record from `source` to `destination`.
///
/// Existing entries are left untouched. New ids start above the highest
/// existing id. Any bad mood record fails the whole merge.
pub fn merge_backups(
    source: &[PixelsRecord],
    mut destination: DaylioBackup,
    mappings: &Mappings,
    cfg: &EntryConfig,
    now_ms: i64,
) -> Result<MergeOutcome> {
    let existing = destination.day_entries.len();
    let index = TagIndex::build(&destination.tags, &destination.tag_groups);
    let mut next_id = destination.next_entry_id();
    let mut first_new_id = None;
    let mut appended = Vec::new();
    let mut skipped = 0usize;

    for (i, record) in source.iter().enumerate() {
        if !record.is_mood() {
            tracing::debug!(index = i, kind = %record.kind, "skipping non-mood record");
            skipped += 1;
            continue;
        }
        let entry = build_entry(i, record, next_id, &index, mappings, cfg)?;
        if first_new_id.is_none() {
            first_new_id = Some(next_id);
        }
        next_id += 1;
        appended.push(entry);
    }

    let appended_count = appended.len();
    destination.day_entries.extend(appended);
    destination.metadata.number_of_entries = destination.day_entries.len() as u64;
    destination.metadata.created_at = now_ms;

    tracing::info!(
        existing,
        appended = appended_count,
        skipped,
        "merged source records"
    );

    Ok(MergeOutcome {
        backup: destination,
        existing,
        appended: appended_count,
        skipped,
        first_new_id,
    })
}
