use anyhow::Result;
use std::path::PathBuf;

use crate::bridge::config::load_config;
use crate::bridge::mappings;
use crate::bridge::merge::merge_backups;
use crate::bridge::output::{to_pretty_json, write_atomic};
use crate::bridge::paths::{default_merge_output, output_or};
use crate::commands::CommandReport;
use crate::daylio::backup;
use crate::pixels::export;

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub pixels_file: PathBuf,
    pub daylio_file: PathBuf,
    pub output: Option<PathBuf>,
    pub tag_mappings: Option<PathBuf>,
    pub keyword_mappings: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn run(opts: &MergeOptions) -> Result<CommandReport> {
    let cfg = load_config()?;
    let mut report = CommandReport::new("merge");

    let tag_path = opts
        .tag_mappings
        .clone()
        .unwrap_or_else(|| cfg.mappings.tag_mappings.clone());
    let keyword_path = opts
        .keyword_mappings
        .clone()
        .unwrap_or_else(|| cfg.mappings.keyword_mappings.clone());
    let mappings = mappings::load(&tag_path, &keyword_path);
    report.detail(format!(
        "tag_mappings={} rows={}",
        tag_path.display(),
        mappings.tag_names.len()
    ));
    report.detail(format!(
        "keyword_mappings={} keywords={}",
        keyword_path.display(),
        mappings.keywords.len()
    ));

    let source = export::load(&opts.pixels_file)?;
    let destination = backup::load(&opts.daylio_file)?;
    let now_ms = chrono::Utc::now().timestamp_millis();
    let outcome = merge_backups(&source, destination, &mappings, &cfg.entry, now_ms)?;

    report.detail(format!("existing_entries={}", outcome.existing));
    report.detail(format!("appended_entries={}", outcome.appended));
    report.detail(format!("skipped_records={}", outcome.skipped));
    if let Some(first) = outcome.first_new_id {
        report.detail(format!("first_new_id={first}"));
    }
    report.detail(format!(
        "number_of_entries={}",
        outcome.backup.metadata.number_of_entries
    ));

    let output = output_or(opts.output.clone(), || default_merge_output(&opts.daylio_file));
    if opts.dry_run {
        report.detail(format!("dry-run: would write {}", output.display()));
        return Ok(report);
    }

    let bytes = to_pretty_json(&outcome.backup)?;
    write_atomic(&output, &bytes)?;
    report.detail(format!(
        "Successfully merged backups. Output written to: {}",
        output.display()
    ));
    Ok(report)
}
