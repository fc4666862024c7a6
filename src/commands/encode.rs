use anyhow::Result;
use std::path::PathBuf;

use crate::bridge::paths::{DEFAULT_ENCODED_OUTPUT, output_or};
use crate::commands::CommandReport;
use crate::daylio::archive;

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

pub fn run(opts: &EncodeOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("encode");
    let output = output_or(opts.output.clone(), || PathBuf::from(DEFAULT_ENCODED_OUTPUT));

    let outcome = archive::encode_backup(&opts.input, &output)?;
    report.detail(format!(
        "Successfully encoded and compressed backup to {}",
        outcome.archive_path.display()
    ));
    report.detail(format!("source={}", outcome.source_path.display()));
    report.detail(format!("encoded_bytes={}", outcome.encoded_bytes));
    Ok(report)
}
