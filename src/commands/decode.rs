use anyhow::Result;
use std::path::PathBuf;

use crate::bridge::paths::{DEFAULT_DECODED_OUTPUT, output_or};
use crate::commands::CommandReport;
use crate::daylio::archive;

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

pub fn run(opts: &DecodeOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("decode");
    let output = output_or(opts.output.clone(), || PathBuf::from(DEFAULT_DECODED_OUTPUT));

    let outcome = archive::decode_backup(&opts.input, &output)?;
    report.detail(format!(
        "Successfully decoded and saved to {}",
        outcome.output_path.display()
    ));
    report.detail(format!("archive={}", outcome.archive_path.display()));
    report.detail(format!("member={}", outcome.member));
    report.detail(format!("bytes={}", outcome.bytes));
    if let Some(err) = outcome.json_error {
        tracing::warn!(
            output = %outcome.output_path.display(),
            error = %err,
            "decoded payload is not valid JSON"
        );
        report.detail(format!("warning: decoded payload is not valid JSON: {err}"));
    }
    Ok(report)
}
