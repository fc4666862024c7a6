use anyhow::Result;
use std::path::PathBuf;

use crate::bridge::output;
use crate::bridge::paths::{default_format_output, output_or};
use crate::commands::CommandReport;

#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

pub fn run(opts: &FormatOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("format");
    let target = output_or(opts.output.clone(), || default_format_output(&opts.input));

    let outcome = output::format_json(&opts.input, &target)?;
    report.detail(format!(
        "Successfully formatted JSON. Output written to: {}",
        outcome.output_path.display()
    ));
    report.detail(format!("source={}", outcome.source_path.display()));
    report.detail(format!("bytes={}", outcome.bytes));
    Ok(report)
}
