use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub bytes: usize,
}

/// Serialize with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Write `bytes` to `path` through a temp file in the same directory so a
/// failure never leaves a truncated target behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn format_json(source_path: &Path, output_path: &Path) -> Result<FormatOutcome> {
    if !source_path.exists() {
        anyhow::bail!("input file '{}' not found", source_path.display());
    }
    let raw = fs::read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;
    // `Value` objects are ordered maps, so keys come out sorted.
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in file '{}'", source_path.display()))?;
    let bytes = to_pretty_json(&value)?;
    write_atomic(output_path, &bytes)?;
    tracing::info!(
        source = %source_path.display(),
        output = %output_path.display(),
        "formatted json"
    );
    Ok(FormatOutcome {
        source_path: source_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        bytes: bytes.len(),
    })
}
