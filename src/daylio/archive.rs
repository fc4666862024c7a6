use crate::error::BridgeError;
use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the single member inside a `.daylio` archive.
pub const ARCHIVE_MEMBER: &str = "backup.daylio";

#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    pub archive_path: PathBuf,
    pub member: String,
    pub output_path: PathBuf,
    pub bytes: usize,
    pub json_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    pub source_path: PathBuf,
    pub archive_path: PathBuf,
    pub encoded_bytes: usize,
}

/// Read the first member of a `.daylio` zip and return the decoded JSON text
/// along with the member name.
pub fn read_backup_json(archive_path: &Path) -> Result<(String, String)> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("failed to open {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive {}", archive_path.display()))?;
    if archive.is_empty() {
        return Err(BridgeError::EmptyArchive(archive_path.to_path_buf()).into());
    }

    let mut member = archive.by_index(0)?;
    let name = member.name().to_string();
    let mut payload = String::new();
    member.read_to_string(&mut payload).with_context(|| {
        format!(
            "member {name} of {} is not base64 text",
            archive_path.display()
        )
    })?;

    // Encoders commonly wrap base64 lines; whitespace is never payload.
    let compact = payload.split_ascii_whitespace().collect::<String>();
    let decoded = STANDARD
        .decode(compact)
        .with_context(|| format!("failed to base64-decode {}", archive_path.display()))?;
    let json = String::from_utf8(decoded)
        .map_err(|_| BridgeError::NonUtf8Payload(archive_path.to_path_buf()))?;
    Ok((json, name))
}

/// Wrap `json` as base64 in a deflated zip written to `writer`.
pub fn write_backup_archive<W: Write + std::io::Seek>(writer: W, json: &str) -> Result<usize> {
    let encoded = STANDARD.encode(json.as_bytes());
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(ARCHIVE_MEMBER, options)?;
    zip.write_all(encoded.as_bytes())?;
    zip.finish()?;
    Ok(encoded.len())
}

pub fn decode_backup(archive_path: &Path, output_path: &Path) -> Result<DecodeOutcome> {
    let (json, member) = read_backup_json(archive_path)?;
    // Written as-is even when it does not parse; the caller reports it.
    let json_error = serde_json::from_str::<serde_json::Value>(&json)
        .err()
        .map(|err| err.to_string());
    crate::bridge::output::write_atomic(output_path, json.as_bytes())?;
    tracing::info!(
        archive = %archive_path.display(),
        member = %member,
        output = %output_path.display(),
        "decoded backup"
    );
    Ok(DecodeOutcome {
        archive_path: archive_path.to_path_buf(),
        member,
        output_path: output_path.to_path_buf(),
        bytes: json.len(),
        json_error,
    })
}

pub fn encode_backup(source_path: &Path, archive_path: &Path) -> Result<EncodeOutcome> {
    let json = fs::read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;

    let mut buffer = std::io::Cursor::new(Vec::new());
    let encoded_bytes = write_backup_archive(&mut buffer, &json)?;
    crate::bridge::output::write_atomic(archive_path, buffer.get_ref())?;
    tracing::info!(
        source = %source_path.display(),
        archive = %archive_path.display(),
        encoded_bytes,
        "encoded backup"
    );
    Ok(EncodeOutcome {
        source_path: source_path.to_path_buf(),
        archive_path: archive_path.to_path_buf(),
        encoded_bytes,
    })
}
