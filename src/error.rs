use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid date `{value}`: expected YYYY-MM-DD ({source})")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("source record #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("no files found in the zip archive {0}")]
    EmptyArchive(PathBuf),
    #[error("archive payload in {0} is not valid UTF-8")]
    NonUtf8Payload(PathBuf),
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
}
