use std::path::{Path, PathBuf};

pub const DEFAULT_DECODED_OUTPUT: &str = "decoded_backup.json";
pub const DEFAULT_ENCODED_OUTPUT: &str = "backup.daylio";

fn with_stem_suffix(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("backup");
    input.with_file_name(format!("{stem}{suffix}.json"))
}

/// `exports/daylio.json` -> `exports/daylio_merged.json`
pub fn default_merge_output(destination: &Path) -> PathBuf {
    with_stem_suffix(destination, "_merged")
}

/// `data.json` -> `data_formatted.json`
pub fn default_format_output(input: &Path) -> PathBuf {
    with_stem_suffix(input, "_formatted")
}

pub fn output_or(explicit: Option<PathBuf>, fallback: impl FnOnce() -> PathBuf) -> PathBuf {
    explicit.unwrap_or_else(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_output_sits_beside_destination() {
        assert_eq!(
            default_merge_output(Path::new("exports/daylio.json")),
            PathBuf::from("exports/daylio_merged.json")
        );
        assert_eq!(
            default_merge_output(Path::new("backup")),
            PathBuf::from("backup_merged.json")
        );
    }

    #[test]
    fn format_output_keeps_inner_dots() {
        assert_eq!(
            default_format_output(Path::new("a.b.json")),
            PathBuf::from("a.b_formatted.json")
        );
    }

    #[test]
    fn explicit_output_wins() {
        let got = output_or(Some(PathBuf::from("x.json")), || PathBuf::from("y.json"));
        assert_eq!(got, PathBuf::from("x.json"));
    }
}
