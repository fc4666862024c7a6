use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Pixels tag name -> Daylio tag name. Names without an entry map to
/// themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagNameMapping {
    names: HashMap<String, String>,
}

impl TagNameMapping {
    pub fn insert(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        self.names.insert(source.into(), destination.into());
    }

    pub fn resolve<'a>(&'a self, source: &'a str) -> &'a str {
        self.names.get(source).map_or(source, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    pub tag_names: Vec<String>,
}

/// Lowercased keyword -> Daylio tag names, iterated in the order each
/// keyword was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordMapping {
    rules: Vec<KeywordRule>,
    positions: HashMap<String, usize>,
}

impl KeywordMapping {
    pub fn push(&mut self, keyword: &str, tag_name: impl Into<String>) {
        let keyword = keyword.to_lowercase();
        let idx = match self.positions.get(&keyword) {
            Some(idx) => *idx,
            None => {
                self.rules.push(KeywordRule {
                    keyword: keyword.clone(),
                    tag_names: Vec::new(),
                });
                self.positions.insert(keyword, self.rules.len() - 1);
                self.rules.len() - 1
            }
        };
        self.rules[idx].tag_names.push(tag_name.into());
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mappings {
    pub tag_names: TagNameMapping,
    pub keywords: KeywordMapping,
}

#[derive(Debug, Deserialize)]
struct TagMappingRow {
    pixels_tag: String,
    daylio_tag: String,
}

#[derive(Debug, Deserialize)]
struct KeywordMappingRow {
    keyword: String,
    daylio_tag: String,
}

fn read_tag_mappings(path: &Path) -> Result<TagNameMapping> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut mapping = TagNameMapping::default();
    for row in reader.deserialize::<TagMappingRow>() {
        let row = row.with_context(|| format!("malformed row in {}", path.display()))?;
        mapping.insert(row.pixels_tag, row.daylio_tag);
    }
    Ok(mapping)
}

fn read_keyword_mappings(path: &Path) -> Result<KeywordMapping> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut mapping = KeywordMapping::default();
    for row in reader.deserialize::<KeywordMappingRow>() {
        let row = row.with_context(|| format!("malformed row in {}", path.display()))?;
        if row.keyword.is_empty() {
            tracing::warn!(path = %path.display(), "skipping keyword row with empty keyword");
            continue;
        }
        mapping.push(&row.keyword, row.daylio_tag);
    }
    Ok(mapping)
}

/// Load a `pixels_tag,daylio_tag` table. A missing or malformed file yields
/// an empty mapping.
pub fn load_tag_mappings(path: &Path) -> TagNameMapping {
    match read_tag_mappings(path) {
        Ok(mapping) => {
            tracing::debug!(path = %path.display(), rows = mapping.len(), "loaded tag mappings");
            mapping
        }
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "tag mappings unavailable; using identity");
            TagNameMapping::default()
        }
    }
}

/// Load a `keyword,daylio_tag` table. A missing or malformed file yields an
/// empty mapping.
pub fn load_keyword_mappings(path: &Path) -> KeywordMapping {
    match read_keyword_mappings(path) {
        Ok(mapping) => {
            tracing::debug!(
                path = %path.display(),
                keywords = mapping.len(),
                "loaded keyword mappings"
            );
            mapping
        }
        Err(err) => {
            tracing::warn!(
                error = %format!("{err:#}"),
                "keyword mappings unavailable; skipping keyword tags"
            );
            KeywordMapping::default()
        }
    }
}

pub fn load(tag_path: &Path, keyword_path: &Path) -> Mappings {
    Mappings {
        tag_names: load_tag_mappings(tag_path),
        keywords: load_keyword_mappings(keyword_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn tag_mappings_last_row_wins() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("tag_mappings.csv");
        fs::write(
            &path,
            "pixels_tag,daylio_tag\nhappy,joyful\nsad,down\nhappy,great\n",
        )
        .expect("write");

        let mapping = load_tag_mappings(&path);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("happy"), "great");
        assert_eq!(mapping.resolve("sad"), "down");
        assert_eq!(mapping.resolve("tired"), "tired");
    }

    #[test]
    fn keyword_mappings_lowercase_and_accumulate_in_order() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("keyword_mappings.csv");
        fs::write(
            &path,
            "keyword,daylio_tag\nGym,sport\nbeach,nature\ngym,health\nGYM,sport\n,ignored\n",
        )
        .expect("write");

        let mapping = load_keyword_mappings(&path);
        let rules = mapping.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].keyword, "gym");
        assert_eq!(rules[0].tag_names, vec!["sport", "health", "sport"]);
        assert_eq!(rules[1].keyword, "beach");
        assert_eq!(rules[1].tag_names, vec!["nature"]);
    }

    #[test]
    fn missing_files_yield_empty_mappings() {
        let tmp = tempdir().expect("tempdir");
        let mappings = load(&tmp.path().join("nope.csv"), &tmp.path().join("nada.csv"));
        assert!(mappings.tag_names.is_empty());
        assert!(mappings.keywords.is_empty());
    }

    #[test]
    fn wrong_header_yields_empty_mapping() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("tag_mappings.csv");
        fs::write(&path, "from,to\nhappy,joyful\n").expect("write");
        assert!(load_tag_mappings(&path).is_empty());
    }

    #[test]
    fn ragged_row_yields_empty_mapping() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("keyword_mappings.csv");
        fs::write(&path, "keyword,daylio_tag\ngym,sport\nbeach\n").expect("write");
        assert!(load_keyword_mappings(&path).is_empty());
    }
}
