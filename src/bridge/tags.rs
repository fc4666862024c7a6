use crate::bridge::mappings::Mappings;
use crate::daylio::backup::{Tag, TagGroup};
use crate::pixels::export::PixelsTagGroup;
use std::collections::HashMap;

/// Name lookups over a Daylio tag vocabulary, built once per merge. Each
/// index keeps the first tag or group seen under a key.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    groups_by_name: HashMap<String, i64>,
    tags_by_name_and_group: HashMap<(String, i64), i64>,
    tags_by_name: HashMap<String, i64>,
}

impl TagIndex {
    pub fn build(tags: &[Tag], groups: &[TagGroup]) -> Self {
        let mut index = Self::default();
        for group in groups {
            index
                .groups_by_name
                .entry(group.name.clone())
                .or_insert(group.id);
        }
        for tag in tags {
            index
                .tags_by_name_and_group
                .entry((tag.name.clone(), tag.id_tag_group))
                .or_insert(tag.id);
            index.tags_by_name.entry(tag.name.clone()).or_insert(tag.id);
        }
        index
    }

    pub fn group_id(&self, name: &str) -> Option<i64> {
        self.groups_by_name.get(name).copied()
    }

    pub fn tag_in_group(&self, name: &str, group_id: i64) -> Option<i64> {
        self.tags_by_name_and_group
            .get(&(name.to_string(), group_id))
            .copied()
    }

    pub fn tag_by_name(&self, name: &str) -> Option<i64> {
        self.tags_by_name.get(name).copied()
    }
}

fn push_unique(ids: &mut Vec<i64>, id: i64) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Structured path: source group -> Daylio group by name, then each entry
/// through the name mapping to a tag inside that group. Unmatched groups and
/// tags are dropped.
pub fn convert_source_tags(
    source: &[PixelsTagGroup],
    index: &TagIndex,
    mappings: &Mappings,
    ids: &mut Vec<i64>,
) {
    for group in source {
        let Some(group_id) = index.group_id(&group.group) else {
            tracing::debug!(group = %group.group, "no matching tag group; dropping its tags");
            continue;
        };
        for entry in &group.entries {
            let mapped = mappings.tag_names.resolve(entry);
            match index.tag_in_group(mapped, group_id) {
                Some(id) => push_unique(ids, id),
                None => tracing::debug!(
                    group = %group.group,
                    tag = %mapped,
                    "no matching tag; dropping"
                ),
            }
        }
    }
}

/// Keyword path: every keyword found in the lowercased note contributes its
/// tags, matched by name in any group.
pub fn infer_keyword_tags(note: &str, index: &TagIndex, mappings: &Mappings, ids: &mut Vec<i64>) {
    if note.is_empty() || mappings.keywords.is_empty() {
        return;
    }
    let haystack = note.to_lowercase();
    for rule in mappings.keywords.rules() {
        if !haystack.contains(&rule.keyword) {
            continue;
        }
        for name in &rule.tag_names {
            if let Some(id) = index.tag_by_name(name) {
                push_unique(ids, id);
            }
        }
    }
}

/// Tag ids for one record: structured ids first, keyword ids after, no
/// duplicates.
pub fn resolve_tags(
    source: &[PixelsTagGroup],
    note: Option<&str>,
    index: &TagIndex,
    mappings: &Mappings,
) -> Vec<i64> {
    let mut ids = Vec::new();
    convert_source_tags(source, index, mappings, &mut ids);
    if let Some(note) = note {
        infer_keyword_tags(note, index, mappings, &mut ids);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn tag(id: i64, name: &str, group: i64) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            id_tag_group: group,
            extra: Map::new(),
        }
    }

    fn group(id: i64, name: &str) -> TagGroup {
        TagGroup {
            id,
            name: name.to_string(),
            extra: Map::new(),
        }
    }

    fn source_group(name: &str, entries: &[&str]) -> PixelsTagGroup {
        PixelsTagGroup {
            group: name.to_string(),
            entries: entries.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn vocabulary() -> TagIndex {
        TagIndex::build(
            &[
                tag(10, "happy", 1),
                tag(11, "calm", 1),
                tag(20, "gym", 2),
                tag(21, "happy", 2),
                tag(30, "beach", 3),
            ],
            &[group(1, "Emotions"), group(2, "Activities"), group(3, "Places")],
        )
    }

    #[test]
    fn structured_tags_respect_group() {
        let index = vocabulary();
        let ids = resolve_tags(
            &[
                source_group("Activities", &["happy", "gym"]),
                source_group("Emotions", &["happy"]),
            ],
            None,
            &index,
            &Mappings::default(),
        );
        assert_eq!(ids, vec![21, 20, 10]);
    }

    #[test]
    fn unknown_group_and_unknown_tag_are_dropped() {
        let index = vocabulary();
        let ids = resolve_tags(
            &[
                source_group("Weather", &["sunny"]),
                source_group("Emotions", &["furious", "calm"]),
            ],
            None,
            &index,
            &Mappings::default(),
        );
        assert_eq!(ids, vec![11]);
    }

    #[test]
    fn name_mapping_applies_before_lookup() {
        let index = vocabulary();
        let mut mappings = Mappings::default();
        mappings.tag_names.insert("relaxed", "calm");
        let ids = resolve_tags(
            &[source_group("Emotions", &["relaxed"])],
            None,
            &index,
            &mappings,
        );
        assert_eq!(ids, vec![11]);
    }

    #[test]
    fn keyword_tags_follow_structured_and_skip_duplicates() {
        let index = vocabulary();
        let mut mappings = Mappings::default();
        mappings.keywords.push("workout", "gym");
        mappings.keywords.push("sand", "beach");
        mappings.keywords.push("sand", "gym");
        let ids = resolve_tags(
            &[source_group("Activities", &["gym"])],
            Some("Long WORKOUT then Sand castles"),
            &index,
            &mappings,
        );
        assert_eq!(ids, vec![20, 30]);
    }

    #[test]
    fn keyword_lookup_ignores_group_and_takes_first_name_match() {
        let index = vocabulary();
        let mut mappings = Mappings::default();
        mappings.keywords.push("smile", "happy");
        let ids = resolve_tags(&[], Some("a smile"), &index, &mappings);
        assert_eq!(ids, vec![10]);
    }

    #[test]
    fn no_keyword_tags_without_mapping_or_note() {
        let index = vocabulary();
        let mut mappings = Mappings::default();
        assert!(resolve_tags(&[], Some("workout"), &index, &mappings).is_empty());
        mappings.keywords.push("workout", "gym");
        assert!(resolve_tags(&[], None, &index, &mappings).is_empty());
        assert!(resolve_tags(&[], Some(""), &index, &mappings).is_empty());
    }

    #[test]
    fn duplicate_source_entries_collapse() {
        let index = vocabulary();
        let ids = resolve_tags(
            &[
                source_group("Emotions", &["calm", "calm"]),
                source_group("Emotions", &["calm"]),
            ],
            None,
            &index,
            &Mappings::default(),
        );
        assert_eq!(ids, vec![11]);
    }
}
