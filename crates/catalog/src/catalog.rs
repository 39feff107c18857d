use crate::{CatalogError, Result};
use portfolio_protocol::{CatalogEntry, Group};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

#[derive(Deserialize)]
struct RawCatalog {
    groups: Vec<Group>,
    #[serde(default, alias = "steps", alias = "resources")]
    entries: Vec<CatalogEntry>,
}

/// Ordered groups and the entries that belong to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<Group>,
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(groups: Vec<Group>, entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut group_ids = HashSet::with_capacity(groups.len());
        for group in &groups {
            if group.id.trim().is_empty() {
                return Err(CatalogError::EmptyId("group"));
            }
            if !group_ids.insert(group.id.as_str()) {
                return Err(CatalogError::DuplicateGroup(group.id.clone()));
            }
        }

        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId("entry"));
            }
            if !group_ids.contains(entry.group_id.as_str()) {
                return Err(CatalogError::UnknownGroup {
                    entry: entry.id.clone(),
                    group: entry.group_id.clone(),
                });
            }
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateEntry(entry.id.clone()));
            }
        }

        log::debug!(
            "Catalog loaded: {} groups, {} entries",
            groups.len(),
            entries.len()
        );
        Ok(Self {
            groups,
            entries,
            by_id,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(raw)?;
        Self::new(raw.groups, raw.entries)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        log::info!(
            "Loaded catalog {} ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Entries of `group_id` in definition order. Unknown groups yield nothing.
    pub fn entries_of<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries.iter().filter(move |e| e.group_id == group_id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Every tag used by any entry, sorted and deduplicated.
    pub fn all_tags(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|e| e.tags.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit_catalog() -> Catalog {
        Catalog::new(
            vec![Group::new("u1", "Unit 1"), Group::new("u2", "Unit 2")],
            vec![
                CatalogEntry::new("e1", "u1", "Draft personas", "#"),
                CatalogEntry::new("e3", "u2", "Validate HTML", "#"),
                CatalogEntry::new("e2", "u1", "Write diary", "#"),
            ],
        )
        .expect("valid catalog")
    }

    #[test]
    fn entries_keep_definition_order_within_group() {
        let catalog = unit_catalog();
        let ids: Vec<&str> = catalog.entries_of("u1").map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[test]
    fn unknown_group_yields_nothing() {
        let catalog = unit_catalog();
        assert_eq!(catalog.entries_of("nope").count(), 0);
        assert!(catalog.group("nope").is_none());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = unit_catalog();
        assert_eq!(catalog.entry("e3").map(|e| e.text.as_str()), Some("Validate HTML"));
        assert!(catalog.entry("e9").is_none());
        assert!(catalog.contains("e2"));
    }

    #[test]
    fn rejects_dangling_group_reference() {
        let err = Catalog::new(
            vec![Group::new("u1", "Unit 1")],
            vec![CatalogEntry::new("e1", "u9", "Orphan", "#")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownGroup { ref group, .. } if group == "u9"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dup_group = Catalog::new(
            vec![Group::new("u1", "A"), Group::new("u1", "B")],
            Vec::new(),
        );
        assert!(matches!(dup_group, Err(CatalogError::DuplicateGroup(_))));

        let dup_entry = Catalog::new(
            vec![Group::new("u1", "A")],
            vec![
                CatalogEntry::new("e1", "u1", "one", "#"),
                CatalogEntry::new("e1", "u1", "two", "#"),
            ],
        );
        assert!(matches!(dup_entry, Err(CatalogError::DuplicateEntry(id)) if id == "e1"));
    }

    #[test]
    fn rejects_blank_ids() {
        let err = Catalog::new(vec![Group::new(" ", "Blank")], Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId("group")));
    }

    #[test]
    fn all_tags_sorted_and_deduplicated() {
        let catalog = Catalog::new(
            vec![Group::new("resources", "All resources")],
            vec![
                CatalogEntry::new("a", "resources", "A", "").with_tags(["Unit 2", "HTML"]),
                CatalogEntry::new("b", "resources", "B", "").with_tags(["HTML", "Accessibility"]),
            ],
        )
        .unwrap();
        assert_eq!(catalog.all_tags(), vec!["Accessibility", "HTML", "Unit 2"]);
    }

    #[test]
    fn parses_legacy_steps_field() {
        let raw = r##"{
            "groups": [{"id": "u1", "title": "Unit 1"}],
            "steps": [{"id": "u1-s1", "unit": "u1", "text": "Draft personas", "link": "#"}]
        }"##;
        let catalog = Catalog::from_json_str(raw).expect("catalog");
        assert_eq!(catalog.len(), 1);
    }
}
