use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub mod events;

pub use events::{ActionKind, TimedEvent, UiEvent, ACTION_ATTR, STEP_ID_ATTR, TAG_ATTR};

/// Storage key of the checklist completion map.
pub const COMPLETION_KEY: &str = "u5_checklist_completion";
/// Storage key of the unsubmitted contact-form draft.
pub const DRAFT_KEY: &str = "u5_contact_draft";
/// Storage key of the explicit theme choice.
pub const THEME_KEY: &str = "site-theme";
/// Storage key of the "hide completed" checklist preference.
pub const HIDE_COMPLETED_KEY: &str = "u6_hide_completed";

/// Persisted mapping from entry id to done/not-done. Absence and `false` are equivalent.
pub type CompletionMap = BTreeMap<String, bool>;

/// Persisted mapping from form-field name to its last entered value.
pub type Draft = BTreeMap<String, String>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Group {
    pub id: String,
    pub title: String,
}

impl Group {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One checklist step or one resource-list item.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(alias = "unit")]
    pub group_id: String,
    #[serde(alias = "title")]
    pub text: String,
    #[serde(default, alias = "url")]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        text: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            text: text.into(),
            link: link.into(),
            description: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Link target, `#` when the entry has none.
    pub fn href(&self) -> &str {
        if self.link.trim().is_empty() {
            "#"
        } else {
            &self.link
        }
    }

    /// True when every tag in `required` is carried by this entry.
    pub fn has_all_tags(&self, required: &BTreeSet<String>) -> bool {
        required.iter().all(|tag| self.tags.iter().any(|t| t == tag))
    }

    /// Display text followed by the description, if any.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.text.as_str()).chain(self.description.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry_accepts_checklist_field_names() {
        let raw = r##"{"id":"u1-s1","unit":"u1","text":"Draft personas","link":"#"}"##;
        let entry: CatalogEntry = serde_json::from_str(raw).expect("entry");
        assert_eq!(entry, CatalogEntry::new("u1-s1", "u1", "Draft personas", "#"));
    }

    #[test]
    fn entry_accepts_resource_field_names() {
        let raw = r#"{
            "id": "mdn-html",
            "group_id": "resources",
            "title": "MDN HTML",
            "url": "https://developer.mozilla.org/docs/Web/HTML",
            "description": "Authoritative HTML documentation.",
            "tags": ["Unit 2", "HTML"]
        }"#;
        let entry: CatalogEntry = serde_json::from_str(raw).expect("entry");
        assert_eq!(entry.text, "MDN HTML");
        assert_eq!(entry.link, "https://developer.mozilla.org/docs/Web/HTML");
        assert_eq!(entry.tags, vec!["Unit 2".to_string(), "HTML".to_string()]);
        assert_eq!(
            entry.search_fields().collect::<Vec<_>>(),
            vec!["MDN HTML", "Authoritative HTML documentation."]
        );
    }

    #[test]
    fn missing_link_renders_as_hash() {
        let entry = CatalogEntry::new("a", "g", "text", "  ");
        assert_eq!(entry.href(), "#");
    }

    #[test]
    fn tag_superset_check() {
        let entry = CatalogEntry::new("a", "g", "t", "").with_tags(["HTML", "Unit 2"]);
        let mut required = BTreeSet::new();
        assert!(entry.has_all_tags(&required));
        required.insert("HTML".to_string());
        assert!(entry.has_all_tags(&required));
        required.insert("CSS".to_string());
        assert!(!entry.has_all_tags(&required));
    }

    #[test]
    fn theme_round_trips_through_json() {
        let raw = serde_json::to_string(&Theme::Dark).expect("json");
        assert_eq!(raw, "\"dark\"");
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
