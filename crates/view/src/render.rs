use portfolio_protocol::{CatalogEntry, STEP_ID_ATTR, TAG_ATTR};
use portfolio_search::{FilterState, QueryMatcher};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFlavor {
    /// Course units with "Mark done" toggles.
    Checklist,
    /// Resource finder with tag chips and highlighted matches.
    Resources,
}

impl ViewFlavor {
    pub const fn empty_message(self) -> &'static str {
        match self {
            ViewFlavor::Checklist => "No matching steps.",
            ViewFlavor::Resources => "No matching resources.",
        }
    }

    pub const fn highlights(self) -> bool {
        matches!(self, ViewFlavor::Resources)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub entry_id: String,
    pub text: String,
    /// `text` with query matches wrapped in `<mark>`.
    pub text_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    pub link: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub complete: bool,
}

impl RowView {
    fn from_entry(entry: &CatalogEntry, complete: bool, matcher: Option<&QueryMatcher>) -> Self {
        let mark = |text: &str| match matcher {
            Some(matcher) => matcher.highlight(text),
            None => text.to_string(),
        };
        Self {
            entry_id: entry.id.clone(),
            text: entry.text.clone(),
            text_html: mark(&entry.text),
            description: entry.description.clone(),
            description_html: entry.description.as_deref().map(mark),
            link: entry.href().to_string(),
            tags: entry.tags.clone(),
            complete,
        }
    }

    pub const fn toggle_label(&self) -> &'static str {
        if self.complete {
            "✓ Done"
        } else {
            "Mark done"
        }
    }

    /// The data attribute a renderer puts on this row's toggle control.
    pub fn control(&self) -> (&'static str, &str) {
        (STEP_ID_ATTR, &self.entry_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: String,
    pub title: String,
    pub rows: Vec<RowView>,
    /// Shown instead of the rows when nothing matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipView {
    pub tag: String,
    pub pressed: bool,
}

impl ChipView {
    pub fn control(&self) -> (&'static str, &str) {
        (TAG_ATTR, &self.tag)
    }
}

/// Everything a renderer needs for one container, derived from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub flavor: ViewFlavor,
    pub query: String,
    pub groups: Vec<GroupView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chips: Vec<ChipView>,
}

impl RenderedView {
    pub fn rows(&self) -> impl Iterator<Item = &RowView> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }

    pub fn group(&self, id: &str) -> Option<&GroupView> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn row(&self, entry_id: &str) -> Option<&RowView> {
        self.rows().find(|r| r.entry_id == entry_id)
    }
}

/// Derive the visible view of `state`. Pure: equal state gives an equal view.
pub fn project(state: &FilterState, flavor: ViewFlavor) -> RenderedView {
    let matcher = state.query_matcher();
    let highlight = (flavor.highlights() && !matcher.is_empty()).then_some(&matcher);

    let groups = state
        .catalog()
        .groups()
        .iter()
        .map(|group| {
            let rows: Vec<RowView> = state
                .visible_entries_with(&group.id, &matcher)
                .into_iter()
                .map(|entry| RowView::from_entry(entry, state.is_complete(&entry.id), highlight))
                .collect();
            let empty_message = rows.is_empty().then(|| flavor.empty_message());
            GroupView {
                id: group.id.clone(),
                title: group.title.clone(),
                rows,
                empty_message,
            }
        })
        .collect();

    let chips = match flavor {
        ViewFlavor::Resources => state
            .catalog()
            .all_tags()
            .into_iter()
            .map(|tag| ChipView {
                tag: tag.to_string(),
                pressed: state.is_tag_active(tag),
            })
            .collect(),
        ViewFlavor::Checklist => Vec::new(),
    };

    RenderedView {
        flavor,
        query: state.query().to_string(),
        groups,
        chips,
    }
}
