//! Read-only layers over a [`RenderedView`]. They derive what they show from
//! the view and never touch completion data.

use crate::render::RenderedView;
use portfolio_protocol::HIDE_COMPLETED_KEY;
use portfolio_store::KvStore;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

impl Progress {
    /// `None` when the view has no rows to count.
    pub fn from_view(view: &RenderedView) -> Option<Self> {
        let total = view.rows().count();
        if total == 0 {
            return None;
        }
        let done = view.rows().filter(|r| r.complete).count();
        // round half up, in integers
        let percent = (done * 200 + total) / (2 * total);
        Some(Self {
            done,
            total,
            percent: u8::try_from(percent).unwrap_or(100),
        })
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} done ({}%)", self.done, self.total, self.percent)
    }
}

/// Persisted "hide completed" preference.
#[derive(Debug, Clone)]
pub struct HideCompleted {
    store: KvStore,
    hide: bool,
}

impl HideCompleted {
    pub fn load(store: KvStore) -> Self {
        let hide = store.get(HIDE_COMPLETED_KEY, false);
        Self { store, hide }
    }

    pub const fn is_enabled(&self) -> bool {
        self.hide
    }

    pub fn set(&mut self, hide: bool) {
        self.hide = hide;
        self.store.set(HIDE_COMPLETED_KEY, &hide);
    }

    pub fn toggle(&mut self) -> bool {
        self.set(!self.hide);
        self.hide
    }

    /// The view as displayed: completed rows dropped when enabled.
    pub fn apply(&self, view: &RenderedView) -> RenderedView {
        let mut shown = view.clone();
        if self.hide {
            for group in &mut shown.groups {
                group.rows.retain(|r| !r.complete);
            }
        }
        shown
    }
}

/// Visible resource rows, zero when only empty messages are shown.
pub fn resource_count(view: &RenderedView) -> usize {
    view.rows().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{project, ViewFlavor};
    use portfolio_catalog::Catalog;
    use portfolio_protocol::{CatalogEntry, Group};
    use portfolio_search::FilterState;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn state(store: KvStore, n: usize) -> FilterState {
        let entries = (1..=n)
            .map(|i| CatalogEntry::new(format!("e{i}"), "u1", format!("Step {i}"), ""))
            .collect();
        let catalog = Catalog::new(vec![Group::new("u1", "Unit 1")], entries).unwrap();
        FilterState::load(Rc::new(catalog), store)
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        let mut state = state(KvStore::in_memory(), 3);
        state.toggle_completion("e1");
        let progress = Progress::from_view(&project(&state, ViewFlavor::Checklist)).unwrap();
        assert_eq!(progress.percent, 33);
        assert_eq!(progress.label(), "1/3 done (33%)");

        state.toggle_completion("e2");
        let progress = Progress::from_view(&project(&state, ViewFlavor::Checklist)).unwrap();
        assert_eq!(progress.label(), "2/3 done (67%)");
    }

    #[test]
    fn progress_is_absent_without_rows() {
        let mut state = state(KvStore::in_memory(), 2);
        state.set_query("no such step");
        assert_eq!(Progress::from_view(&project(&state, ViewFlavor::Checklist)), None);
    }

    #[test]
    fn hide_completed_filters_display_and_persists() {
        let store = KvStore::in_memory();
        let mut state = state(store.clone(), 2);
        state.toggle_completion("e1");
        let view = project(&state, ViewFlavor::Checklist);

        let mut hide = HideCompleted::load(store.clone());
        assert!(!hide.is_enabled());
        assert_eq!(hide.apply(&view), view);

        assert!(hide.toggle());
        let shown = hide.apply(&view);
        let ids: Vec<&str> = shown.rows().map(|r| r.entry_id.as_str()).collect();
        assert_eq!(ids, vec!["e2"]);
        // progress still reads the full view
        assert_eq!(Progress::from_view(&view).unwrap().label(), "1/2 done (50%)");

        assert!(HideCompleted::load(store).is_enabled());
    }

    #[test]
    fn resource_count_follows_visible_rows() {
        let mut state = state(KvStore::in_memory(), 4);
        assert_eq!(resource_count(&project(&state, ViewFlavor::Resources)), 4);
        state.set_query("step 3");
        assert_eq!(resource_count(&project(&state, ViewFlavor::Resources)), 1);
        state.set_query("zzz");
        assert_eq!(resource_count(&project(&state, ViewFlavor::Resources)), 0);
    }
}
