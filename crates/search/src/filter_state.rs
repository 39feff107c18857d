use crate::QueryMatcher;
use portfolio_catalog::Catalog;
use portfolio_protocol::{CatalogEntry, CompletionMap, COMPLETION_KEY};
use portfolio_store::KvStore;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Query, tag selection and completion progress over one catalog.
///
/// `query` and `active_tags` live for the session only. `completion` is loaded
/// from the store on construction and written back in full on every toggle.
#[derive(Debug)]
pub struct FilterState {
    catalog: Rc<Catalog>,
    store: KvStore,
    completion_key: String,
    query: String,
    // trimmed but not case-folded, for highlighting
    typed_query: String,
    active_tags: BTreeSet<String>,
    completion: CompletionMap,
}

impl FilterState {
    pub fn load(catalog: Rc<Catalog>, store: KvStore) -> Self {
        Self::with_key(catalog, store, COMPLETION_KEY)
    }

    /// Like [`FilterState::load`], persisting completion under `completion_key`.
    pub fn with_key(catalog: Rc<Catalog>, store: KvStore, completion_key: impl Into<String>) -> Self {
        let completion_key = completion_key.into();
        let completion = store.get_or_default(&completion_key);
        Self {
            catalog,
            store,
            completion_key,
            query: String::new(),
            typed_query: String::new(),
            active_tags: BTreeSet::new(),
            completion,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Flip `entry_id`, persist the whole map and return the new value.
    pub fn toggle_completion(&mut self, entry_id: &str) -> bool {
        if !self.catalog.contains(entry_id) {
            log::debug!("filter: toggling {entry_id}, which is not in the catalog");
        }
        let next = !self.is_complete(entry_id);
        self.completion.insert(entry_id.to_string(), next);
        self.store.set(&self.completion_key, &self.completion);
        next
    }

    pub fn is_complete(&self, entry_id: &str) -> bool {
        self.completion.get(entry_id).copied().unwrap_or(false)
    }

    pub fn completion(&self) -> &CompletionMap {
        &self.completion
    }

    /// Completed entries that exist in the catalog.
    pub fn completed_count(&self) -> usize {
        self.catalog
            .entries()
            .iter()
            .filter(|e| self.is_complete(&e.id))
            .count()
    }

    /// Re-read completion from the store, as a page reload would.
    pub fn reload(&mut self) {
        self.completion = self.store.get_or_default(&self.completion_key);
    }

    pub fn set_query(&mut self, text: &str) {
        self.typed_query = text.trim().to_string();
        self.query = self.typed_query.to_lowercase();
    }

    /// The case-folded query used for matching.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query as typed, trimmed.
    pub fn typed_query(&self) -> &str {
        &self.typed_query
    }

    /// Add `tag` to the active set if absent, else remove it. Returns whether it is now active.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.active_tags.remove(tag) {
            false
        } else {
            self.active_tags.insert(tag.to_string());
            true
        }
    }

    pub fn is_tag_active(&self, tag: &str) -> bool {
        self.active_tags.contains(tag)
    }

    pub fn active_tags(&self) -> &BTreeSet<String> {
        &self.active_tags
    }

    /// Clear query and tags. Completion is untouched.
    pub fn reset(&mut self) {
        self.query.clear();
        self.typed_query.clear();
        self.active_tags.clear();
    }

    /// Built from the typed text: folding first can change a character's
    /// length, and the highlight would then miss it.
    pub fn query_matcher(&self) -> QueryMatcher {
        QueryMatcher::new(&self.typed_query)
    }

    /// Entries of `group_id` passing the tag and query filters, in catalog order.
    pub fn visible_entries(&self, group_id: &str) -> Vec<&CatalogEntry> {
        let matcher = self.query_matcher();
        self.visible_entries_with(group_id, &matcher)
    }

    pub fn visible_entries_with<'a>(
        &'a self,
        group_id: &str,
        matcher: &QueryMatcher,
    ) -> Vec<&'a CatalogEntry> {
        self.catalog
            .entries()
            .iter()
            .filter(|e| e.group_id == group_id)
            .filter(|e| e.has_all_tags(&self.active_tags))
            .filter(|e| matcher.matches_any(e.search_fields()))
            .collect()
    }
}
