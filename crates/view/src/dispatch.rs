use portfolio_protocol::{ActionKind, UiEvent};
use portfolio_search::FilterState;
use std::collections::HashMap;
use std::fmt;

/// What a handled event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; the view must be re-projected.
    Changed,
    Unchanged,
    /// No handler is registered for the event's action.
    Ignored,
    /// Held back by a debouncer and applied later.
    Deferred,
}

impl Outcome {
    pub const fn needs_render(self) -> bool {
        matches!(self, Outcome::Changed)
    }
}

pub type Handler = fn(&mut FilterState, &UiEvent) -> Outcome;

/// Action kind to handler lookup, replacing a chain of matches at the call site.
#[derive(Clone, Default)]
pub struct DispatchTable {
    handlers: HashMap<ActionKind, Handler>,
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort_by_key(|k| format!("{k:?}"));
        f.debug_struct("DispatchTable").field("handles", &kinds).finish()
    }
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with a handler for every [`ActionKind`].
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(ActionKind::ToggleCompletion, toggle_completion);
        table.register(ActionKind::Search, search);
        table.register(ActionKind::ToggleTag, toggle_tag);
        table.register(ActionKind::Reset, reset);
        table
    }

    /// Install `handler` for `kind`, returning the one it replaces.
    pub fn register(&mut self, kind: ActionKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert(kind, handler)
    }

    pub fn remove(&mut self, kind: ActionKind) -> Option<Handler> {
        self.handlers.remove(&kind)
    }

    pub fn handles(&self, kind: ActionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn dispatch(&self, state: &mut FilterState, event: &UiEvent) -> Outcome {
        match self.handlers.get(&event.kind()) {
            Some(handler) => handler(state, event),
            None => {
                log::debug!("dispatch: no handler for {:?}", event.kind());
                Outcome::Ignored
            }
        }
    }
}

fn toggle_completion(state: &mut FilterState, event: &UiEvent) -> Outcome {
    let UiEvent::ToggleCompletion { entry_id } = event else {
        return Outcome::Ignored;
    };
    state.toggle_completion(entry_id);
    Outcome::Changed
}

fn search(state: &mut FilterState, event: &UiEvent) -> Outcome {
    let UiEvent::Search { text } = event else {
        return Outcome::Ignored;
    };
    let before = state.query().to_string();
    state.set_query(text);
    if state.query() == before {
        Outcome::Unchanged
    } else {
        Outcome::Changed
    }
}

fn toggle_tag(state: &mut FilterState, event: &UiEvent) -> Outcome {
    let UiEvent::ToggleTag { tag } = event else {
        return Outcome::Ignored;
    };
    state.toggle_tag(tag);
    Outcome::Changed
}

fn reset(state: &mut FilterState, _event: &UiEvent) -> Outcome {
    if state.query().is_empty() && state.active_tags().is_empty() {
        return Outcome::Unchanged;
    }
    state.reset();
    Outcome::Changed
}
