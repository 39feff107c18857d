use crate::dispatch::{DispatchTable, Outcome};
use crate::render::{project, RenderedView, ViewFlavor};
use portfolio_catalog::Catalog;
use portfolio_debounce::Debouncer;
use portfolio_protocol::UiEvent;
use portfolio_search::FilterState;
use portfolio_store::KvStore;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectorConfig {
    /// Quiet period before a typed query is applied.
    pub search_debounce: Duration,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(200),
        }
    }
}

/// Owns one container's filter state and keeps its rendered view current.
///
/// Every control in the container reports through [`ViewProjector::handle_control`],
/// so rows that appear after a re-render need no wiring of their own.
#[derive(Debug)]
pub struct ViewProjector {
    state: FilterState,
    flavor: ViewFlavor,
    table: DispatchTable,
    search: Debouncer<UiEvent>,
    view: RenderedView,
    renders: u64,
}

impl ViewProjector {
    pub fn new(state: FilterState, flavor: ViewFlavor, config: ProjectorConfig) -> Self {
        let view = project(&state, flavor);
        Self {
            state,
            flavor,
            table: DispatchTable::standard(),
            search: Debouncer::new(config.search_debounce),
            view,
            renders: 1,
        }
    }

    pub fn checklist(catalog: Rc<Catalog>, store: KvStore, config: ProjectorConfig) -> Self {
        Self::new(FilterState::load(catalog, store), ViewFlavor::Checklist, config)
    }

    pub fn resources(catalog: Rc<Catalog>, store: KvStore, config: ProjectorConfig) -> Self {
        Self::new(FilterState::load(catalog, store), ViewFlavor::Resources, config)
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub const fn flavor(&self) -> ViewFlavor {
        self.flavor
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    /// Rebuild the whole view from state. Repeating it without a state change
    /// yields an identical view.
    pub fn render(&mut self) -> &RenderedView {
        self.view = project(&self.state, self.flavor);
        self.renders += 1;
        &self.view
    }

    pub const fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn dispatch_table_mut(&mut self) -> &mut DispatchTable {
        &mut self.table
    }

    /// Route one event. Searches wait out the debounce window; a reset drops
    /// any search still waiting.
    pub fn handle(&mut self, event: UiEvent, now: Instant) -> Outcome {
        match event {
            UiEvent::Search { .. } => {
                self.search.call(event, now);
                Outcome::Deferred
            }
            UiEvent::Reset => {
                if self.search.cancel().is_some() {
                    log::debug!("projector: reset dropped a pending search");
                }
                self.apply(&event)
            }
            _ => self.apply(&event),
        }
    }

    /// Entry point for the container's single listener: the attribute and value
    /// found on whatever control was activated.
    pub fn handle_control(&mut self, attribute: &str, value: &str, now: Instant) -> Outcome {
        match UiEvent::from_control(attribute, value) {
            Some(event) => self.handle(event, now),
            None => Outcome::Ignored,
        }
    }

    /// Apply a search whose quiet period has elapsed by `now`.
    pub fn tick(&mut self, now: Instant) -> Outcome {
        match self.search.poll(now) {
            Some(event) => self.apply(&event),
            None => Outcome::Unchanged,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.next_deadline()
    }

    /// Apply a pending search immediately.
    pub fn flush(&mut self) -> Outcome {
        match self.search.flush() {
            Some(event) => self.apply(&event),
            None => Outcome::Unchanged,
        }
    }

    fn apply(&mut self, event: &UiEvent) -> Outcome {
        let outcome = self.table.dispatch(&mut self.state, event);
        if outcome.needs_render() {
            self.render();
        }
        outcome
    }
}
