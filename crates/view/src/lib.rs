//! # Portfolio View
//!
//! Turns filter state into something a renderer can draw, and turns what the
//! user does back into filter-state calls.
//!
//! ```text
//! control click / keystroke
//!     │
//!     ├──> UiEvent ──> ViewProjector::handle
//!     │                   ├─ search text ──> debouncer ──tick──┐
//!     │                   └─ toggle / tag / reset ─────────────┤
//!     │                                                        ▼
//!     │                                          DispatchTable ──> FilterState
//!     │                                                        │
//!     └──────────────<── RenderedView <── full re-projection ──┘
//!                          │
//!                          └──> enhancements (progress, hide completed, counter)
//! ```

mod dispatch;
mod enhance;
mod projector;
mod render;
mod theme;

pub use dispatch::{DispatchTable, Handler, Outcome};
pub use enhance::{resource_count, HideCompleted, Progress};
pub use projector::{ProjectorConfig, ViewProjector};
pub use render::{project, ChipView, GroupView, RenderedView, RowView, ViewFlavor};
pub use theme::ThemeToggle;
