//! UI events flowing from a renderer back into the core.
//!
//! Renderers tag interactive controls with a data attribute; a single delegated
//! listener turns the attribute of the triggering control into a [`UiEvent`]
//! and hands it to the projector's dispatch table, keyed by [`ActionKind`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Attribute carried by checklist toggle buttons.
pub const STEP_ID_ATTR: &str = "data-step-id";
/// Attribute carried by resource tag chips.
pub const TAG_ATTR: &str = "data-tag";
/// Attribute carried by generic action buttons (`reset`).
pub const ACTION_ATTR: &str = "data-action";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ToggleCompletion,
    Search,
    ToggleTag,
    Reset,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiEvent {
    ToggleCompletion { entry_id: String },
    Search { text: String },
    ToggleTag { tag: String },
    Reset,
}

impl UiEvent {
    pub const fn kind(&self) -> ActionKind {
        match self {
            UiEvent::ToggleCompletion { .. } => ActionKind::ToggleCompletion,
            UiEvent::Search { .. } => ActionKind::Search,
            UiEvent::ToggleTag { .. } => ActionKind::ToggleTag,
            UiEvent::Reset => ActionKind::Reset,
        }
    }

    /// Event for a click on a control carrying `attribute="value"`.
    /// Controls without a recognised attribute produce no event.
    pub fn from_control(attribute: &str, value: &str) -> Option<Self> {
        match attribute {
            STEP_ID_ATTR if !value.is_empty() => Some(UiEvent::ToggleCompletion {
                entry_id: value.to_string(),
            }),
            TAG_ATTR if !value.is_empty() => Some(UiEvent::ToggleTag {
                tag: value.to_string(),
            }),
            ACTION_ATTR if value == "reset" => Some(UiEvent::Reset),
            _ => None,
        }
    }
}

/// A [`UiEvent`] stamped with its arrival time, relative to the start of a session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct TimedEvent {
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: UiEvent,
}
