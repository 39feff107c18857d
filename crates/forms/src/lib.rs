//! # Portfolio Forms
//!
//! The contact-form assistant: live validation with a deduplicated error list,
//! a debounced draft autosave and a character counter.
//!
//! ```text
//! input(field, value, now) ──> live validation of that field
//!          │
//!          └──> autosave debouncer ──tick(now)──> u5_contact_draft
//!
//! submit() ──> validate all ──ok──> clear draft, hand values to the sender
//!                          └─err──> messages + field to focus
//! ```

mod assistant;
mod error;
mod fields;
mod validation;

pub use assistant::{CharCount, FormAssistant, FormConfig};
pub use error::{FormError, Result};
pub use fields::{ContactForm, Field};
pub use validation::{
    text_len, validate_email, validate_message, validate_name, ValidationMessage, MIN_MESSAGE_CHARS,
    MIN_NAME_LETTERS,
};
