use crate::{Field, ValidationMessage};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Form has {} problem(s)", messages.len())]
    Invalid {
        messages: Vec<ValidationMessage>,
        focus: Option<Field>,
    },

    #[error("Unknown form field: {0}")]
    UnknownField(String),
}
