use crate::Field;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

pub const MIN_NAME_LETTERS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMessage {
    NameMissing,
    NameLooksWrong,
    EmailInvalid,
    MessageTooShort,
}

impl ValidationMessage {
    pub const fn text(self) -> &'static str {
        match self {
            ValidationMessage::NameMissing => "Please enter your name.",
            ValidationMessage::NameLooksWrong => {
                "Please enter your real name (at least two letters)."
            }
            ValidationMessage::EmailInvalid => "Please enter a valid email address.",
            ValidationMessage::MessageTooShort => {
                "Please enter a longer message (at least 10 characters)."
            }
        }
    }

    pub const fn field(self) -> Field {
        match self {
            ValidationMessage::NameMissing | ValidationMessage::NameLooksWrong => Field::Name,
            ValidationMessage::EmailInvalid => Field::Email,
            ValidationMessage::MessageTooShort => Field::Message,
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

// Latin letters including the Latin-1 accented range; `×` and `÷` are excluded.
fn is_name_letter(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | 'À'..='Ö' | 'Ø'..='ö' | 'ø'..='ÿ')
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

/// Length in UTF-16 code units, the unit browsers count in: one emoji is two.
pub fn text_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Longest prefix of `value` within `max` UTF-16 units, never splitting a character.
pub(crate) fn truncate_utf16(value: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, c) in value.char_indices() {
        used += c.len_utf16();
        if used > max {
            return &value[..idx];
        }
    }
    value
}

/// `None` when the name is acceptable.
pub fn validate_name(raw: &str) -> Option<ValidationMessage> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(ValidationMessage::NameMissing);
    }
    let letters = value.chars().filter(|c| is_name_letter(*c)).count();
    (letters < MIN_NAME_LETTERS).then_some(ValidationMessage::NameLooksWrong)
}

pub fn validate_email(raw: &str) -> Option<ValidationMessage> {
    let value = raw.trim();
    let ok = !value.is_empty() && email_pattern().is_match(value);
    (!ok).then_some(ValidationMessage::EmailInvalid)
}

pub fn validate_message(raw: &str) -> Option<ValidationMessage> {
    (text_len(raw.trim()) < MIN_MESSAGE_CHARS).then_some(ValidationMessage::MessageTooShort)
}

/// The rule for `field`; fields without rules always pass.
pub(crate) fn validate_field(field: Field, raw: &str) -> Option<ValidationMessage> {
    match field {
        Field::Name => validate_name(raw),
        Field::Email => validate_email(raw),
        Field::Message => validate_message(raw),
        Field::Topic => None,
    }
}
