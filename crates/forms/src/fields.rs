use crate::FormError;
use portfolio_protocol::Draft;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Topic,
    Message,
}

impl Field {
    /// Every field saved in a draft.
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Topic, Field::Message];
    /// Fields with validation rules, in focus order.
    pub const VALIDATED: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Topic => "topic",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "topic" => Ok(Field::Topic),
            // Older pages named the textarea `msg`.
            "message" | "msg" => Ok(Field::Message),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

/// Current values of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub message: String,
}

impl ContactForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Topic => &self.topic,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Topic => self.topic = value,
            Field::Message => self.message = value,
        }
    }

    pub fn to_draft(&self) -> Draft {
        Field::ALL
            .iter()
            .map(|f| (f.as_str().to_string(), self.get(*f).to_string()))
            .collect()
    }

    /// Values from a stored draft. Unknown keys are ignored, missing ones read as empty.
    pub fn from_draft(draft: &Draft) -> Self {
        let mut form = Self::default();
        for (key, value) in draft {
            match key.parse::<Field>() {
                Ok(field) => form.set(field, value.as_str()),
                Err(_) => log::debug!("forms: ignoring draft key {key}"),
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn draft_keys_are_field_names() {
        let form = ContactForm {
            name: "Ada".into(),
            email: "ada@example.org".into(),
            topic: "feedback".into(),
            message: "Lovely portfolio".into(),
        };
        let draft = form.to_draft();
        let keys: Vec<&str> = draft.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["email", "message", "name", "topic"]);
        assert_eq!(ContactForm::from_draft(&draft), form);
    }

    #[test]
    fn legacy_msg_key_restores_message() {
        let mut draft = Draft::new();
        draft.insert("msg".into(), "Hello there, tutor".into());
        draft.insert("extra".into(), "ignored".into());
        let form = ContactForm::from_draft(&draft);
        assert_eq!(form.message, "Hello there, tutor");
        assert_eq!(form.name, "");
    }

    #[test]
    fn unknown_field_is_an_error() {
        assert_eq!(
            "phone".parse::<Field>(),
            Err(FormError::UnknownField("phone".into()))
        );
    }
}
