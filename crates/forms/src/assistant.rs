use crate::validation::{text_len, truncate_utf16, validate_field};
use crate::{ContactForm, Field, FormError, Result, ValidationMessage};
use portfolio_debounce::Debouncer;
use portfolio_protocol::{Draft, DRAFT_KEY};
use portfolio_store::KvStore;
use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FormConfig {
    pub draft_debounce: Duration,
    pub max_message_chars: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            draft_debounce: Duration::from_millis(400),
            max_message_chars: 300,
        }
    }
}

/// The live "`len`/`max` characters" counter under the message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub len: usize,
    pub max: usize,
}

impl fmt::Display for CharCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} characters", self.len, self.max)
    }
}

#[derive(Debug)]
pub struct FormAssistant {
    store: KvStore,
    config: FormConfig,
    values: ContactForm,
    // Insertion-ordered and deduplicated.
    errors: Vec<ValidationMessage>,
    invalid: BTreeSet<Field>,
    autosave: Debouncer<()>,
}

impl FormAssistant {
    /// Restore any saved draft and validate it, so restored problems show immediately.
    pub fn new(store: KvStore, config: FormConfig) -> Self {
        let mut assistant = Self {
            store,
            config,
            values: ContactForm::default(),
            errors: Vec::new(),
            invalid: BTreeSet::new(),
            autosave: Debouncer::new(config.draft_debounce),
        };
        assistant.load_draft();
        assistant.validate_all();
        assistant
    }

    pub fn values(&self) -> &ContactForm {
        &self.values
    }

    pub fn config(&self) -> FormConfig {
        self.config
    }

    /// A keystroke in `field`: update the value, re-check that field and
    /// schedule a draft save.
    pub fn input(&mut self, field: Field, value: &str, now: Instant) {
        let value = if field == Field::Message {
            truncate_utf16(value, self.config.max_message_chars).to_string()
        } else {
            value.to_string()
        };
        self.values.set(field, value);
        self.validate(field);
        self.autosave.call((), now);
    }

    /// Focus left `field`.
    pub fn blur(&mut self, field: Field) {
        self.validate(field);
    }

    /// Save the draft if the autosave quiet period has passed. Returns whether it saved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.autosave.poll(now).is_some() {
            self.save_draft();
            true
        } else {
            false
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    pub fn validate(&mut self, field: Field) {
        let failing = validate_field(field, self.values.get(field));
        for &message in messages_for(field) {
            self.toggle_message(message, failing == Some(message));
        }
        if failing.is_some() {
            self.invalid.insert(field);
        } else {
            self.invalid.remove(&field);
        }
    }

    /// Re-check every field from scratch. Returns whether the form is valid.
    pub fn validate_all(&mut self) -> bool {
        self.errors.clear();
        self.invalid.clear();
        for field in Field::VALIDATED {
            self.validate(field);
        }
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationMessage] {
        &self.errors
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    /// The field that should receive focus after a rejected submit.
    pub fn first_invalid(&self) -> Option<Field> {
        Field::VALIDATED
            .into_iter()
            .find(|field| self.invalid.contains(field))
    }

    /// Final gate before sending. A valid form clears its draft.
    pub fn submit(&mut self) -> Result<ContactForm> {
        if !self.validate_all() {
            return Err(FormError::Invalid {
                messages: self.errors.clone(),
                focus: self.first_invalid(),
            });
        }
        self.autosave.cancel();
        self.clear_draft();
        Ok(self.values.clone())
    }

    /// The "clear draft" button: empty the form and forget everything.
    pub fn clear(&mut self) {
        self.values = ContactForm::default();
        self.autosave.cancel();
        self.clear_draft();
        self.errors.clear();
        self.invalid.clear();
    }

    pub fn save_draft(&self) {
        self.store.set(DRAFT_KEY, &self.values.to_draft());
    }

    /// Restore values from a stored draft. Returns whether one was found.
    pub fn load_draft(&mut self) -> bool {
        match self.store.get::<Option<Draft>>(DRAFT_KEY, None) {
            Some(draft) => {
                self.values = ContactForm::from_draft(&draft);
                true
            }
            None => false,
        }
    }

    pub fn clear_draft(&self) {
        self.store.remove(DRAFT_KEY);
    }

    pub fn char_count(&self) -> CharCount {
        CharCount {
            len: text_len(&self.values.message),
            max: self.config.max_message_chars,
        }
    }

    fn toggle_message(&mut self, message: ValidationMessage, present: bool) {
        let existing = self.errors.iter().position(|m| *m == message);
        match (present, existing) {
            (true, None) => self.errors.push(message),
            (false, Some(idx)) => {
                self.errors.remove(idx);
            }
            _ => {}
        }
    }
}

fn messages_for(field: Field) -> &'static [ValidationMessage] {
    match field {
        Field::Name => &[
            ValidationMessage::NameMissing,
            ValidationMessage::NameLooksWrong,
        ],
        Field::Email => &[ValidationMessage::EmailInvalid],
        Field::Message => &[ValidationMessage::MessageTooShort],
        Field::Topic => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_store::MemoryBackend;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn fill_valid(assistant: &mut FormAssistant, now: Instant) {
        assistant.input(Field::Name, "Ada Lovelace", now);
        assistant.input(Field::Email, "ada@example.org", now);
        assistant.input(Field::Message, "I enjoyed the unit 5 write-up.", now);
    }

    #[test]
    fn empty_form_reports_all_problems_in_order() {
        let assistant = FormAssistant::new(KvStore::in_memory(), FormConfig::default());
        assert_eq!(
            assistant.errors(),
            &[
                ValidationMessage::NameMissing,
                ValidationMessage::EmailInvalid,
                ValidationMessage::MessageTooShort,
            ]
        );
        assert_eq!(assistant.first_invalid(), Some(Field::Name));
    }

    #[test]
    fn live_validation_swaps_name_messages() {
        let t0 = Instant::now();
        let mut assistant = FormAssistant::new(KvStore::in_memory(), FormConfig::default());
        assistant.input(Field::Name, "J", t0);
        assert!(assistant.errors().contains(&ValidationMessage::NameLooksWrong));
        assert!(!assistant.errors().contains(&ValidationMessage::NameMissing));
        assert!(assistant.is_invalid(Field::Name));

        assistant.input(Field::Name, "Jo", t0);
        assert!(!assistant.is_invalid(Field::Name));
        assert_eq!(
            assistant.errors(),
            &[ValidationMessage::EmailInvalid, ValidationMessage::MessageTooShort]
        );
    }

    #[test]
    fn rejected_submit_points_at_first_invalid_field() {
        let t0 = Instant::now();
        let mut assistant = FormAssistant::new(KvStore::in_memory(), FormConfig::default());
        assistant.input(Field::Name, "Ada", t0);
        assistant.input(Field::Message, "too short", t0);

        let err = assistant.submit().unwrap_err();
        assert_eq!(
            err,
            FormError::Invalid {
                messages: vec![
                    ValidationMessage::EmailInvalid,
                    ValidationMessage::MessageTooShort
                ],
                focus: Some(Field::Email),
            }
        );
    }

    #[test]
    fn autosave_is_debounced() {
        let t0 = Instant::now();
        let backend = Rc::new(MemoryBackend::new());
        let mut assistant =
            FormAssistant::new(KvStore::from_shared(backend.clone()), FormConfig::default());

        assistant.input(Field::Name, "A", t0);
        assistant.input(Field::Name, "Ad", t0 + ms(100));
        assistant.input(Field::Name, "Ada", t0 + ms(200));
        assert!(!assistant.tick(t0 + ms(599)));
        assert_eq!(backend.write_count(), 0);

        assert!(assistant.tick(t0 + ms(600)));
        assert_eq!(backend.write_count(), 1);
        let draft: Draft = KvStore::from_shared(backend).get_or_default(DRAFT_KEY);
        assert_eq!(draft.get("name").map(String::as_str), Some("Ada"));
        assert_eq!(draft.get("topic").map(String::as_str), Some(""));
    }

    #[test]
    fn draft_is_restored_and_validated_on_startup() {
        let t0 = Instant::now();
        let backend = Rc::new(MemoryBackend::new());
        {
            let mut first =
                FormAssistant::new(KvStore::from_shared(backend.clone()), FormConfig::default());
            first.input(Field::Name, "Grace", t0);
            first.input(Field::Topic, "question", t0);
            first.tick(t0 + ms(400));
        }

        let restored = FormAssistant::new(KvStore::from_shared(backend), FormConfig::default());
        assert_eq!(restored.values().name, "Grace");
        assert_eq!(restored.values().topic, "question");
        assert_eq!(
            restored.errors(),
            &[ValidationMessage::EmailInvalid, ValidationMessage::MessageTooShort]
        );
    }

    #[test]
    fn successful_submit_clears_draft_and_pending_save() {
        let t0 = Instant::now();
        let backend = Rc::new(MemoryBackend::new());
        let mut assistant =
            FormAssistant::new(KvStore::from_shared(backend.clone()), FormConfig::default());
        fill_valid(&mut assistant, t0);
        assistant.save_draft();

        let sent = assistant.submit().expect("valid form");
        assert_eq!(sent.name, "Ada Lovelace");
        assert!(backend.raw(DRAFT_KEY).is_none());
        assert!(!assistant.tick(t0 + ms(10_000)));
        assert!(backend.raw(DRAFT_KEY).is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let t0 = Instant::now();
        let backend = Rc::new(MemoryBackend::new());
        let mut assistant =
            FormAssistant::new(KvStore::from_shared(backend.clone()), FormConfig::default());
        fill_valid(&mut assistant, t0);
        assistant.save_draft();
        assistant.input(Field::Email, "nope", t0);

        assistant.clear();
        assert_eq!(assistant.values(), &ContactForm::default());
        assert!(assistant.errors().is_empty());
        assert!(!assistant.is_invalid(Field::Email));
        assert!(backend.raw(DRAFT_KEY).is_none());
        assert_eq!(assistant.char_count().to_string(), "0/300 characters");
    }

    #[test]
    fn message_is_capped_at_max_length() {
        let t0 = Instant::now();
        let config = FormConfig {
            max_message_chars: 12,
            ..FormConfig::default()
        };
        let mut assistant = FormAssistant::new(KvStore::in_memory(), config);
        assistant.input(Field::Message, "ééééé ééééé ééééé", t0);
        assert_eq!(assistant.char_count(), CharCount { len: 12, max: 12 });
        assert_eq!(assistant.char_count().to_string(), "12/12 characters");
    }

    #[test]
    fn emoji_count_twice_towards_the_limit() {
        let config = FormConfig {
            max_message_chars: 5,
            ..FormConfig::default()
        };
        let mut assistant = FormAssistant::new(KvStore::in_memory(), config);
        assistant.input(Field::Message, "😀😀😀", Instant::now());
        assert_eq!(assistant.values().message, "😀😀");
        assert_eq!(assistant.char_count().to_string(), "4/5 characters");
    }

    #[test]
    fn corrupt_draft_is_ignored() {
        let backend = Rc::new(MemoryBackend::new());
        backend.insert_raw(DRAFT_KEY, "[1, 2");
        let assistant = FormAssistant::new(KvStore::from_shared(backend), FormConfig::default());
        assert_eq!(assistant.values(), &ContactForm::default());
    }
}
