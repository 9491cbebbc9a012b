#![forbid(unsafe_code)]

//! Contact form draft and its validation flow.
//!
//! The validator keeps one [`ContactDraft`] for the page. Raw field values
//! are trimmed into the draft on every input change and again at submit
//! time. Submission runs the rules in a fixed order and reports only the
//! first failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validation::{Email, MinLength, ValidationError, Validator};

/// One of the three contact form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    /// All fields in rule order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// The `name` attribute of the form control.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Untrimmed values read from the form controls. `None` means the control is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl RawFields {
    #[must_use]
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            message: Some(message.to_owned()),
        }
    }
}

/// Trimmed, not-yet-submitted copy of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    /// Build a draft from raw values, trimming each and mapping absent values to "".
    #[must_use]
    pub fn from_raw(raw: &RawFields) -> Self {
        fn clean(value: Option<&String>) -> String {
            value.map(|v| v.trim().to_owned()).unwrap_or_default()
        }
        Self {
            name: clean(raw.name.as_ref()),
            email: clean(raw.email.as_ref()),
            message: clean(raw.message.as_ref()),
        }
    }

    #[must_use]
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

/// Rule thresholds, in UTF-16 code units of the trimmed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRules {
    pub name_min_chars: usize,
    pub message_min_chars: usize,
}

impl Default for ContactRules {
    fn default() -> Self {
        Self {
            name_min_chars: 2,
            message_min_chars: 10,
        }
    }
}

/// User-facing message templates. `{min}` is replaced with the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessages {
    pub name_too_short: String,
    pub invalid_email: String,
    pub message_too_short: String,
    pub success: String,
}

impl Default for ContactMessages {
    fn default() -> Self {
        Self {
            name_too_short: "Name must be at least {min} characters.".into(),
            invalid_email: "Please enter a valid email address.".into(),
            message_too_short: "Message must be at least {min} characters.".into(),
            success: "Thanks, your message has been received.".into(),
        }
    }
}

/// Which rule rejected the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NameTooShort,
    InvalidEmail,
    MessageTooShort,
}

impl FailureKind {
    /// The field that the rule checks.
    #[must_use]
    pub const fn field(self) -> ContactField {
        match self {
            Self::NameTooShort => ContactField::Name,
            Self::InvalidEmail => ContactField::Email,
            Self::MessageTooShort => ContactField::Message,
        }
    }
}

/// First failing rule for a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFailure {
    pub kind: FailureKind,
    pub error: ValidationError,
}

impl ContactFailure {
    #[must_use]
    pub fn field(&self) -> ContactField {
        self.kind.field()
    }

    /// Message shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.format_message()
    }
}

impl fmt::Display for ContactFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl std::error::Error for ContactFailure {}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft passed every rule and has been cleared; the form should be reset.
    Accepted { message: String },
    /// The draft was rejected; `focus` is the first offending field.
    Rejected {
        failure: ContactFailure,
        focus: ContactField,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The single message to display for this outcome.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Accepted { message } => message.clone(),
            Self::Rejected { failure, .. } => failure.message(),
        }
    }
}

/// Owns the page's contact draft and applies the contact rules.
#[derive(Debug, Clone, Default)]
pub struct ContactValidator {
    rules: ContactRules,
    messages: ContactMessages,
    draft: ContactDraft,
}

impl ContactValidator {
    #[must_use]
    pub fn new(rules: ContactRules, messages: ContactMessages) -> Self {
        Self {
            rules,
            messages,
            draft: ContactDraft::default(),
        }
    }

    #[must_use]
    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    #[must_use]
    pub fn rules(&self) -> ContactRules {
        self.rules
    }

    /// Overwrite the stored draft with trimmed copies of `raw`.
    pub fn sync_draft(&mut self, raw: &RawFields) -> &ContactDraft {
        self.draft = ContactDraft::from_raw(raw);
        &self.draft
    }

    /// Check `draft` against the rules; the first failure wins.
    pub fn validate(&self, draft: &ContactDraft) -> Result<(), ContactFailure> {
        MinLength::new(self.rules.name_min_chars)
            .validate(&draft.name)
            .into_result()
            .map_err(|e| self.reject(FailureKind::NameTooShort, e))?;
        Email::new()
            .validate(&draft.email)
            .into_result()
            .map_err(|e| self.reject(FailureKind::InvalidEmail, e))?;
        MinLength::new(self.rules.message_min_chars)
            .validate(&draft.message)
            .into_result()
            .map_err(|e| self.reject(FailureKind::MessageTooShort, e))?;
        Ok(())
    }

    fn reject(&self, kind: FailureKind, error: ValidationError) -> ContactFailure {
        let template = match kind {
            FailureKind::NameTooShort => &self.messages.name_too_short,
            FailureKind::InvalidEmail => &self.messages.invalid_email,
            FailureKind::MessageTooShort => &self.messages.message_too_short,
        };
        ContactFailure {
            kind,
            error: error.with_message(template.as_str()),
        }
    }

    /// Validate the stored draft; clear it on success.
    pub fn submit(&mut self) -> SubmitOutcome {
        match self.validate(&self.draft) {
            Ok(()) => {
                self.draft = ContactDraft::default();
                debug!("contact draft accepted");
                SubmitOutcome::Accepted {
                    message: self.messages.success.clone(),
                }
            }
            Err(failure) => {
                debug!(field = %failure.field(), code = failure.error.code, "contact draft rejected");
                let focus = failure.field();
                SubmitOutcome::Rejected { failure, focus }
            }
        }
    }

    /// Sync from `raw`, then submit.
    pub fn submit_fields(&mut self, raw: &RawFields) -> SubmitOutcome {
        self.sync_draft(raw);
        self.submit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ERROR_CODE_EMAIL, ERROR_CODE_MIN_LENGTH};

    fn draft(name: &str, email: &str, message: &str) -> ContactDraft {
        ContactDraft::from_raw(&RawFields::new(name, email, message))
    }

    fn kind_of(v: &ContactValidator, d: &ContactDraft) -> Option<FailureKind> {
        v.validate(d).err().map(|f| f.kind)
    }

    #[test]
    fn short_name_wins_over_short_message() {
        let v = ContactValidator::default();
        assert_eq!(
            kind_of(&v, &draft("A", "x@x.com", "short")),
            Some(FailureKind::NameTooShort)
        );
    }

    #[test]
    fn short_message_with_valid_name() {
        let v = ContactValidator::default();
        let failure = v.validate(&draft("Al", "x@x.com", "short")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::MessageTooShort);
        assert_eq!(failure.field(), ContactField::Message);
        assert_eq!(failure.error.code, ERROR_CODE_MIN_LENGTH);
        assert_eq!(failure.message(), "Message must be at least 10 characters.");
    }

    #[test]
    fn empty_name_rejected() {
        let v = ContactValidator::default();
        assert_eq!(
            kind_of(&v, &draft("", "x@x.com", "this is long enough")),
            Some(FailureKind::NameTooShort)
        );
    }

    #[test]
    fn bad_email_rejected() {
        let v = ContactValidator::default();
        let failure = v
            .validate(&draft("Ann", "not-an-email", "this is long enough"))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidEmail);
        assert_eq!(failure.error.code, ERROR_CODE_EMAIL);
        assert_eq!(failure.to_string(), "email: Please enter a valid email address.");
    }

    #[test]
    fn valid_draft_passes() {
        let v = ContactValidator::default();
        assert!(
            v.validate(&draft("Ann", "ann@example.com", "this is long enough"))
                .is_ok()
        );
    }

    #[test]
    fn astral_name_counts_as_two_units() {
        let v = ContactValidator::default();
        assert!(
            v.validate(&draft("😀", "ann@example.com", "this is long enough"))
                .is_ok()
        );
        assert_eq!(
            kind_of(&v, &draft("é", "ann@example.com", "this is long enough")),
            Some(FailureKind::NameTooShort)
        );
    }

    #[test]
    fn whitespace_is_trimmed_before_length_checks() {
        let v = ContactValidator::default();
        assert_eq!(
            kind_of(&v, &draft("  A  ", "x@x.com", "this is long enough")),
            Some(FailureKind::NameTooShort)
        );
        assert!(
            v.validate(&draft("  Ann ", " ann@example.com ", "  this is long enough  "))
                .is_ok()
        );
    }

    #[test]
    fn sync_draft_is_idempotent() {
        let mut v = ContactValidator::default();
        let raw = RawFields::new("  Ann ", "ann@example.com\n", "\thello there  ");
        let first = v.sync_draft(&raw).clone();
        let second = v.sync_draft(&raw).clone();
        assert_eq!(first, second);
        assert_eq!(first.name, "Ann");
        assert_eq!(first.message, "hello there");
    }

    #[test]
    fn absent_fields_become_empty() {
        let mut v = ContactValidator::default();
        let raw = RawFields {
            name: Some("Ann".into()),
            ..Default::default()
        };
        let d = v.sync_draft(&raw);
        assert_eq!(d.email, "");
        assert_eq!(d.message, "");
    }

    #[test]
    fn submit_success_clears_draft() {
        let mut v = ContactValidator::default();
        let outcome =
            v.submit_fields(&RawFields::new("Ann", "ann@example.com", "this is long enough"));
        assert!(outcome.is_accepted());
        assert_eq!(outcome.message(), ContactMessages::default().success);
        assert_eq!(v.draft(), &ContactDraft::default());
    }

    #[test]
    fn submit_failure_keeps_draft_and_focuses_field() {
        let mut v = ContactValidator::default();
        let outcome = v.submit_fields(&RawFields::new("Ann", "ann@", "this is long enough"));
        match outcome {
            SubmitOutcome::Rejected { focus, .. } => assert_eq!(focus, ContactField::Email),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(v.draft().name, "Ann");
    }

    #[test]
    fn custom_rules_and_messages() {
        let rules = ContactRules {
            name_min_chars: 4,
            message_min_chars: 1,
        };
        let messages = ContactMessages {
            name_too_short: "Le nom doit faire au moins {min} caractères.".into(),
            ..Default::default()
        };
        let v = ContactValidator::new(rules, messages);
        let failure = v.validate(&draft("Ann", "a@b.co", "x")).unwrap_err();
        assert_eq!(failure.message(), "Le nom doit faire au moins 4 caractères.");
        assert!(v.validate(&draft("Anne", "a@b.co", "x")).is_ok());
    }
}
