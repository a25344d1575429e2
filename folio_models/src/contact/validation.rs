use std::sync::LazyLock;

use regex::Regex;

use super::SubmissionField;

pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactValidationError {
    NameRequired,
    NameTooShort,
    NameTooLong,
    EmailRequired,
    InvalidEmailFormat,
    EmailTooLong,
    SubjectRequired,
    SubjectTooShort,
    SubjectTooLong,
    MessageRequired,
    MessageTooShort,
    MessageTooLong,
}

impl ContactValidationError {
    /// Human readable description, safe to show to the client.
    pub fn message(self) -> &'static str {
        match self {
            Self::NameRequired => "Name is required",
            Self::NameTooShort => "Name must be at least 2 characters",
            Self::NameTooLong => "Name is too long",
            Self::EmailRequired => "Email is required",
            Self::InvalidEmailFormat => "Invalid email format",
            Self::EmailTooLong => "Email is too long",
            Self::SubjectRequired => "Subject is required",
            Self::SubjectTooShort => "Subject must be at least 3 characters",
            Self::SubjectTooLong => "Subject is too long",
            Self::MessageRequired => "Message is required",
            Self::MessageTooShort => "Message must be at least 10 characters",
            Self::MessageTooLong => "Message is too long (max 5000 characters)",
        }
    }
}

impl std::fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ContactValidationError {}

/// Non-empty list of violated rules, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactValidationErrors(Vec<ContactValidationError>);

impl ContactValidationErrors {
    pub(super) fn new(errors: Vec<ContactValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn first(&self) -> ContactValidationError {
        self.0[0]
    }

}

impl std::fmt::Display for ContactValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.first().fmt(f)
    }
}

impl std::error::Error for ContactValidationErrors {}

struct TextRule {
    min_len: usize,
    max_len: usize,
    required: ContactValidationError,
    too_short: ContactValidationError,
    too_long: ContactValidationError,
}

const NAME: TextRule = TextRule {
    min_len: 2,
    max_len: 100,
    required: ContactValidationError::NameRequired,
    too_short: ContactValidationError::NameTooShort,
    too_long: ContactValidationError::NameTooLong,
};

const SUBJECT: TextRule = TextRule {
    min_len: 3,
    max_len: 200,
    required: ContactValidationError::SubjectRequired,
    too_short: ContactValidationError::SubjectTooShort,
    too_long: ContactValidationError::SubjectTooLong,
};

const MESSAGE: TextRule = TextRule {
    min_len: 10,
    max_len: 5000,
    required: ContactValidationError::MessageRequired,
    too_short: ContactValidationError::MessageTooShort,
    too_long: ContactValidationError::MessageTooLong,
};

const EMAIL_MAX_LEN: usize = 254;

pub(super) fn name(field: &SubmissionField) -> Result<&str, ContactValidationError> {
    text(field, &NAME)
}

pub(super) fn subject(field: &SubmissionField) -> Result<&str, ContactValidationError> {
    text(field, &SUBJECT)
}

pub(super) fn message(field: &SubmissionField) -> Result<&str, ContactValidationError> {
    text(field, &MESSAGE)
}

pub(super) fn email(field: &SubmissionField) -> Result<&str, ContactValidationError> {
    let value = field
        .as_text()
        .ok_or(ContactValidationError::EmailRequired)?;
    if !EMAIL_REGEX.is_match(value.trim()) {
        return Err(ContactValidationError::InvalidEmailFormat);
    }
    if value.chars().count() > EMAIL_MAX_LEN {
        return Err(ContactValidationError::EmailTooLong);
    }
    Ok(value)
}

// The minimum applies to the trimmed value, the maximum to the raw one.
fn text<'a>(field: &'a SubmissionField, rule: &TextRule) -> Result<&'a str, ContactValidationError> {
    let value = field.as_text().ok_or(rule.required)?;
    if value.trim().chars().count() < rule.min_len {
        return Err(rule.too_short);
    }
    if value.chars().count() > rule.max_len {
        return Err(rule.too_long);
    }
    Ok(value)
}
