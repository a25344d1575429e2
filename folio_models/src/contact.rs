//! A contact form submission moves through three stages:
//! [`ContactSubmission`] (untrusted input) -> [`ValidatedSubmission`] ->
//! [`SanitizedSubmission`]. The later stages can only be obtained from the
//! previous one, so nothing reaches the mail dispatcher without passing
//! validation and HTML escaping first.

pub use sanitize::escape_html;
pub use validation::{ContactValidationError, ContactValidationErrors};

mod sanitize;
mod validation;

/// Raw field of a submission as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionField {
    /// The field was absent or `null`.
    #[default]
    Missing,
    /// The field was present, but not a string.
    NotText,
    Text(String),
}

impl SubmissionField {
    /// Returns the text of this field, treating empty strings as absent.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl From<String> for SubmissionField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SubmissionField {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmissionField,
    pub email: SubmissionField,
    pub subject: SubmissionField,
    pub message: SubmissionField,
}

impl ContactSubmission {
    /// Check all fields in the order name, email, subject, message.
    pub fn validate(self) -> Result<ValidatedSubmission, ContactValidationErrors> {
        match (
            validation::name(&self.name),
            validation::email(&self.email),
            validation::subject(&self.subject),
            validation::message(&self.message),
        ) {
            (Ok(name), Ok(email), Ok(subject), Ok(message)) => Ok(ValidatedSubmission {
                name: name.into(),
                email: email.into(),
                subject: subject.into(),
                message: message.into(),
            }),
            (name, email, subject, message) => Err(ContactValidationErrors::new(
                [name.err(), email.err(), subject.err(), message.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            )),
        }
    }
}

/// A submission whose fields passed validation, still unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ValidatedSubmission {
    pub fn sanitize(self) -> SanitizedSubmission {
        let message_text = self.message.trim().to_owned();
        SanitizedSubmission {
            name: escape_html(self.name.trim()),
            email: self.email.trim().to_lowercase(),
            subject: escape_html(self.subject.trim()),
            message: escape_html(&message_text),
            message_text,
        }
    }
}

/// A validated submission whose free text fields are safe to embed in html.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
    message_text: String,
}

impl SanitizedSubmission {
    /// The html escaped name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trimmed and lowercased email address. Not html escaped.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The html escaped subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The html escaped message. Newlines are preserved.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The trimmed message without html escaping, for plain text bodies only.
    pub fn message_text(&self) -> &str {
        &self.message_text
    }
}
