use axum::http::StatusCode;
use folio_core_contact_contracts::ContactSendMessageError;
use folio_models::contact::{ContactSubmission, SubmissionField};
use serde_json::Value;
use tracing::error;

use super::ApiResponse;

pub const MESSAGE_SENT: &str = "Message sent successfully!";
pub const INVALID_REQUEST_FORMAT: &str = "Invalid request format";
pub const SERVER_CONFIGURATION_ERROR: &str = "Server configuration error";
pub const SEND_FAILED: &str = "Failed to send message. Please try again later.";

/// Parse a submission request body.
///
/// Fails only if the body is not valid json. Any other json value is accepted
/// and fields that are absent (or `null`) are reported as missing, so a
/// non-object body is treated as a submission without fields.
pub fn parse_submission(body: &[u8]) -> Result<ContactSubmission, serde_json::Error> {
    let value = serde_json::from_slice::<Value>(body)?;

    let field = |key: &str| match value.get(key) {
        None | Some(Value::Null) => SubmissionField::Missing,
        Some(Value::String(text)) => SubmissionField::Text(text.clone()),
        Some(_) => SubmissionField::NotText,
    };

    Ok(ContactSubmission {
        name: field("name"),
        email: field("email"),
        subject: field("subject"),
        message: field("message"),
    })
}

pub fn invalid_request_format() -> (StatusCode, ApiResponse) {
    (
        StatusCode::BAD_REQUEST,
        ApiResponse::error(INVALID_REQUEST_FORMAT),
    )
}

/// Map the outcome of the contact pipeline to a response. Only fixed messages
/// reach the client, internal errors are logged.
pub fn send_message_response(
    result: Result<(), ContactSendMessageError>,
) -> (StatusCode, ApiResponse) {
    match result {
        Ok(()) => (StatusCode::OK, ApiResponse::ok(MESSAGE_SENT)),
        Err(ContactSendMessageError::Invalid(errors)) => (
            StatusCode::BAD_REQUEST,
            ApiResponse::error(errors.first().message()),
        ),
        Err(ContactSendMessageError::NotConfigured) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::error(SERVER_CONFIGURATION_ERROR),
        ),
        Err(ContactSendMessageError::Send) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::error(SEND_FAILED),
        ),
        Err(ContactSendMessageError::Other(err)) => {
            error!("Failed to relay contact message: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error(SEND_FAILED),
            )
        }
    }
}
