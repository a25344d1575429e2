use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::ContactService;
use tracing::debug;

use crate::models::contact::{invalid_request_format, parse_submission, send_message_response};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactService>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let submission = match body
        .map_err(anyhow::Error::from)
        .and_then(|body| Ok(parse_submission(&body)?))
    {
        Ok(submission) => submission,
        Err(err) => {
            debug!("rejecting malformed contact request body: {err}");
            let (status, response) = invalid_request_format();
            return (status, Json(response)).into_response();
        }
    };

    let (status, response) = send_message_response(service.send_message(submission).await);
    (status, Json(response)).into_response()
}
