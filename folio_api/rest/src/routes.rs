use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{contact::SEND_FAILED, ApiResponse};

pub mod assets;
pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(SEND_FAILED)),
    )
        .into_response()
}
