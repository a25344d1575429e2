use axum::{
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Serialize;

pub fn router() -> Router<()> {
    Router::new().route("/api/health", routing::get(health))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn health() -> Response {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
    })
    .into_response()
}
