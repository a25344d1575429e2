use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serve the files in `dir` for every request without a more specific route.
pub fn router(dir: PathBuf) -> Router<()> {
    Router::new()
        .fallback(serve_asset)
        .with_state(Arc::new(ServeDir::new(dir)))
}

async fn serve_asset(service: State<Arc<ServeDir>>, request: Request) -> Response {
    if is_hidden(request.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match ServeDir::clone(&service).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(err) => match err {},
    }
}

/// Whether any segment of the percent decoded path names a dot-file.
///
/// Paths that do not decode to utf-8 are treated as hidden.
fn is_hidden(path: &str) -> bool {
    let Ok(path) = urlencoding::decode(path) else {
        return true;
    };
    path.split(['/', '\\']).any(|segment| segment.starts_with('.'))
}
