use axum::{
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const IMAGE_CACHE_CONTROL: &str = "max-age=86400";

pub fn routes() -> Router<AppState> {
    Router::new().route("/images/{*path}", get(serve_image))
}

async fn serve_image(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let bytes = match state.images.load(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("could not read image {path}: {e}");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let content_type = match path.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    };

    (
        [(CONTENT_TYPE, content_type), (CACHE_CONTROL, IMAGE_CACHE_CONTROL)],
        bytes,
    )
        .into_response()
}
