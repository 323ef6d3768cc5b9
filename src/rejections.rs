use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::views;

#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    Input(&'static str),
    Unauthorized,
    Forbidden,
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
            AppError::Input(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Please log in first"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "You are not allowed to do that"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        };

        let page = views::page(
            "Error",
            html! {
                h1 { (message) }
                p { a href="/" { "Back to start" } }
            },
        );

        (code, page).into_response()
    }
}

/// Maps library errors onto `AppError`, logging the cause on the way out so
/// the response never carries internal detail.
pub trait ResultExt<T> {
    fn reject(self, context: &'static str) -> Result<T, AppError>;
    fn reject_input(self, context: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{context}: {e}");
            AppError::Internal(context)
        })
    }

    fn reject_input(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{context}: {e}");
            AppError::Input(context)
        })
    }
}
