use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

/// Failure that escapes a handler; rendered as a generic 500 page.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(crate::templates::error_page()),
        )
            .into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
