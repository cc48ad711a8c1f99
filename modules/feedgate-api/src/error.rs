use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use feedgate_scrapers::ScraperError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// An upstream failure surfaced with its own status and detail.
    #[error("Upstream error (status {status}): {detail}")]
    Upstream { status: StatusCode, detail: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid query: {0}")]
    Validation(String),

    #[error("Unhandled scraper error: {0}")]
    Internal(#[source] ScraperError),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Upstream { status, detail } => (status, detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Unhandled scraper error");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Transport failures from an upstream request.
///
/// Without a server response the failure becomes a 500 carrying the error
/// message; with one, the upstream status and body are passed through.
pub fn http_error_policy(err: ScraperError) -> ApiError {
    match err {
        ScraperError::Network(message) => ApiError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: message,
        },
        ScraperError::Api { status, message } => ApiError::Upstream {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            detail: message,
        },
        ScraperError::InvalidInput(message) => ApiError::BadRequest(message),
        other => ApiError::Internal(other),
    }
}

/// Profile scrapes: the login wall and wrong-source conditions are client
/// errors, everything else falls through to [`http_error_policy`].
pub fn profile_error_policy(err: ScraperError) -> ApiError {
    match err {
        ScraperError::LoginRedirect(_) | ScraperError::WrongSource(_) => {
            ApiError::BadRequest(err.to_string())
        }
        other => http_error_policy(other),
    }
}
