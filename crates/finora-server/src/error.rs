//! HTTP error responses
//!
//! Handlers return `Result<_, AppError>`. Core errors that describe a bad
//! request keep their message; everything else is logged and replaced with a
//! generic 500 so internals never reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            internal: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Client-facing mapping for core errors, None for server faults
    fn from_core(err: &finora_core::Error) -> Option<Self> {
        use finora_core::Error;

        match err {
            Error::NotFound(what) => Some(Self::not_found(format!("{} not found", what))),
            Error::Conflict(msg) => Some(Self::conflict(msg.as_str())),
            Error::InvalidData(msg) => Some(Self::bad_request(msg.as_str())),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(ref err) = self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        if let Some(mapped) = err.downcast_ref::<finora_core::Error>().and_then(Self::from_core) {
            return mapped;
        }

        Self {
            internal: Some(err),
            ..Self::internal(INTERNAL_MESSAGE)
        }
    }
}
