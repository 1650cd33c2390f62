use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use configs::ConfigError;
use service::ServiceError;
use thiserror::Error;

/// Error body returned by the document API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            _ if e.is_not_found() => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Closed => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, message: e.to_string() }
    }
}

/// Fatal conditions that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{component} error: {reason}")]
    Construction { component: &'static str, reason: String },
    #[error("unrecognized mode {0:?}, try --help (-h)")]
    UnsupportedMode(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl StartupError {
    pub fn construction(component: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Construction { component, reason: reason.to_string() }
    }
}
