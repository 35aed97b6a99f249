use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::celestrak::LookupError;
use crate::web::request::RequestError;

pub enum ApiError {
    Validation(String),
    NotFound(&'static str, String),
    Upstream(String),
}

impl From<RequestError> for ApiError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::SatelliteNotFound(_) => ApiError::NotFound("satellite_not_found", e.to_string()),
            RequestError::Upstream(_) => ApiError::Upstream(e.to_string()),
            RequestError::Incomplete(_) | RequestError::Invalid(_) => {
                ApiError::Validation(e.to_string())
            }
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::EmptyQuery => ApiError::Validation(e.to_string()),
            LookupError::NotFound(_) => ApiError::NotFound("satellite_not_found", e.to_string()),
            LookupError::Fetch(_) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound(reason, msg) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message(reason, &msg)),
            )
                .into_response(),
            ApiError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("upstream_error", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
