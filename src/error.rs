//! Typed errors and HTTP mapping.

use crate::service::FieldErrors;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Start-up errors: invalid environment settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Body of every error response: `{"error": <message or field map>}`.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(FieldErrors),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

pub const NOT_FOUND_MESSAGE: &str = "Contact not found";
pub const INTERNAL_MESSAGE: &str = "Internal server error";
pub const TOO_LARGE_MESSAGE: &str = "Request body too large";

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::Validation(fields) => ErrorDetail::Fields(fields),
            AppError::BadRequest(message) => ErrorDetail::Message(message),
            AppError::PayloadTooLarge => ErrorDetail::Message(TOO_LARGE_MESSAGE.into()),
            AppError::Store(StoreError::NotFound(id)) => {
                tracing::debug!(id, "contact not found");
                ErrorDetail::Message(NOT_FOUND_MESSAGE.into())
            }
            AppError::Store(StoreError::Backend(e)) => {
                tracing::error!(error = %e, "storage failure");
                ErrorDetail::Message(INTERNAL_MESSAGE.into())
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
