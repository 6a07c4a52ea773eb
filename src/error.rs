use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::{Deserialize, Serialize};

use crate::database::SqliteDatabaseError;

#[derive(Debug)]
pub struct InternalError {
    pub message: String,
}

impl InternalError {
    pub fn new(message: String) -> InternalError {
        InternalError { message }
    }
}

impl IntoResponse for InternalError {
    fn into_response(self) -> Response {
        error!(
            "Error encountered while processing request: {}",
            self.message
        );
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl From<SqliteDatabaseError> for InternalError {
    fn from(err: SqliteDatabaseError) -> Self {
        InternalError::new(err.to_string())
    }
}

/// Body of every rejected request, serialized as `{"error": "..."}`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Failure of an API request: either a date the dataset cannot answer for,
/// or a store fault.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(InternalError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error: message })).into_response()
            }
            ApiError::Internal(err) => err.into_response(),
        }
    }
}

impl From<SqliteDatabaseError> for ApiError {
    fn from(err: SqliteDatabaseError) -> Self {
        ApiError::Internal(err.into())
    }
}

