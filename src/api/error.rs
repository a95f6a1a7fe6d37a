use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::error::RefreshError;

/// Failures surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No {0} data available")]
    NoData(&'static str),

    #[error("Student '{0}' not found")]
    NotFound(String),

    #[error("Failed to refresh data: {0}")]
    RefreshFailed(#[from] RefreshError),

    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NoData(_) | ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::RefreshFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
