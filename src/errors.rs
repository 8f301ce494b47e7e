use actix_web::{
    error::UrlGenerationError, http::StatusCode, HttpResponse, HttpResponseBuilder, ResponseError,
};
use log::error;
use thiserror::Error;

use crate::db::DbError;

/// Errors a handler can answer with. The body is the message as a JSON
/// string, e.g. `"entry not found"`. Server errors only say `"internal error"`;
/// the detail goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(#[from] DbError),

    #[error("could not build entry url: {0}")]
    Url(#[from] UrlGenerationError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::NotFound(message) | ApiError::BadRequest(message) => message.as_str(),
            ApiError::Internal(_) | ApiError::Url(_) => {
                error!("event=request_failed module=routes error={self}");
                "internal error"
            }
        };
        HttpResponseBuilder::new(self.status_code()).json(message)
    }
}
