use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tickstore_core::{ServiceError, StoreErrorKind};

/// Central error type for the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("invalid query parameters: {0}")]
    InvalidQuery(#[from] QueryRejection),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Store(error)) => match error.kind() {
                StoreErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                StoreErrorKind::QueryFailed | StoreErrorKind::WriteRejected => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::Service(_) | Self::InvalidBody(_) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Service(error) => error.code(),
            Self::InvalidBody(_) => "INVALID_REQUEST_BODY",
            Self::InvalidQuery(_) => "INVALID_QUERY_PARAMETERS",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (retryable, index) = match &self {
            Self::Service(error) => (
                error.retryable(),
                match error {
                    ServiceError::InvalidObservation { index, .. } => *index,
                    _ => None,
                },
            ),
            _ => (false, None),
        };

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
            retryable,
            index,
        };
        (status, Json(body)).into_response()
    }
}
