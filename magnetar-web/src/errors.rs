//! HTTP error mapping.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use magnetar_search::SearchError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by API handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Invalid query parameters (400)
    #[error("{message}")]
    BadRequest {
        /// Message shown to the client
        message: String,
    },

    /// Nothing matched the search (404)
    #[error("{message}")]
    NotFound {
        /// Message shown to the client
        message: String,
    },

    /// Unexpected fault (500)
    #[error("Server error: {reason}")]
    Internal {
        /// Description of the fault
        reason: String,
    },
}

impl ApiError {
    /// Status code this error is served with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::InvalidQuery { reason } => ApiError::BadRequest { message: reason },
            SearchError::InvalidProvider { .. } => ApiError::bad_request("Invalid provider"),
            SearchError::UnknownProvider { .. } => ApiError::bad_request(error.to_string()),
            SearchError::NotFound => ApiError::NotFound {
                message: error.to_string(),
            },
            SearchError::Configuration { .. } => ApiError::Internal {
                reason: error.to_string(),
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { reason } = &self {
            tracing::error!(error = %reason, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
