//! HTTP error mapping
//!
//! Every failure is returned as `{"error": <kind>, "detail": <message>}`.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use council_application::{AuthError, QueryError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    /// The request body was not valid JSON for the endpoint
    InvalidBody(String),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::Query(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Query(e) => match e {
                QueryError::Auth(AuthError::RegistryUnavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                QueryError::Auth(_) => StatusCode::UNAUTHORIZED,
                QueryError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
                QueryError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                QueryError::Validation(_) => StatusCode::BAD_REQUEST,
                QueryError::NotFound(_) => StatusCode::NOT_FOUND,
                QueryError::CouncilUnavailable(_) | QueryError::Storage(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidBody(detail) => ErrorBody {
                error: "invalid_body".to_string(),
                detail: detail.clone(),
            },
            ApiError::Query(e) => ErrorBody {
                error: e.kind().to_string(),
                detail: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(self.body());
        match self {
            ApiError::Query(QueryError::Auth(_)) if status == StatusCode::UNAUTHORIZED => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response(),
            ApiError::Query(QueryError::RateLimited(_)) => {
                (status, [(header::RETRY_AFTER, "60")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
