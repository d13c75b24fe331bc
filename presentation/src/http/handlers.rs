//! Route handlers

use super::error::ApiError;
use super::{AppState, SERVICE_NAME};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use council_application::{QueryRequest, StoredQuery};
use council_domain::{Credential, CouncilResult};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: String,
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Credential from `Authorization`, with or without the `Bearer` scheme
fn credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(Credential::from_authorization_header)
}

pub(super) async fn query_council(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<CouncilResult>, ApiError> {
    let credential = credential(&headers);

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            // Authentication failures take precedence over body errors
            state.service.authenticate(credential.as_ref()).await?;
            debug!("Rejected council query body: {}", rejection.body_text());
            return Err(ApiError::InvalidBody(rejection.body_text()));
        }
    };

    let result = state
        .service
        .query_council(credential.as_ref(), request)
        .await?;
    Ok(Json(result))
}

pub(super) async fn get_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(record_id): Path<String>,
) -> Result<Json<StoredQuery>, ApiError> {
    let credential = credential(&headers);
    let record = state
        .service
        .get_record(credential.as_ref(), &record_id)
        .await?;
    Ok(Json(record))
}
