//! Analysis route handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::state::AppState;
use crate::models::{AnalysisRequest, ErrorResponse};
use crate::{Error, Result};

/// Every failure kind is reported as a 500 with the same body shape.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::from(&self)),
        )
            .into_response()
    }
}

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn analyze_xray(State(state): State<AppState>, body: Bytes) -> Response {
    let result = match decode_request(&body) {
        Ok(request) => state.analyzer.analyze(&request).await,
        Err(e) => {
            tracing::error!("Rejected request body: {}", e);
            Err(e)
        }
    };

    match result {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(e) => e.into_response(),
    }
}

fn decode_request(body: &[u8]) -> Result<AnalysisRequest> {
    serde_json::from_slice(body)
        .map_err(|e| Error::Validation(format!("Invalid request body: {}", e)))
}
