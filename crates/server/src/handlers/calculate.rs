//! Read-through calculation endpoint.

use crate::error::{ApiError, ApiResult};
use crate::handlers::numbers::{NumberDto, parse_key};
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use syracuse_core::{NumberKey, properties};

/// Request body for `/v1/calculate`.
///
/// The front end posts form input, so `number` may arrive as a JSON number
/// or as a numeric string.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub number: Value,
}

impl CalculateRequest {
    fn key(&self) -> ApiResult<NumberKey> {
        match &self.number {
            Value::Number(n) => {
                let value = n.as_u64().ok_or_else(|| {
                    ApiError::BadRequest(format!("number must be a positive integer, got {n}"))
                })?;
                Ok(NumberKey::new(value)?)
            }
            Value::String(s) => parse_key(s),
            other => Err(ApiError::BadRequest(format!(
                "number must be an integer, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub result: NumberDto,
    pub cached: bool,
}

/// POST /v1/calculate
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<Json<CalculateResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let key = request.key()?;

    let started = Instant::now();
    let lookup = state
        .coordinator
        .get_or_compute(key, properties::compute)
        .await;
    metrics::observe("calculate", started);
    let lookup = lookup?;

    metrics::record_read(lookup.cached);
    tracing::info!(number = %key, cached = lookup.cached, "calculated");

    Ok(Json(CalculateResponse {
        result: lookup.record.into(),
        cached: lookup.cached,
    }))
}
