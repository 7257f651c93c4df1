//! Direct access to cached number records.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use syracuse_cache::{ReadOutcome, WriteOutcome};
use syracuse_core::{NumberFlags, NumberKey, NumberRecord, Trajectory};

/// Wire form of a number record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberDto {
    pub number: u64,
    pub is_even: bool,
    pub is_prime: bool,
    pub is_perfect: bool,
    pub syracuse: Vec<u64>,
}

impl From<NumberRecord> for NumberDto {
    fn from(record: NumberRecord) -> Self {
        Self {
            number: record.key.get(),
            is_even: record.flags.is_even,
            is_prime: record.flags.is_prime,
            is_perfect: record.flags.is_perfect,
            syracuse: record.trajectory.into_vec(),
        }
    }
}

impl TryFrom<NumberDto> for NumberRecord {
    type Error = syracuse_core::Error;

    fn try_from(dto: NumberDto) -> syracuse_core::Result<Self> {
        let key = NumberKey::new(dto.number)?;
        let flags = NumberFlags {
            is_even: dto.is_even,
            is_prime: dto.is_prime,
            is_perfect: dto.is_perfect,
        };
        NumberRecord::new(key, flags, Trajectory::new(dto.syracuse))
    }
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub outcome: &'static str,
    pub result: NumberDto,
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub number: u64,
    pub presence: &'static str,
}

pub(crate) fn parse_key(raw: &str) -> ApiResult<NumberKey> {
    Ok(raw.parse::<NumberKey>()?)
}

/// GET /v1/numbers/{number}
pub async fn get_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<Json<NumberDto>> {
    let key = parse_key(&number)?;

    let started = Instant::now();
    let outcome = state.coordinator.read_record(key).await;
    metrics::observe("read", started);

    match outcome? {
        ReadOutcome::Found(record) => {
            metrics::record_read(true);
            Ok(Json(record.into()))
        }
        ReadOutcome::NotFound => {
            metrics::record_read(false);
            tracing::debug!(number = %key, "record not cached");
            Err(ApiError::NotFound(format!("number {key} is not cached")))
        }
    }
}

/// POST /v1/numbers
pub async fn store_number(
    State(state): State<AppState>,
    payload: Result<Json<NumberDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StoreResponse>)> {
    let Json(dto) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = NumberRecord::try_from(dto)?;

    let started = Instant::now();
    let outcome = state.coordinator.write_record(&record).await;
    metrics::observe("write", started);
    let outcome = outcome?;
    metrics::record_write(outcome);

    let (status, result) = match outcome {
        WriteOutcome::Stored => (StatusCode::CREATED, record),
        // Report what is actually cached, which wins over the submitted body.
        WriteOutcome::AlreadyCached => match state.coordinator.read_record(record.key).await? {
            ReadOutcome::Found(cached) => (StatusCode::OK, cached),
            ReadOutcome::NotFound => {
                return Err(ApiError::Internal(format!(
                    "number {} reported cached but cannot be read back",
                    record.key
                )));
            }
        },
    };

    Ok((
        status,
        Json(StoreResponse {
            outcome: outcome.as_str(),
            result: result.into(),
        }),
    ))
}

/// GET /v1/numbers/{number}/presence
pub async fn get_presence(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<Json<PresenceResponse>> {
    let key = parse_key(&number)?;

    let started = Instant::now();
    let presence = state.coordinator.presence(key).await;
    metrics::observe("presence", started);

    Ok(Json(PresenceResponse {
        number: key.get(),
        presence: presence?.as_str(),
    }))
}
