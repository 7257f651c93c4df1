use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use syracuse_metadata::NumberRepo;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub metadata: &'static str,
    pub storage: &'static str,
    /// Numbers with a metadata row, complete or not.
    pub records: u64,
}

/// GET /v1/health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.metadata.health_check().await?;
    let records = state.metadata.count_numbers().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        metadata: state.metadata.backend_name(),
        storage: state.coordinator.blobs().backend_name(),
        records,
    }))
}
