use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::http::error::{ApiError, INVALID_FORMAT};
use crate::http::request::NewReading;
use crate::http::response::{CreatedResponse, HealthResponse, MessageResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{Reading, StoreError};

/// `POST /log`
pub async fn add_log(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected non-JSON payload");
        ApiError::malformed(INVALID_FORMAT)
    })?;
    let new = NewReading::from_json(body)?;

    let reading = state.store.create(new.blood_sugar, new.meal_type).await?;
    metrics::record_reading_created();
    tracing::info!(
        reading_id = reading.id,
        blood_sugar = reading.blood_sugar,
        meal_type = ?reading.meal_type,
        "Reading recorded"
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(reading))))
}

/// `GET /logs`
pub async fn list_logs(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state.store.list_all().await?;
    tracing::debug!(count = readings.len(), "Listed readings");
    Ok(Json(readings))
}

/// `DELETE /log/{id}`
///
/// A non-integer id cannot name a reading, so it is reported as not found.
pub async fn delete_log(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    state.store.delete(id).await.inspect_err(|err| {
        if matches!(err, StoreError::NotFound(_)) {
            tracing::debug!(reading_id = id, "Delete of unknown reading");
        }
    })?;
    metrics::record_reading_deleted();
    tracing::info!(reading_id = id, "Reading deleted");

    Ok(Json(MessageResponse::deleted()))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        readings: state.store.count().await?,
    }))
}
