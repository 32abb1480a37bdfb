//! Control API handlers.

use crate::{ApiError, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use homelink_control::{ToggleOutcome, VolumeOutcome};
use homelink_core::{Device, PowerState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct PowerRequest {
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    pub change: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub controller_connected: bool,
    pub store: &'static str,
}

/// One-field object keyed by a runtime name, e.g. `{"lamp": true}`.
fn single_field(key: String, value: impl Into<Value>) -> Json<Value> {
    let mut body = Map::new();
    body.insert(key, value.into());
    Json(Value::Object(body))
}

pub async fn set_power(
    State(state): State<AppState>,
    Path(device): Path<String>,
    body: Result<Json<PowerRequest>, JsonRejection>,
) -> Result<Json<ToggleOutcome>, ApiError> {
    let device: Device = device.parse()?;
    let Json(request) = body?;
    let desired: PowerState = request.state.parse()?;
    let outcome = state.controller.toggle(device, desired).await?;
    Ok(Json(outcome))
}

pub async fn power_status(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let device: Device = device.parse()?;
    let on = state.controller.query_status(device).await;
    Ok(single_field(device.as_str().to_string(), on))
}

pub async fn change_volume(
    State(state): State<AppState>,
    Path(device): Path<String>,
    body: Result<Json<VolumeRequest>, JsonRejection>,
) -> Result<Json<VolumeOutcome>, ApiError> {
    let device: Device = device.parse()?;
    let Json(request) = body?;
    let outcome = state.controller.adjust_volume(device, request.change).await?;
    Ok(Json(outcome))
}

pub async fn volume(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let device: Device = device.parse()?;
    let level = state.controller.query_volume(device).await?;
    Ok(single_field(format!("{}_volume", device.as_str()), level))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        controller_connected: state.controller.registry().is_connected().await,
        store: state.controller.store().backend_name(),
    })
}
