use crate::catalog::{ad_for, environment_for};
use crate::error::AppError;
use crate::{AppState, DauReport, TrackedEvent};
use axum::{extract::State, http::HeaderMap, Json};
use peerads::client::SECRET_KEY_HEADER;
use peerads::AdEnvelope;
use peerads_adapter::{key_fingerprint, AdFormat};
use peerads_runtime::TrackEvent;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::PoisonError;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeReq {
    pub api_key: Option<String>,
    pub slot_type: Option<String>,
    pub platform: Option<String>,
}

pub async fn serve(
    State(state): State<AppState>,
    Json(req): Json<ServeReq>,
) -> Result<Json<AdEnvelope>, AppError> {
    let api_key = req
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::unauthorized("missing apiKey"))?;
    let slot_type = req.slot_type.unwrap_or_default();
    let format: AdFormat = slot_type.parse().map_err(AppError::bad_request)?;

    let environment = environment_for(&api_key);
    let n = state.served.fetch_add(1, Ordering::Relaxed) + 1;
    let ad = ad_for(format, format!("{format}-{n:06}"), environment);
    info!(
        key = %key_fingerprint(&api_key),
        %format,
        platform = req.platform.as_deref().unwrap_or("unknown"),
        ad_id = %ad.id,
        "ad served"
    );
    Ok(Json(AdEnvelope { ad, environment: Some(environment.into()) }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReq {
    pub ad_id: String,
    pub event: String,
}

pub async fn track(
    State(state): State<AppState>,
    Json(req): Json<TrackReq>,
) -> Result<Json<Value>, AppError> {
    if req.ad_id.is_empty() {
        return Err(AppError::bad_request("missing adId"));
    }
    let event: TrackEvent = req.event.parse().map_err(AppError::bad_request)?;
    info!(ad_id = %req.ad_id, %event, "tracked");
    state
        .tracked
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(TrackedEvent {
            ad_id: req.ad_id,
            event: event.as_str().into(),
            received_at: chrono::Utc::now().to_rfc3339(),
        });
    Ok(Json(json!({"ok": true})))
}

#[derive(Debug, Deserialize)]
pub struct DauReq {
    pub dau: u64,
}

pub async fn dau(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DauReq>,
) -> Result<Json<Value>, AppError> {
    let secret = headers
        .get(SECRET_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| s.starts_with("sk_"))
        .ok_or_else(|| AppError::unauthorized("missing or invalid secret key"))?;
    info!(dau = req.dau, secret = %key_fingerprint(secret), "dau reported");
    state.dau.write().unwrap_or_else(PoisonError::into_inner).push(DauReport {
        dau: req.dau,
        received_at: chrono::Utc::now().to_rfc3339(),
    });
    Ok(Json(json!({"ok": true, "dau": req.dau})))
}

pub async fn tracked(State(state): State<AppState>) -> Json<Value> {
    let tracked = state.tracked.read().unwrap_or_else(PoisonError::into_inner);
    Json(json!({ "events": *tracked }))
}
