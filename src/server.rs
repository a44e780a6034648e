//! The caching proxy endpoint consumed by the charting UI.
//!
//! A single `GET /temperature` route wraps [`TrendService`]. The proxy
//! degrades rather than propagates: an upstream failure it can absorb (via
//! cache or sample data) still answers 200, and even an internal failure
//! answers 200 with `success: false` so the UI keeps rendering.

use crate::cache::CACHE_TTL_MINUTES;
use crate::season::SeasonVerdict;
use crate::series::{Reading, StationInfo};
use crate::service::TrendService;
use axum::extract::{Query, State};
use axum::http::header::{HeaderName, CACHE_CONTROL};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handler state: the orchestrator behind a lock so concurrent
/// requests never observe a half-written cache slot.
pub type SharedService = Arc<RwLock<TrendService>>;

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

#[derive(Debug, Deserialize, Default)]
pub struct TemperatureQuery {
    /// `?refresh=true` bypasses the server-side cache.
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Serialize)]
struct StationBlock {
    #[serde(flatten)]
    info: StationInfo,
    data: Vec<Reading>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemperatureResponse {
    success: bool,
    cached: bool,
    /// Epoch milliseconds of the payload's original fetch.
    timestamp: i64,
    stations: Vec<StationBlock>,
    station_info: StationInfo,
    smoothed: Vec<Reading>,
    season: SeasonVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

#[derive(Debug, Serialize)]
struct FailureResponse {
    success: bool,
    error: String,
    timestamp: i64,
}

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (
            HeaderName::from_static("access-control-allow-origin"),
            "*",
        ),
        (
            HeaderName::from_static("access-control-allow-methods"),
            "GET, OPTIONS",
        ),
        (
            HeaderName::from_static("access-control-allow-headers"),
            "Content-Type",
        ),
    ]
}

async fn get_temperature(
    State(service): State<SharedService>,
    Query(query): Query<TemperatureQuery>,
) -> Response {
    let now = Utc::now();
    let result = service.write().await.fetch_trend(query.refresh, now).await;

    match result {
        Ok(report) => {
            let cache_status = if report.cached { "HIT" } else { "MISS" };
            let cache_control = format!("public, max-age={}", CACHE_TTL_MINUTES * 60);
            let body = TemperatureResponse {
                success: true,
                cached: report.cached,
                timestamp: report.fetched_at.timestamp_millis(),
                stations: vec![StationBlock {
                    info: report.output.station.clone(),
                    data: report.output.series,
                }],
                station_info: report.output.station,
                smoothed: report.output.smoothed,
                season: report.output.verdict,
                warning: report.warning,
            };
            (
                cors_headers(),
                [(X_CACHE, cache_status.to_string()), (CACHE_CONTROL, cache_control)],
                Json(body),
            )
                .into_response()
        }
        Err(e) => {
            // Still a 200: the proxy never surfaces a 5xx for a failure it
            // can report in-band.
            error!("Trend pipeline failed: {}", e);
            let body = FailureResponse {
                success: false,
                error: e.to_string(),
                timestamp: now.timestamp_millis(),
            };
            (cors_headers(), Json(body)).into_response()
        }
    }
}

async fn preflight() -> Response {
    (cors_headers(), ()).into_response()
}

/// Builds the proxy router around a shared [`TrendService`].
///
/// Non-GET/OPTIONS methods on the route answer 405 through axum's method
/// routing.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/temperature", get(get_temperature).options(preflight))
        .with_state(service)
}
