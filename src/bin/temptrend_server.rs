//! Caching proxy server binary: wraps [`TrendService`] behind
//! `GET /temperature` for the charting UI.

use log::info;
use std::sync::Arc;
use temptrend::{router, TrendService};
use tokio::sync::RwLock;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let station = env_or("TEMPTREND_STATION", "kvarnberget");
    let endpoint = env_or("TEMPTREND_ENDPOINT", temptrend::DEFAULT_ENDPOINT);
    let addr = env_or("TEMPTREND_ADDR", "0.0.0.0:8787");

    let service = TrendService::builder()
        .station_id(&station)
        .endpoint(&endpoint)
        .build()?;
    let app = router(Arc::new(RwLock::new(service)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Serving temperature trend for station '{}' on http://{}",
        station, addr
    );
    axum::serve(listener, app).await?;
    Ok(())
}
