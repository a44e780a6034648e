//! HTTP client for the upstream temperature API.

use crate::series::StationPayload;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Default upstream endpoint serving the hourly station data.
pub const DEFAULT_ENDPOINT: &str = "https://api.temperatur.nu/tnu_1.17.php";

/// Upstream fetch timeout. The caller decides whether to retry; we never do.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    Request(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode upstream response for {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("Upstream response contained no stations")]
    NoStations,
}

/// Client for one station's data on the upstream API.
///
/// The base URL is overridable so tests can point the client at a mock
/// server; production code uses [`DEFAULT_ENDPOINT`].
#[derive(Debug, Clone)]
pub struct StationClient {
    client: Client,
    base_url: String,
    station_id: String,
}

impl StationClient {
    /// Creates a client for `station_id` against the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(station_id: &str) -> Result<Self, FetchError> {
        Self::with_base_url(station_id, DEFAULT_ENDPOINT)
    }

    /// Creates a client for `station_id` against a custom endpoint.
    pub fn with_base_url(station_id: &str, base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            station_id: station_id.to_string(),
        })
    }

    /// Station id this client was configured with.
    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Fetches one week of hourly samples for the configured station.
    ///
    /// The response is treated as untrusted: a 2xx body whose `stations`
    /// array is missing or empty is rejected with [`FetchError::NoStations`].
    ///
    /// # Errors
    ///
    /// Any network failure, timeout, non-2xx status, undecodable body or
    /// empty station list fails this call. No retry is attempted here.
    pub async fn fetch_week(&self) -> Result<StationPayload, FetchError> {
        let url = format!(
            "{}/?station={}&span=1week&data",
            self.base_url, self.station_id
        );
        info!("Fetching station data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Request(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::Request(url, e)
                });
            }
        };

        let payload: StationPayload = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(url.clone(), e))?;

        if payload.stations.is_empty() {
            warn!("Upstream returned an empty station list for {}", url);
            return Err(FetchError::NoStations);
        }

        info!(
            "Fetched {} samples for station {}",
            payload.stations[0].data.len(),
            self.station_id
        );
        Ok(payload)
    }
}
