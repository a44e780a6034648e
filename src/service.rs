//! The fetch orchestrator: cache gating, upstream fetch and the sample-data
//! fallback, glued around the pure pipeline.

use crate::cache::TimedCache;
use crate::error::TemptrendError;
use crate::fetch::{StationClient, DEFAULT_ENDPOINT};
use crate::pipeline::{derive_trend, normalize_payload, NormalizedWeek, PipelineOutput};
use crate::series::StationPayload;
use bon::bon;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

/// One week of hourly readings, bundled as the fallback when both the cache
/// and the live fetch are unavailable. Same shape as the upstream response.
const SAMPLE_WEEK: &str = include_str!("../data/sample_week.json");

/// Result of one orchestrated fetch.
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub output: PipelineOutput,
    /// True when the payload came from the in-process cache.
    pub cached: bool,
    /// When the payload behind this report was originally fetched.
    pub fetched_at: DateTime<Utc>,
    /// Set when the report was served from the bundled sample dataset
    /// because the upstream was unavailable. Non-fatal by design.
    pub warning: Option<String>,
}

/// Coordinates the cache, the upstream client and the fallback dataset.
///
/// The service owns the cache slot exclusively. The cache holds the
/// normalized week (station identity plus parsed series), never the
/// smoothed series or the verdict; those stay derived and are recomputed on
/// every call, cached week or not. Construction goes through a builder:
///
/// ```
/// use temptrend::TrendService;
///
/// let service = TrendService::builder()
///     .station_id("kvarnberget")
///     .build()
///     .unwrap();
/// assert_eq!(service.station_id(), "kvarnberget");
/// ```
pub struct TrendService {
    client: StationClient,
    cache: TimedCache<NormalizedWeek>,
}

#[bon]
impl TrendService {
    /// Builds a service for one station.
    ///
    /// * `.station_id(&str)`: **Required.** Upstream station identifier.
    /// * `.endpoint(&str)`: Optional. Upstream base URL, defaults to the
    ///   public API; tests point this at a mock server.
    /// * `.cache_ttl(Duration)`: Optional. Defaults to 55 minutes.
    ///
    /// # Errors
    ///
    /// Returns [`TemptrendError::Fetch`] if the HTTP client cannot be built.
    #[builder]
    pub fn new(
        station_id: &str,
        endpoint: Option<&str>,
        cache_ttl: Option<Duration>,
    ) -> Result<Self, TemptrendError> {
        let client = StationClient::with_base_url(
            station_id,
            endpoint.unwrap_or(DEFAULT_ENDPOINT),
        )?;
        let cache = match cache_ttl {
            Some(ttl) => TimedCache::new(ttl),
            None => TimedCache::with_default_ttl(),
        };
        Ok(Self { client, cache })
    }

    pub fn station_id(&self) -> &str {
        self.client.station_id()
    }

    /// Fetches the current trend report, consulting the cache first.
    ///
    /// Sequence: unless `force_refresh` is set, a valid cache entry
    /// short-circuits the network entirely and the trend is re-derived from
    /// the cached week. On a miss (or forced refresh) the upstream is called
    /// once; the normalized result of a successful fetch replaces the cache
    /// slot wholesale. If the upstream fails, the bundled sample week runs
    /// through the same pipeline and comes back with a warning instead of an
    /// error, so the caller always gets something to render.
    ///
    /// # Errors
    ///
    /// Only pipeline-level failures surface here (an empty station list in
    /// the sample dataset would be a packaging bug). Upstream unavailability
    /// is reported through [`TrendReport::warning`], not as an error.
    pub async fn fetch_trend(
        &mut self,
        force_refresh: bool,
        now: DateTime<Utc>,
    ) -> Result<TrendReport, TemptrendError> {
        if !force_refresh {
            if let Some(entry) = self.cache.get(now) {
                info!(
                    "Cache hit for station {} (age {}s)",
                    self.station_id(),
                    (now - entry.created_at).num_seconds()
                );
                let output = derive_trend(&entry.payload)?;
                return Ok(TrendReport {
                    output,
                    cached: true,
                    fetched_at: entry.created_at,
                    warning: None,
                });
            }
        }

        match self.client.fetch_week().await {
            Ok(payload) => {
                let week = normalize_payload(&payload)?;
                let output = derive_trend(&week)?;
                self.cache.store(week, now);
                Ok(TrendReport {
                    output,
                    cached: false,
                    fetched_at: now,
                    warning: None,
                })
            }
            Err(e) => {
                warn!(
                    "Upstream fetch failed for station {}, serving sample data: {}",
                    self.station_id(),
                    e
                );
                let payload: StationPayload =
                    serde_json::from_str(SAMPLE_WEEK).map_err(TemptrendError::SampleDecode)?;
                let week = normalize_payload(&payload)?;
                let output = derive_trend(&week)?;
                Ok(TrendReport {
                    output,
                    cached: false,
                    fetched_at: now,
                    warning: Some(format!("Live data unavailable ({e}), showing sample data")),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn week_body() -> serde_json::Value {
        serde_json::json!({
            "stations": [{
                "title": "Kvarnberget",
                "id": "kvarnberget",
                "temp": "3.4",
                "data": [
                    { "datetime": "2024-01-15 09:00:00", "temperatur": "3.1" },
                    { "datetime": "2024-01-15 10:00:00", "temperatur": "3.4" }
                ]
            }]
        })
    }

    async fn service_for(server: &MockServer) -> TrendService {
        TrendService::builder()
            .station_id("kvarnberget")
            .endpoint(&server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
            .expect(1)
            .mount(&server)
            .await;

        let mut service = service_for(&server).await;
        let now = Utc::now();

        let first = service.fetch_trend(false, now).await.unwrap();
        assert!(!first.cached);

        let second = service
            .fetch_trend(false, now + Duration::minutes(10))
            .await
            .unwrap();
        assert!(second.cached);
        assert_eq!(second.fetched_at, now);
        assert_eq!(second.output.series.len(), first.output.series.len());
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_fresh_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
            .expect(2)
            .mount(&server)
            .await;

        let mut service = service_for(&server).await;
        let now = Utc::now();

        service.fetch_trend(false, now).await.unwrap();
        let later = service
            .fetch_trend(false, now + Duration::minutes(55))
            .await
            .unwrap();
        assert!(!later.cached);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_a_valid_cache_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
            .expect(2)
            .mount(&server)
            .await;

        let mut service = service_for(&server).await;
        let now = Utc::now();

        service.fetch_trend(false, now).await.unwrap();
        let forced = service
            .fetch_trend(true, now + Duration::minutes(1))
            .await
            .unwrap();
        assert!(!forced.cached);
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_sample_data_with_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut service = service_for(&server).await;
        let report = service.fetch_trend(false, Utc::now()).await.unwrap();

        assert!(report.warning.is_some());
        assert!(!report.cached);
        assert_eq!(report.output.station.id, "kvarnberget");
        assert_eq!(report.output.series.len(), 168);
    }

    #[tokio::test]
    async fn failed_fetch_does_not_poison_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let mut service = service_for(&server).await;
        let now = Utc::now();

        let first = service.fetch_trend(false, now).await.unwrap();
        assert!(first.warning.is_some());

        // Sample-backed reports are not cached; the next call retries live.
        let second = service
            .fetch_trend(false, now + Duration::minutes(1))
            .await
            .unwrap();
        assert!(second.warning.is_some());
        assert!(!second.cached);
    }

    #[tokio::test]
    async fn bundled_sample_dataset_classifies_cleanly() {
        let payload: StationPayload = serde_json::from_str(SAMPLE_WEEK).unwrap();
        let output = derive_trend(&normalize_payload(&payload).unwrap()).unwrap();
        assert_eq!(output.series.len(), 168);
        assert!(output
            .smoothed
            .iter()
            .all(|r| r.temperature.is_finite()));
    }
}
