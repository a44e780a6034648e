//! Fetch hourly outdoor temperatures for a single weather station, smooth
//! the trend, infer the current season and serve the result through a
//! caching proxy endpoint.
//!
//! The core is a pure pipeline over an ordered series of timestamped
//! readings: [`normalize`] → [`smooth`] → [`classify`]. A single-slot
//! [`TimedCache`] with a 55-minute TTL gates whether the upstream API is
//! called at all, and [`TrendService`] coordinates the whole chain with a
//! bundled sample dataset as the last-resort fallback.

mod cache;
mod error;
mod fetch;
mod pipeline;
mod season;
mod series;
mod server;
mod service;
mod smooth;

pub use cache::{CacheEntry, TimedCache, CACHE_TTL_MINUTES};
pub use error::TemptrendError;
pub use fetch::{FetchError, StationClient, DEFAULT_ENDPOINT};
pub use pipeline::{derive_trend, normalize_payload, run_pipeline, NormalizedWeek, PipelineOutput};
pub use season::{
    classify, Season, SeasonVerdict, AUTUMN_THRESHOLD, LOOKBACK, LOOKBACK_DAYS, SAMPLES_PER_DAY,
    WINTER_THRESHOLD,
};
pub use series::{normalize, RawSample, Reading, StationData, StationInfo, StationPayload};
pub use server::{router, SharedService};
pub use service::{TrendReport, TrendService};
pub use smooth::{smooth, DEFAULT_WINDOW};
