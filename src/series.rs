//! Wire types for the upstream station API and normalization of its raw
//! text samples into an ordered numeric series.
//!
//! The upstream delivers every value as text. Normalization parses both
//! fields, derives the chart labels, and drops any sample it cannot parse
//! rather than letting a `NaN` or a bogus zero leak into the smoothing math.

use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};

/// Accepted upstream datetime layouts, tried in order.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Top-level shape of the upstream response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationPayload {
    pub stations: Vec<StationData>,
}

/// One station's block in the upstream response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationData {
    pub title: String,
    pub id: String,
    /// Current temperature as delivered, still text.
    #[serde(default)]
    pub temp: Option<String>,
    #[serde(default)]
    pub data: Vec<RawSample>,
}

/// A single raw sample as delivered by the upstream API.
///
/// The temperature field keeps the upstream's Swedish spelling on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    pub datetime: String,
    pub temperatur: String,
}

/// Station identity surfaced to the proxy response, minus the bulk data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    pub title: String,
    pub id: String,
    pub temp: Option<String>,
}

impl From<&StationData> for StationInfo {
    fn from(station: &StationData) -> Self {
        Self {
            title: station.title.clone(),
            id: station.id.clone(),
            temp: station.temp.clone(),
        }
    }
}

/// One parsed hourly reading. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Degrees Celsius. Never `NaN` or infinite; unparseable samples are
    /// dropped during normalization instead.
    pub temperature: f64,
    /// Short chart label for the day, e.g. `14/1`.
    pub date_label: String,
    /// Chart label for the hour, e.g. `09:00`.
    pub time_label: String,
}

impl Reading {
    fn new(timestamp: NaiveDateTime, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
            date_label: timestamp.format("%-d/%-m").to_string(),
            time_label: timestamp.format("%H:%M").to_string(),
        }
    }

    /// Renders the reading back into the upstream wire shape.
    ///
    /// Round-trips exactly: normalizing the output of `to_raw_sample` yields
    /// the same reading again.
    pub fn to_raw_sample(&self) -> RawSample {
        RawSample {
            datetime: self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            temperatur: self.temperature.to_string(),
        }
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
}

fn parse_temperature(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Converts raw upstream samples into an ordered numeric series.
///
/// Input order is preserved and never re-sorted; the upstream already
/// delivers chronological order, and duplicates are tolerated as-is. Any
/// sample whose datetime or temperature fails to parse is dropped with a
/// warning, so the output length can be shorter than the input but the
/// output never contains a `NaN`.
///
/// # Examples
///
/// ```
/// use temptrend::{normalize, RawSample};
///
/// let raw = vec![
///     RawSample { datetime: "2024-01-15 09:00:00".into(), temperatur: "-3.2".into() },
///     RawSample { datetime: "2024-01-15 10:00:00".into(), temperatur: "broken".into() },
/// ];
/// let series = normalize(&raw);
/// assert_eq!(series.len(), 1);
/// assert_eq!(series[0].temperature, -3.2);
/// assert_eq!(series[0].time_label, "09:00");
/// ```
pub fn normalize(samples: &[RawSample]) -> Vec<Reading> {
    let mut readings = Vec::with_capacity(samples.len());
    for sample in samples {
        let Some(timestamp) = parse_datetime(&sample.datetime) else {
            warn!(
                "Dropping sample with unparseable datetime '{}'",
                sample.datetime
            );
            continue;
        };
        let Some(temperature) = parse_temperature(&sample.temperatur) else {
            warn!(
                "Dropping sample at {} with unparseable temperature '{}'",
                timestamp, sample.temperatur
            );
            continue;
        };
        readings.push(Reading::new(timestamp, temperature));
    }
    readings
}
