//! The pure transformation chain: raw payload → normalized week → smoothed
//! series → season verdict.
//!
//! Split in two stages on purpose. Normalization runs once per upstream
//! fetch and its output is what the cache holds; smoothing and
//! classification are derived fresh on every call, cached payload or not.
//! Both stages are free of I/O and clock access, so the orchestrator runs
//! them identically over a fresh response, a cached week or the bundled
//! sample dataset.

use crate::error::TemptrendError;
use crate::fetch::FetchError;
use crate::season::{classify, SeasonVerdict};
use crate::series::{normalize, Reading, StationInfo, StationPayload};
use crate::smooth::{smooth, DEFAULT_WINDOW};
use serde::{Deserialize, Serialize};

/// The normalized form of one upstream response: station identity plus the
/// parsed hourly series. This is the unit the cache stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedWeek {
    pub station: StationInfo,
    pub series: Vec<Reading>,
}

/// Everything derived from one station payload in a single pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub series: Vec<Reading>,
    pub smoothed: Vec<Reading>,
    pub verdict: SeasonVerdict,
    pub station: StationInfo,
}

/// Normalizes the first station of an upstream payload.
///
/// # Errors
///
/// Returns [`FetchError::NoStations`] (wrapped) when the payload carries an
/// empty station list; the upstream response is untrusted and this is a hard
/// failure for the call.
pub fn normalize_payload(payload: &StationPayload) -> Result<NormalizedWeek, TemptrendError> {
    let station = payload.stations.first().ok_or(FetchError::NoStations)?;
    Ok(NormalizedWeek {
        station: StationInfo::from(station),
        series: normalize(&station.data),
    })
}

/// Smooths and classifies an already-normalized week.
///
/// Always recomputed; the smoothed series and verdict are never cached.
pub fn derive_trend(week: &NormalizedWeek) -> Result<PipelineOutput, TemptrendError> {
    let smoothed = smooth(&week.series, DEFAULT_WINDOW)?;
    let verdict = classify(&smoothed);
    Ok(PipelineOutput {
        series: week.series.clone(),
        smoothed,
        verdict,
        station: week.station.clone(),
    })
}

/// Runs the full transformation over the first station in the payload.
pub fn run_pipeline(payload: &StationPayload) -> Result<PipelineOutput, TemptrendError> {
    derive_trend(&normalize_payload(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::{Season, LOOKBACK};
    use crate::series::{RawSample, StationData};
    use chrono::NaiveDate;

    fn payload_with_hourly(values: &[f64]) -> StationPayload {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let data = values
            .iter()
            .enumerate()
            .map(|(i, v)| RawSample {
                datetime: (start + chrono::Duration::hours(i as i64))
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                temperatur: v.to_string(),
            })
            .collect();
        StationPayload {
            stations: vec![StationData {
                title: "Kvarnberget".to_string(),
                id: "kvarnberget".to_string(),
                temp: Some("-1.0".to_string()),
                data,
            }],
        }
    }

    #[test]
    fn series_and_smoothed_share_length() {
        let output = run_pipeline(&payload_with_hourly(&[1.0; 48])).unwrap();
        assert_eq!(output.series.len(), 48);
        assert_eq!(output.smoothed.len(), 48);
    }

    #[test]
    fn freezing_week_comes_out_winter() {
        let output = run_pipeline(&payload_with_hourly(&[-4.0; LOOKBACK + 24])).unwrap();
        assert_eq!(output.verdict.season, Season::Winter);
    }

    #[test]
    fn station_info_carries_over_without_bulk_data() {
        let week = normalize_payload(&payload_with_hourly(&[1.0; 4])).unwrap();
        assert_eq!(week.station.id, "kvarnberget");
        assert_eq!(week.station.title, "Kvarnberget");
        assert_eq!(week.station.temp.as_deref(), Some("-1.0"));
    }

    #[test]
    fn deriving_twice_from_one_week_is_stable() {
        let week = normalize_payload(&payload_with_hourly(&[3.0; 30])).unwrap();
        let first = derive_trend(&week).unwrap();
        let second = derive_trend(&week).unwrap();
        assert_eq!(first.smoothed, second.smoothed);
        assert_eq!(first.verdict, second.verdict);
    }

    #[test]
    fn empty_station_list_is_a_hard_failure() {
        let payload = StationPayload { stations: vec![] };
        let err = run_pipeline(&payload).unwrap_err();
        assert!(matches!(
            err,
            TemptrendError::Fetch(FetchError::NoStations)
        ));
    }

    #[test]
    fn empty_data_array_yields_unknown_verdict() {
        let output = run_pipeline(&payload_with_hourly(&[])).unwrap();
        assert!(output.series.is_empty());
        assert_eq!(output.verdict.season, Season::Unknown);
    }
}
