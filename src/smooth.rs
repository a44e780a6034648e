//! Trailing moving-average smoothing over an hourly series.
//!
//! Only the trailing window is implemented. A centered window reads future
//! samples into past trend values, which would make the season inference
//! downstream non-causal, so it is deliberately not offered.

use crate::error::TemptrendError;
use crate::series::Reading;

/// Default smoothing window: a 24-hour trailing average over hourly samples.
pub const DEFAULT_WINDOW: usize = 24;

/// Computes a trailing moving average over `series`.
///
/// Index `i` of the result averages `series[max(0, i + 1 - window) ..= i]`,
/// so the window shrinks near the start of the series instead of padding or
/// reflecting. Timestamps and labels are carried over unchanged and values
/// are rounded to one decimal place; the output always has the same length
/// as the input.
///
/// # Errors
///
/// Returns [`TemptrendError::InvalidWindow`] when `window` is zero. That is
/// a caller bug, not a data condition.
///
/// # Examples
///
/// ```
/// use temptrend::{normalize, smooth, RawSample};
///
/// let raw: Vec<RawSample> = (0..4)
///     .map(|h| RawSample {
///         datetime: format!("2024-01-15 {:02}:00:00", h),
///         temperatur: format!("{}", h * 2),
///     })
///     .collect();
/// let series = normalize(&raw);
/// let smoothed = smooth(&series, 2).unwrap();
///
/// assert_eq!(smoothed.len(), series.len());
/// assert_eq!(smoothed[0].temperature, 0.0); // window of one at the boundary
/// assert_eq!(smoothed[3].temperature, 5.0); // (4 + 6) / 2
/// ```
pub fn smooth(series: &[Reading], window: usize) -> Result<Vec<Reading>, TemptrendError> {
    if window == 0 {
        return Err(TemptrendError::InvalidWindow(window));
    }

    let mut smoothed = Vec::with_capacity(series.len());
    for (i, reading) in series.iter().enumerate() {
        let start = (i + 1).saturating_sub(window);
        let slice = &series[start..=i];
        let sum: f64 = slice.iter().map(|r| r.temperature).sum();
        let average = sum / slice.len() as f64;
        smoothed.push(Reading {
            temperature: (average * 10.0).round() / 10.0,
            ..reading.clone()
        });
    }
    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_of(values: &[f64]) -> Vec<Reading> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let ts = start + chrono::Duration::hours(i as i64);
                Reading {
                    timestamp: ts,
                    temperature: v,
                    date_label: ts.format("%-d/%-m").to_string(),
                    time_label: ts.format("%H:%M").to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn output_length_matches_input_for_any_window() {
        let series = series_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        for window in [1, 2, 3, 5, 24, 1000] {
            let smoothed = smooth(&series, window).unwrap();
            assert_eq!(smoothed.len(), series.len(), "window {}", window);
        }
    }

    #[test]
    fn first_element_equals_source_exactly() {
        let series = series_of(&[-7.3, 1.0, 2.0]);
        let smoothed = smooth(&series, DEFAULT_WINDOW).unwrap();
        assert_eq!(smoothed[0].temperature, -7.3);
    }

    #[test]
    fn constant_series_stays_constant() {
        let series = series_of(&[4.2; 30]);
        for window in [1, 6, 24] {
            let smoothed = smooth(&series, window).unwrap();
            assert!(smoothed.iter().all(|r| r.temperature == 4.2));
        }
    }

    #[test]
    fn trailing_window_never_reads_ahead() {
        // A step change must only show up from the step index onward.
        let mut values = vec![0.0; 10];
        values.extend_from_slice(&[10.0; 10]);
        let smoothed = smooth(&series_of(&values), 4).unwrap();
        assert_eq!(smoothed[9].temperature, 0.0);
        assert!(smoothed[10].temperature > 0.0);
    }

    #[test]
    fn window_shrinks_at_the_left_boundary() {
        let smoothed = smooth(&series_of(&[2.0, 4.0, 6.0, 8.0]), 3).unwrap();
        assert_eq!(smoothed[0].temperature, 2.0);
        assert_eq!(smoothed[1].temperature, 3.0); // (2 + 4) / 2
        assert_eq!(smoothed[2].temperature, 4.0); // (2 + 4 + 6) / 3
        assert_eq!(smoothed[3].temperature, 6.0); // (4 + 6 + 8) / 3
    }

    #[test]
    fn values_round_to_one_decimal() {
        let smoothed = smooth(&series_of(&[1.0, 2.0, 2.0]), 3).unwrap();
        // (1 + 2 + 2) / 3 = 1.666... -> 1.7
        assert_eq!(smoothed[2].temperature, 1.7);
    }

    #[test]
    fn timestamps_and_labels_carry_over() {
        let series = series_of(&[1.0, 2.0]);
        let smoothed = smooth(&series, 2).unwrap();
        assert_eq!(smoothed[1].timestamp, series[1].timestamp);
        assert_eq!(smoothed[1].time_label, series[1].time_label);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = smooth(&series_of(&[1.0]), 0).unwrap_err();
        assert!(matches!(err, TemptrendError::InvalidWindow(0)));
    }

    #[test]
    fn empty_series_smooths_to_empty() {
        assert!(smooth(&[], DEFAULT_WINDOW).unwrap().is_empty());
    }
}
