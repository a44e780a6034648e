//! Season inference over the trailing portion of a smoothed series.
//!
//! The rule is meteorological rather than calendrical: five straight days of
//! smoothed sub-zero readings means winter has arrived regardless of the
//! date. Winter is checked before autumn because a winter-qualifying run
//! also sits below the autumn threshold; reversing the order would silently
//! make winter unreachable.

use crate::series::Reading;
use serde::{Deserialize, Serialize};

/// Smoothed values below this mark count toward a winter streak (°C).
pub const WINTER_THRESHOLD: f64 = 0.0;
/// Smoothed values below this mark count toward an autumn streak (°C).
pub const AUTUMN_THRESHOLD: f64 = 10.0;
/// Hourly sampling rate assumed by the lookback maths.
pub const SAMPLES_PER_DAY: usize = 24;
/// Days a streak must run before a season verdict is called.
pub const LOOKBACK_DAYS: usize = 5;
/// Streak and recent-warmth horizon in samples: 120 with hourly data.
pub const LOOKBACK: usize = LOOKBACK_DAYS * SAMPLES_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Unknown,
}

/// Outcome of a classification call. Derived fresh each time, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonVerdict {
    pub season: Season,
    pub message: String,
}

/// Number of trailing values strictly below `threshold`, counted backward
/// from the end until the first value at or above it.
fn consecutive_below(smoothed: &[Reading], threshold: f64) -> usize {
    smoothed
        .iter()
        .rev()
        .take_while(|r| r.temperature < threshold)
        .count()
}

/// True iff any of the last [`LOOKBACK`] samples (or fewer, for a short
/// series) exceeds the autumn threshold.
fn recently_warm(smoothed: &[Reading]) -> bool {
    let start = smoothed.len().saturating_sub(LOOKBACK);
    smoothed[start..]
        .iter()
        .any(|r| r.temperature > AUTUMN_THRESHOLD)
}

/// Classifies the current season from a smoothed series.
///
/// Decision order, first match wins:
///
/// 1. at least [`LOOKBACK`] trailing values below 0 °C → winter,
/// 2. at least [`LOOKBACK`] trailing values below 10 °C → autumn,
/// 3. any value above 10 °C within the last [`LOOKBACK`] samples → summer,
/// 4. otherwise unknown, with an empty message.
///
/// An empty or short series is not an error; it simply cannot satisfy the
/// streak conditions and falls through the rules like any other data.
///
/// # Examples
///
/// ```
/// use temptrend::{classify, Season};
///
/// let verdict = classify(&[]);
/// assert_eq!(verdict.season, Season::Unknown);
/// assert!(verdict.message.is_empty());
/// ```
pub fn classify(smoothed: &[Reading]) -> SeasonVerdict {
    let below_winter = consecutive_below(smoothed, WINTER_THRESHOLD);
    let below_autumn = consecutive_below(smoothed, AUTUMN_THRESHOLD);

    let (season, message) = if below_winter >= LOOKBACK {
        (
            Season::Winter,
            format!(
                "Winter: the smoothed trend has stayed below {WINTER_THRESHOLD}\u{b0}C for {LOOKBACK_DAYS} days."
            ),
        )
    } else if below_autumn >= LOOKBACK {
        (
            Season::Autumn,
            format!(
                "Autumn: the smoothed trend has stayed below {AUTUMN_THRESHOLD}\u{b0}C for {LOOKBACK_DAYS} days."
            ),
        )
    } else if recently_warm(smoothed) {
        (
            Season::Summer,
            format!(
                "Summer: the smoothed trend passed {AUTUMN_THRESHOLD}\u{b0}C within the last {LOOKBACK_DAYS} days."
            ),
        )
    } else {
        (Season::Unknown, String::new())
    };

    SeasonVerdict { season, message }
}
