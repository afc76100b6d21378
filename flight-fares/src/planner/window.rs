//! Splitting a requested date span into backend-legal sub-ranges.
//!
//! The calendar endpoint only answers for dates between today and a fixed
//! horizon, and only over a bounded span per request. A request is clamped
//! to `[today, today + horizon_days]` and, when still longer than
//! `window_days`, split in two:
//!
//! ```text
//! [start, start + window_days]   [start + window_days + 1, end]
//! ```
//!
//! With the default limits (330 / 199) the clamped span never exceeds two
//! windows. The boundaries match what the browser client sends: the second
//! window starts one day after the first ends, and both are inclusive.

use chrono::{Days, NaiveDate};

use crate::domain::DateRange;

use super::config::SearchConfig;

/// Error from date range planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Nothing of the requested span lies between today and the horizon
    #[error("no searchable dates between {start} and {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Plan the calendar requests covering `[start, end]`.
///
/// Returns one range, or two when the clamped span exceeds
/// `config.window_days`.
pub fn plan(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    config: &SearchConfig,
) -> Result<Vec<DateRange>, PlanError> {
    let invalid = || PlanError::InvalidRange { start, end };

    let horizon = today + Days::new(u64::from(config.horizon_days));
    let from = start.max(today);
    let to = end.min(horizon);

    if to < from {
        return Err(invalid());
    }

    let window = u64::from(config.window_days);
    let span = (to - from).num_days();

    let ranges = if span <= i64::from(config.window_days) {
        vec![DateRange::new(from, to).map_err(|_| invalid())?]
    } else {
        let first_end = from + Days::new(window);
        let second_start = from + Days::new(window + 1);
        vec![
            DateRange::new(from, first_end).map_err(|_| invalid())?,
            DateRange::new(second_start, to).map_err(|_| invalid())?,
        ]
    };

    Ok(ranges)
}
