//! Schedule projection
//!
//! Pure, deterministic preview of a periodic training plan: which of the next
//! N days are training days and which training-day index each one falls on.

use chrono::NaiveDate;
use serde::Serialize;

/// Days previewed when the caller does not choose a horizon
pub const DEFAULT_HORIZON_DAYS: u32 = 21;

/// Date format accepted by [`project_from_str`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One previewed day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulePreviewEntry {
    pub date: NaiveDate,
    pub is_training_day: bool,
    /// 1-based position within the training block, `None` on rest days
    pub training_day_index: Option<u32>,
}

/// Project `horizon_days` days starting at `start`.
///
/// Day `i` is a training day iff `i mod (training_days + rest_days)` is below
/// `training_days`. A zero period yields all training days. No start date
/// yields an empty preview.
pub fn project(
    start: Option<NaiveDate>,
    training_days: u32,
    rest_days: u32,
    horizon_days: u32,
) -> Vec<SchedulePreviewEntry> {
    let Some(start) = start else {
        return Vec::new();
    };

    start
        .iter_days()
        .take(horizon_days as usize)
        .zip(0i64..)
        .map(|(date, offset)| {
            let training_day_index = training_index(offset, training_days, rest_days);
            SchedulePreviewEntry {
                date,
                is_training_day: training_day_index.is_some(),
                training_day_index,
            }
        })
        .collect()
}

/// [`project`] with a `YYYY-MM-DD` start date.
///
/// An absent or unparseable date yields an empty preview rather than an error.
pub fn project_from_str(
    start: Option<&str>,
    training_days: u32,
    rest_days: u32,
    horizon_days: u32,
) -> Vec<SchedulePreviewEntry> {
    let start = start.and_then(parse_date);
    project(start, training_days, rest_days, horizon_days)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Training-day index for a day `offset` days after the cycle start.
///
/// Negative offsets wrap with Euclidean modulo, so the cycle extends
/// backwards as well.
pub(crate) fn training_index(offset: i64, training_days: u32, rest_days: u32) -> Option<u32> {
    let period = i64::from(training_days) + i64::from(rest_days);

    if period == 0 {
        return u32::try_from(offset.checked_add(1)?).ok().filter(|i| *i > 0);
    }

    let idx = offset.rem_euclid(period);
    if idx < i64::from(training_days) {
        u32::try_from(idx + 1).ok()
    } else {
        None
    }
}
