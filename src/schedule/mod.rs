//! Schedule Projector
//!
//! Calendar computations for periodic workout cycles. Everything here is
//! synchronous and pure; nothing touches the network.
//!
//! - [`project`]: preview of the next N days of a plan being edited
//! - [`CyclePlan::training_day_on`]: training-day index of any date
//! - [`month_load`]: per-day training counts across several cycles

mod calendar;
mod projector;

pub use calendar::{month_load, CyclePlan, MonthLoad};
pub use projector::{
    parse_date, project, project_from_str, SchedulePreviewEntry, DATE_FORMAT,
    DEFAULT_HORIZON_DAYS,
};
