//! Cycle calendar
//!
//! Date lookups for cycles that already exist: which training day a given
//! date is, and how loaded each day of a month is across all of a user's
//! cycles.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::projector::{parse_date, training_index};

/// Start date and rhythm of a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePlan {
    pub start: NaiveDate,
    pub training_days: u32,
    pub rest_days: u32,
    /// Training-day indices (1-based) that carry no exercises
    #[serde(default)]
    pub empty_days: BTreeSet<u32>,
}

impl CyclePlan {
    pub fn new(start: NaiveDate, training_days: u32, rest_days: u32) -> Self {
        Self {
            start,
            training_days,
            rest_days,
            empty_days: BTreeSet::new(),
        }
    }

    /// Mark training days (1-based) that have no exercises
    pub fn with_empty_days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.empty_days.extend(days);
        self
    }

    /// Parse `START:TRAINING:REST`, e.g. `2026-02-01:3:2`
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        let start = parse_date(parts.next()?)?;
        let training_days = parts.next()?.trim().parse().ok()?;
        let rest_days = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(start, training_days, rest_days))
    }

    /// Training-day index (1-based) on `date`, `None` on rest days.
    ///
    /// Dates before `start` follow the same rhythm backwards.
    pub fn training_day_on(&self, date: NaiveDate) -> Option<u32> {
        let offset = (date - self.start).num_days();
        training_index(offset, self.training_days, self.rest_days)
    }

    /// Whether `date` is a training day with exercises.
    ///
    /// A plan with no training and no rest days never loads a day.
    pub fn loads(&self, date: NaiveDate) -> bool {
        if self.training_days == 0 && self.rest_days == 0 {
            return false;
        }
        self.training_day_on(date)
            .is_some_and(|index| !self.empty_days.contains(&index))
    }
}

/// Number of training cycles falling on each day of a month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthLoad {
    pub days: BTreeMap<NaiveDate, u32>,
    pub max: u32,
}

/// Count, for every day of `year`-`month`, how many plans train that day.
///
/// Only days with exercises count (see [`CyclePlan::loads`]). An invalid
/// month yields an empty load.
pub fn month_load(plans: &[CyclePlan], year: i32, month: u32) -> MonthLoad {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthLoad::default();
    };

    let days: BTreeMap<NaiveDate, u32> = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let count = plans
                .iter()
                .filter(|plan| plan.loads(date))
                .count();
            (date, u32::try_from(count).unwrap_or(u32::MAX))
        })
        .collect();

    let max = days.values().copied().max().unwrap_or(0);
    MonthLoad { days, max }
}
