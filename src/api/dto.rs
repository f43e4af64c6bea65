//! Data Transfer Objects
//!
//! Request bodies sent to the remote API and the response shapes the
//! facade decodes. Request bodies carry only the operation's own fields;
//! `user`/`password` are merged in by [`crate::client::auth`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::schedule::{parse_date, CyclePlan};

// ============================================
// CYCLE DTOs
// ============================================

/// Description the web client stores for a training day with no exercises
pub const NO_EXERCISES: &str = "Нет упражнений";

/// New training cycle
#[derive(Debug, Clone, Serialize)]
pub struct CreateCycleRequest {
    pub name: String,
    /// Number of training days in one period
    pub days_count: u32,
    /// Number of rest days after the training block
    pub pause: u32,
    /// Start date, `YYYY-MM-DD`
    pub start_at: String,
    /// One description per training day
    pub descriptions: Vec<String>,
    /// Structured exercises per day, opaque to the client
    pub data_cycle: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct CycleName<'a> {
    pub cycle_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CycleId {
    pub cycle_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CloneCycle<'a> {
    pub cycle_id: i64,
    pub start_at: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PublicAnalytics<'a> {
    pub cycle_name: &'a str,
    pub target_user: &'a str,
}

/// Cycle as listed by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CycleSummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub user: Option<String>,
    pub days_count: u32,
    #[serde(default)]
    pub pause: u32,
    pub start_at: String,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub ins_count: u32,
    #[serde(default)]
    pub is_in: bool,
}

impl CycleSummary {
    /// Calendar rhythm of this cycle, `None` if its start date is malformed.
    ///
    /// Training days whose description is missing, blank or [`NO_EXERCISES`]
    /// are marked empty.
    pub fn plan(&self) -> Option<CyclePlan> {
        let start = parse_date(&self.start_at)?;
        let empty = (1..=self.days_count).filter(|day| {
            self.descriptions
                .get(*day as usize - 1)
                .map_or(true, |d| d.is_empty() || d == NO_EXERCISES)
        });
        Some(CyclePlan::new(start, self.days_count, self.pause).with_empty_days(empty))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CyclesResponse {
    #[serde(default)]
    pub cycles: Vec<CycleSummary>,
}

// ============================================
// DAY DTOs
// ============================================

#[derive(Debug, Serialize)]
pub(crate) struct DayRequest<'a> {
    pub day: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DutyRequest<'a> {
    pub selected_date: &'a str,
    pub duty_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonthRequest {
    pub year: i32,
    pub month: u32,
}

/// Duties of one day: description → completion (0 or 1)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DayDuties {
    #[serde(default)]
    pub duties: BTreeMap<String, u8>,
}

impl DayDuties {
    pub fn completed(&self) -> usize {
        self.duties.values().filter(|done| **done != 0).count()
    }
}

// ============================================
// SOCIAL DTOs
// ============================================

#[derive(Debug, Serialize)]
pub(crate) struct TargetUser<'a> {
    pub target_user: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchQuery<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Bio<'a> {
    pub bio: &'a str,
}

// ============================================
// NOTE DTOs
// ============================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateNote<'a> {
    pub name: &'a str,
    pub descriptions: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteName<'a> {
    pub note_name: &'a str,
}

// ============================================
// COMMENT DTOs
// ============================================

/// What a comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTarget {
    Cycle,
    Note,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentThread {
    pub target_type: CommentTarget,
    pub target_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateComment<'a> {
    pub target_type: CommentTarget,
    pub target_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentId {
    pub comment_id: i64,
}

/// A comment as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user: String,
    pub text: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}
