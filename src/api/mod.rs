//! Cycle API
//!
//! Typed operations of the remote fitness API, built on [`RequestClient`].
//!
//! # Endpoints
//!
//! ## Account
//! - `POST /user/` - Check a username/password pair
//! - `POST /sign_up/` - Register
//! - `GET /profile/{user}/` - Public profile
//! - `POST /update_profile/` - Change bio
//!
//! ## Cycles
//! - `POST /user_cycles/`, `/create_cycle/`, `/delete_cycle/`
//! - `POST /publish_cycle/`, `/unpublish_cycle/`, `/clone_cycle/`
//! - `POST /analytics/`, `/analytics_public/`, `/get_exercises/`
//!
//! ## Days
//! - `POST /day/` - Duties of one date
//! - `POST /duty/` - Toggle a duty's completion
//! - `POST /month_duties/` - Per-day load of a month
//!
//! ## Social
//! - `GET /followers/{user}/`, `GET /following/{user}/`
//! - `POST /follow/`, `/unfollow/`, `/like_cycle/`, `/unlike_cycle/`
//! - `POST /feed/`, `/search_cycles/`, `/search_users/`, `/get_in_users/`
//!
//! ## Notes and comments
//! - `POST /create_note/`, `/get_notes/`, `/delete_note/`
//! - `POST /create_comment/`, `/delete_comment/`, `/get_comments/`
//!
//! GETs go through the coalescing path; every mutation is a plain POST.

pub mod dto;

pub use dto::{Comment, CommentTarget, CreateCycleRequest, CycleSummary, DayDuties, NO_EXERCISES};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::{auth, ApiError, ApiResult, Credential, RequestClient};
use crate::schedule::{parse_date, CyclePlan};
use dto::*;

/// Remote operations on behalf of one (possibly signed-out) user
pub struct CycleApi<'a> {
    client: &'a RequestClient,
    user: Option<&'a Credential>,
}

impl<'a> CycleApi<'a> {
    pub fn new(client: &'a RequestClient, user: Option<&'a Credential>) -> Self {
        Self { client, user }
    }

    pub fn user(&self) -> Option<&Credential> {
        self.user
    }

    // ============================================
    // Account
    // ============================================

    /// Verify a username/password pair
    pub async fn sign_in(&self, username: &str, password: &str) -> ApiResult<Value> {
        self.client
            .post("/user/", json!({ "username": username, "password": password }))
            .await
    }

    /// Register a new account
    pub async fn sign_up(&self, username: &str, password: &str) -> ApiResult<Value> {
        self.client
            .post("/sign_up/", json!({ "username": username, "password": password }))
            .await
    }

    pub async fn profile(&self, username: &str) -> ApiResult<Value> {
        self.client.get(&user_path("profile", username)).await
    }

    pub async fn update_profile(&self, bio: &str) -> ApiResult<Value> {
        self.post_authed("/update_profile/", &Bio { bio }).await
    }

    // ============================================
    // Cycles
    // ============================================

    /// Cycles owned by the signed-in user
    pub async fn user_cycles(&self) -> ApiResult<Vec<CycleSummary>> {
        let body = self.post_authed("/user_cycles/", &json!({})).await?;
        Ok(decode::<CyclesResponse>(body)?.cycles)
    }

    /// Calendar rhythms of the signed-in user's cycles.
    ///
    /// Cycles with a malformed start date are skipped.
    pub async fn cycle_plans(&self) -> ApiResult<Vec<CyclePlan>> {
        let cycles = self.user_cycles().await?;
        Ok(cycles.iter().filter_map(CycleSummary::plan).collect())
    }

    /// Create a cycle.
    ///
    /// Rejected locally when the descriptions do not cover every training day
    /// or the start date is not `YYYY-MM-DD`.
    pub async fn create_cycle(&self, request: &CreateCycleRequest) -> ApiResult<Value> {
        if request.descriptions.len() != request.days_count as usize {
            return Err(ApiError::InvalidRequest(format!(
                "expected {} day descriptions, got {}",
                request.days_count,
                request.descriptions.len()
            )));
        }
        if parse_date(&request.start_at).is_none() {
            return Err(ApiError::InvalidRequest(format!(
                "invalid start date {:?}, use YYYY-MM-DD",
                request.start_at
            )));
        }

        self.post_authed("/create_cycle/", request).await
    }

    pub async fn delete_cycle(&self, cycle_name: &str) -> ApiResult<Value> {
        self.post_authed("/delete_cycle/", &CycleName { cycle_name })
            .await
    }

    pub async fn publish_cycle(&self, cycle_name: &str) -> ApiResult<Value> {
        self.post_authed("/publish_cycle/", &CycleName { cycle_name })
            .await
    }

    pub async fn unpublish_cycle(&self, cycle_name: &str) -> ApiResult<Value> {
        self.post_authed("/unpublish_cycle/", &CycleName { cycle_name })
            .await
    }

    /// Copy someone's public cycle into the signed-in user's cycles
    pub async fn clone_cycle(&self, cycle_id: i64, start_at: &str) -> ApiResult<Value> {
        self.post_authed("/clone_cycle/", &CloneCycle { cycle_id, start_at })
            .await
    }

    /// Muscle-load analytics of one of the signed-in user's cycles
    pub async fn analytics(&self, cycle_name: &str) -> ApiResult<Value> {
        self.post_authed("/analytics/", &CycleName { cycle_name })
            .await
    }

    /// Muscle-load analytics of another user's public cycle
    pub async fn analytics_public(&self, target_user: &str, cycle_name: &str) -> ApiResult<Value> {
        self.post_authed(
            "/analytics_public/",
            &PublicAnalytics {
                cycle_name,
                target_user,
            },
        )
        .await
    }

    /// Exercise catalogue
    pub async fn exercises(&self) -> ApiResult<Value> {
        self.client.post("/get_exercises/", json!({})).await
    }

    // ============================================
    // Days
    // ============================================

    /// Duties scheduled on `day` (`YYYY-MM-DD`)
    pub async fn day(&self, day: &str) -> ApiResult<DayDuties> {
        let body = self.post_authed("/day/", &DayRequest { day }).await?;
        decode(body)
    }

    /// Flip the completion of one duty
    pub async fn toggle_duty(&self, selected_date: &str, duty_name: &str) -> ApiResult<Value> {
        self.post_authed(
            "/duty/",
            &DutyRequest {
                selected_date,
                duty_name,
            },
        )
        .await
    }

    pub async fn month_duties(&self, year: i32, month: u32) -> ApiResult<Value> {
        self.post_authed("/month_duties/", &MonthRequest { year, month })
            .await
    }

    // ============================================
    // Social
    // ============================================

    pub async fn followers(&self, username: &str) -> ApiResult<Value> {
        self.client.get(&user_path("followers", username)).await
    }

    pub async fn following(&self, username: &str) -> ApiResult<Value> {
        self.client.get(&user_path("following", username)).await
    }

    pub async fn follow(&self, target_user: &str) -> ApiResult<Value> {
        self.post_authed("/follow/", &TargetUser { target_user })
            .await
    }

    pub async fn unfollow(&self, target_user: &str) -> ApiResult<Value> {
        self.post_authed("/unfollow/", &TargetUser { target_user })
            .await
    }

    pub async fn like_cycle(&self, cycle_id: i64) -> ApiResult<Value> {
        self.post_authed("/like_cycle/", &CycleId { cycle_id }).await
    }

    pub async fn unlike_cycle(&self, cycle_id: i64) -> ApiResult<Value> {
        self.post_authed("/unlike_cycle/", &CycleId { cycle_id })
            .await
    }

    /// Users who liked a cycle
    pub async fn liked_by(&self, cycle_id: i64) -> ApiResult<Value> {
        let body = to_object(&CycleId { cycle_id })?;
        self.client.post("/get_in_users/", body).await
    }

    /// Public cycles from followed users, or the global top when following
    /// nobody
    pub async fn feed(&self) -> ApiResult<Vec<CycleSummary>> {
        let body = self.post_authed("/feed/", &json!({})).await?;
        Ok(decode::<CyclesResponse>(body)?.cycles)
    }

    /// Search public cycles. Works signed out.
    pub async fn search_cycles(&self, query: &str) -> ApiResult<Value> {
        let body = auth(self.user, to_object(&SearchQuery { query })?);
        self.client.post("/search_cycles/", body).await
    }

    /// Search users. Works signed out.
    pub async fn search_users(&self, query: &str) -> ApiResult<Value> {
        let body = auth(self.user, to_object(&SearchQuery { query })?);
        self.client.post("/search_users/", body).await
    }

    // ============================================
    // Notes and comments
    // ============================================

    pub async fn create_note(&self, name: &str, text: &str) -> ApiResult<Value> {
        self.post_authed(
            "/create_note/",
            &CreateNote {
                name,
                descriptions: text,
            },
        )
        .await
    }

    pub async fn get_notes(&self) -> ApiResult<Value> {
        self.post_authed("/get_notes/", &json!({})).await
    }

    pub async fn delete_note(&self, note_name: &str) -> ApiResult<Value> {
        self.post_authed("/delete_note/", &NoteName { note_name })
            .await
    }

    /// Comments on a cycle or note, newest first
    pub async fn get_comments(&self, target: CommentTarget, target_id: i64) -> ApiResult<Vec<Comment>> {
        let body = to_object(&CommentThread {
            target_type: target,
            target_id,
        })?;
        let response = self.client.post("/get_comments/", body).await?;
        Ok(decode::<CommentsResponse>(response)?.comments)
    }

    pub async fn create_comment(
        &self,
        target: CommentTarget,
        target_id: i64,
        text: &str,
    ) -> ApiResult<Value> {
        self.post_authed(
            "/create_comment/",
            &CreateComment {
                target_type: target,
                target_id,
                text,
            },
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<Value> {
        self.post_authed("/delete_comment/", &CommentId { comment_id })
            .await
    }

    // ============================================
    // Helpers
    // ============================================

    /// POST an authenticated body. Fails before any network call when
    /// signed out.
    async fn post_authed<T: Serialize + ?Sized>(&self, path: &str, extra: &T) -> ApiResult<Value> {
        let user = self.user.ok_or(ApiError::NotAuthenticated)?;
        let body = auth(Some(user), to_object(extra)?);
        self.client.post(path, body).await
    }
}

/// `/{prefix}/{username}/` with the name percent-encoded
fn user_path(prefix: &str, username: &str) -> String {
    format!("/{}/{}/", prefix, urlencoding::encode(username))
}

fn to_object<T: Serialize + ?Sized>(value: &T) -> ApiResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn decode<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    Ok(serde_json::from_value(body)?)
}
