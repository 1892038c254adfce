use crate::database::session_store::{CandidateProfile, SessionStore};
use crate::error::{Error, Result};
use crate::models::exam_session::ExamSession;
use chrono::{Duration, Utc};
use sqlx::PgPool;

/// Orchestrates the session state machine
/// (`not_started → in_progress → ended → completed`) against the store.
/// Every operation is idempotent and safe to retry whole; race resolution
/// lives in the store's conditional statements, never here.
#[derive(Clone)]
pub struct SessionService {
    store: SessionStore,
    exam_duration: Duration,
}

impl SessionService {
    pub fn new(pool: PgPool, exam_duration_minutes: i64) -> Self {
        Self {
            store: SessionStore::new(pool),
            exam_duration: Duration::minutes(exam_duration_minutes),
        }
    }

    /// Arms the session clock exactly once per genuine attempt. A repeat
    /// call (page refresh, duplicate tab, retried fetch) returns the
    /// existing record untouched, so the clock can never restart. The one
    /// exception: a stale session (window elapsed, no completion) re-arms,
    /// so an abandoned attempt does not lock the candidate out forever.
    pub async fn start(&self, candidate: &CandidateProfile) -> Result<ExamSession> {
        let now = Utc::now();
        let stale_before = now - self.exam_duration;

        if let Some(armed) = self
            .store
            .arm_if_absent_or_stale(candidate, now, stale_before)
            .await?
        {
            tracing::info!(candidate = %candidate.id, started_at = %now, "exam session armed");
            return Ok(armed);
        }

        // Lost the conditional write: a live start already exists. Rows are
        // never deleted, so the follow-up read must find it.
        self.store
            .get_by_candidate(&candidate.id)
            .await?
            .ok_or_else(|| {
                Error::InvariantViolation(
                    "session record missing after conditional start".to_string(),
                )
            })
    }

    /// First call stamps `ended_at = now()`; every later call is a read in
    /// disguise. Tolerates a missing record by creating a bare one that
    /// `complete` reconciles.
    pub async fn end(&self, candidate_id: &str) -> Result<ExamSession> {
        let record = self
            .store
            .set_ended_if_unset(candidate_id, Utc::now())
            .await?;
        Ok(record)
    }

    /// Computes `completion_seconds` once. Ensures `ended_at` exists first
    /// (synthesizing `now()` through the same set-if-unset write), so `end`
    /// and `complete` can arrive in either order or concurrently and still
    /// converge on the first committed pair.
    pub async fn complete(&self, candidate_id: &str) -> Result<ExamSession> {
        self.store
            .set_ended_if_unset(candidate_id, Utc::now())
            .await?;

        let record = self.store.set_completion_if_unset(candidate_id).await?;

        if record.completion_seconds.is_none()
            && record.started_at.is_some()
            && record.ended_at.is_some()
        {
            return Err(Error::InvariantViolation(
                "completion unset despite a full timestamp pair".to_string(),
            ));
        }

        Ok(record)
    }

    pub async fn get_by_candidate(&self, candidate_id: &str) -> Result<ExamSession> {
        self.store
            .get_by_candidate(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No exam session for {}", candidate_id)))
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<(Vec<ExamSession>, i64)> {
        self.store.list(page, limit).await
    }

    /// Seconds left in the window, for the client countdown mirror. Derived
    /// from the stored start plus the configured duration; the server never
    /// runs a ticking clock.
    pub fn remaining_seconds(&self, session: &ExamSession) -> Option<i64> {
        session.started_at.map(|started| {
            let deadline = started + self.exam_duration;
            (deadline - Utc::now()).num_seconds().max(0)
        })
    }
}
