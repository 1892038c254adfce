use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One durable record per candidate. The UNIQUE `candidate_id` column is
/// what yields the single-attempt guarantee; the three nullable integrity
/// fields only ever move forward (stale re-arm excepted).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamSession {
    pub id: Uuid,
    pub candidate_id: String,
    pub candidate_name: Option<String>,
    pub candidate_phone: Option<String>,
    pub candidate_photo_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completion_seconds: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lifecycle position, derived from which timestamps are set. Never stored:
/// the timestamps are the single source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Ended,
    Completed,
}

impl ExamSession {
    pub fn state(&self) -> SessionState {
        if self.completion_seconds.is_some() {
            SessionState::Completed
        } else if self.ended_at.is_some() {
            SessionState::Ended
        } else if self.started_at.is_some() {
            SessionState::InProgress
        } else {
            SessionState::NotStarted
        }
    }
}
