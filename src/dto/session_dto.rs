use crate::models::exam_session::{ExamSession, SessionState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: uuid::Uuid,
    pub state: SessionState,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub session_id: uuid::Uuid,
    pub state: SessionState,
    pub ended_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteSessionResponse {
    pub session_id: uuid::Uuid,
    pub state: SessionState,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Unset when no start was ever recorded for this candidate.
    pub completion_seconds: Option<i32>,
}

/// Read-only mirror for the client countdown. The client derives its timer
/// from `started_at` plus the configured duration; it is never the
/// authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub state: SessionState,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completion_seconds: Option<i32>,
    pub time_remaining_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<ExamSession>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
