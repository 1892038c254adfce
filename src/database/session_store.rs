use crate::error::Result;
use crate::models::exam_session::ExamSession;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Resolved identity plus the denormalized display claims persisted for
/// reporting. The display fields are not part of the integrity contract.
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

/// Storage boundary for `exam_sessions`. Every mutation is a single
/// conditional statement executed inside Postgres, so concurrent callers
/// converge on the first committed write without any in-process locking.
/// Used only by the session lifecycle service.
#[derive(Clone)]
pub struct SessionStore {
    pool: PgPool,
}

impl SessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Compare-and-swap arming of `started_at`: wins iff the record does not
    /// exist, has no `started_at`, or is stale (`started_at` before
    /// `stale_before` with no completion recorded). Returns the row when
    /// this call armed it, `None` when an existing live start was kept.
    ///
    /// The stale branch also clears a dangling `ended_at`, keeping
    /// `ended_at >= started_at` true across a re-arm. A bare end-only row
    /// (no `started_at`) keeps its `ended_at`.
    pub async fn arm_if_absent_or_stale(
        &self,
        candidate: &CandidateProfile,
        armed_at: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<Option<ExamSession>> {
        let row = sqlx::query_as::<_, ExamSession>(
            r#"
            INSERT INTO exam_sessions (candidate_id, candidate_name, candidate_phone, candidate_photo_url, started_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (candidate_id) DO UPDATE
            SET started_at = EXCLUDED.started_at,
                ended_at = CASE
                    WHEN exam_sessions.started_at IS NULL THEN exam_sessions.ended_at
                    ELSE NULL
                END,
                candidate_name = COALESCE(EXCLUDED.candidate_name, exam_sessions.candidate_name),
                candidate_phone = COALESCE(EXCLUDED.candidate_phone, exam_sessions.candidate_phone),
                candidate_photo_url = COALESCE(EXCLUDED.candidate_photo_url, exam_sessions.candidate_photo_url),
                updated_at = NOW()
            WHERE exam_sessions.started_at IS NULL
               OR (exam_sessions.completion_seconds IS NULL AND exam_sessions.started_at < $6)
            RETURNING *
            "#,
        )
        .bind(&candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.phone)
        .bind(&candidate.photo_url)
        .bind(armed_at)
        .bind(stale_before)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// First `ended_at` write wins; later calls are no-ops returning the
    /// stored value. Creates a bare row when `end` arrives before `start`.
    pub async fn set_ended_if_unset(
        &self,
        candidate_id: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<ExamSession> {
        let row = sqlx::query_as::<_, ExamSession>(
            r#"
            INSERT INTO exam_sessions (candidate_id, ended_at)
            VALUES ($1, $2)
            ON CONFLICT (candidate_id) DO UPDATE
            SET ended_at = COALESCE(exam_sessions.ended_at, EXCLUDED.ended_at),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .bind(ended_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Sets `completion_seconds` once, computed inside the statement from
    /// the stored timestamp pair, floor-clamped at zero. When `started_at`
    /// was never recorded the completion stays unset.
    pub async fn set_completion_if_unset(&self, candidate_id: &str) -> Result<ExamSession> {
        let row = sqlx::query_as::<_, ExamSession>(
            r#"
            UPDATE exam_sessions
            SET completion_seconds = COALESCE(
                    completion_seconds,
                    CASE
                        WHEN started_at IS NOT NULL AND ended_at IS NOT NULL
                        THEN GREATEST(0, FLOOR(EXTRACT(EPOCH FROM (ended_at - started_at)))::int)
                        ELSE NULL
                    END
                ),
                updated_at = NOW()
            WHERE candidate_id = $1
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_by_candidate(&self, candidate_id: &str) -> Result<Option<ExamSession>> {
        let row = sqlx::query_as::<_, ExamSession>(
            r#"SELECT * FROM exam_sessions WHERE candidate_id = $1"#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<(Vec<ExamSession>, i64)> {
        let offset = (page - 1) * limit;
        let rows = sqlx::query_as::<_, ExamSession>(
            r#"
            SELECT * FROM exam_sessions
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM exam_sessions"#)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }
}
