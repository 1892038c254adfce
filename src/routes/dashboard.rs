use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::session_dto::{ListSessionsQuery, ListSessionsResponse};
use crate::AppState;

/// Full session record for one candidate, read by HR dashboards. The
/// scoring collaborator reads `completion_seconds` from here to finalize an
/// attempt.
#[axum::debug_handler]
pub async fn get_session_by_identity(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> crate::error::Result<Response> {
    let session = state.session_service.get_by_candidate(&identity).await?;
    Ok(Json(session).into_response())
}

#[axum::debug_handler]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> crate::error::Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (sessions, total) = state.session_service.list(page, limit).await?;

    Ok(Json(ListSessionsResponse {
        sessions,
        total,
        page,
        limit,
    })
    .into_response())
}
