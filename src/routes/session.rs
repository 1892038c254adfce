use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};

use crate::database::session_store::CandidateProfile;
use crate::dto::session_dto::{
    CompleteSessionResponse, EndSessionResponse, SessionStatusResponse, StartSessionResponse,
};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

fn candidate_from_claims(claims: &Claims) -> CandidateProfile {
    CandidateProfile {
        id: claims.sub.clone(),
        name: claims.name.clone(),
        phone: claims.phone.clone(),
        photo_url: claims.photo_url.clone(),
    }
}

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    tracing::info!(candidate = %claims.sub, "start session requested");
    let candidate = candidate_from_claims(&claims);
    let session = state.session_service.start(&candidate).await?;

    let started_at = session.started_at.ok_or_else(|| {
        Error::InvariantViolation("armed session has no start timestamp".to_string())
    })?;

    Ok(Json(StartSessionResponse {
        session_id: session.id,
        state: session.state(),
        started_at,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn end_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    tracing::info!(candidate = %claims.sub, "end session requested");
    let session = state.session_service.end(&claims.sub).await?;

    let ended_at = session.ended_at.ok_or_else(|| {
        Error::InvariantViolation("ended session has no end timestamp".to_string())
    })?;

    Ok(Json(EndSessionResponse {
        session_id: session.id,
        state: session.state(),
        ended_at,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn complete_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    tracing::info!(candidate = %claims.sub, "complete session requested");
    let session = state.session_service.complete(&claims.sub).await?;

    Ok(Json(CompleteSessionResponse {
        session_id: session.id,
        state: session.state(),
        started_at: session.started_at,
        ended_at: session.ended_at,
        completion_seconds: session.completion_seconds,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn get_session_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let session = state.session_service.get_by_candidate(&claims.sub).await?;
    let time_remaining = state.session_service.remaining_seconds(&session);

    Ok(Json(SessionStatusResponse {
        state: session.state(),
        started_at: session.started_at,
        ended_at: session.ended_at,
        completion_seconds: session.completion_seconds,
        time_remaining_seconds: time_remaining,
    })
    .into_response())
}
