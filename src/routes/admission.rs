use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::dto::admission_dto::{AdmissionCheckRequest, AdmissionCheckResponse};
use crate::middleware::auth::decode_claims;
use crate::AppState;

/// Read-only token → center lookup, consumed by the admission gate UI.
#[axum::debug_handler]
pub async fn resolve_admission(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> crate::error::Result<Response> {
    let center = state.admission_service.resolve(&token)?;
    Ok(Json(center).into_response())
}

/// Server-side presence decision. Sits before login, so the bearer header
/// is optional; when one is presented the resolved identity lands in the
/// bypass audit log.
#[axum::debug_handler]
pub async fn check_admission(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Json(req): Json<AdmissionCheckRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;

    let identity = decode_claims(&headers, &state.config.jwt_secret)
        .ok()
        .map(|claims| claims.sub);
    let coordinates = match (req.latitude, req.longitude) {
        (Some(latitude), Some(longitude)) => Some((latitude, longitude)),
        _ => None,
    };

    let decision = state
        .admission_service
        .check(&token, coordinates, identity.as_deref())?;

    let message = if decision.authorized {
        None
    } else {
        Some(
            "You are not at an authorized exam location. Re-check your location or contact support."
                .to_string(),
        )
    };

    Ok(Json(AdmissionCheckResponse {
        authorized: decision.authorized,
        distance_meters: decision.distance_meters,
        center: decision.center_name,
        message,
    })
    .into_response())
}
