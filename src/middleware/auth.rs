use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

/// Output of the external identity resolver: a stable candidate identifier
/// (`sub`) plus optional display claims denormalized into the session
/// record. This service consumes the claims, it never issues them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> std::result::Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let value = header.to_str().map_err(|_| "bad_authorization")?;
    value.strip_prefix("Bearer ").ok_or("unsupported_scheme")
}

pub fn decode_claims(headers: &HeaderMap, secret: &str) -> std::result::Result<Claims, &'static str> {
    let token = bearer_token(headers)?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| "invalid_token")
}

fn reject(code: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

/// Resolves the candidate identity before any store access; handlers read
/// the claims from request extensions.
pub async fn require_candidate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match decode_claims(req.headers(), &state.config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(code) => reject(code),
    }
}

/// Dashboard reads are restricted to hr/admin bearers.
pub async fn require_reviewer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match decode_claims(req.headers(), &state.config.jwt_secret) {
        Ok(claims) => {
            let role = claims.role.clone().unwrap_or_default();
            let allowed = ["admin", "hr"];
            if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
                return (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" })))
                    .into_response();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(code) => reject(code),
    }
}
