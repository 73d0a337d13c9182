use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use charter_core::identity::{Actor, Role};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StaffClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    pub exp: usize,
}

impl From<StaffClaims> for Actor {
    fn from(claims: StaffClaims) -> Self {
        Actor {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Authenticates the caller and attaches an [`Actor`].
///
/// Only identity is settled here (401 on a missing or bad token). Whether the
/// actor may perform a transition is decided by the lifecycle controller.
pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<StaffClaims>(
        bearer.token(),
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Rejected staff token: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(Actor::from(token_data.claims));
    Ok(next.run(req).await)
}

/// Signs a staff token; used by operator tooling and tests
pub fn issue_token(secret: &str, actor: &Actor, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = StaffClaims {
        sub: actor.id.clone(),
        email: actor.email.clone(),
        role: actor.role,
        exp: (Utc::now() + ttl).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}
