use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use upfluence_types::api::SessionClaims;
use upfluence_types::models::Role;

use crate::error::{ApiError, ApiResult};
use crate::session::{SESSION_COOKIE, SessionKeys};
use crate::state::AppState;

/// Bearer header first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(auth.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// The verified session for a request, if any.
pub fn session_from_headers(keys: &SessionKeys, headers: &HeaderMap) -> Option<SessionClaims> {
    session_token(headers).and_then(|token| keys.verify(&token))
}

/// Rejects requests without a valid session and exposes the claims to
/// handlers as an `Extension<SessionClaims>`.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = session_from_headers(&state.sessions, req.headers()).ok_or(ApiError::Unauthenticated)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn require_role(claims: &SessionClaims, allowed: &[Role]) -> ApiResult<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
