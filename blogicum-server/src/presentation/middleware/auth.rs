use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::presentation::AppState;
use crate::presentation::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Viewer identity on public routes: absent header means anonymous, a
/// present but invalid token is still rejected.
#[derive(Debug, Clone)]
pub(crate) struct MaybeAuthenticatedUser(pub(crate) Option<AuthenticatedUser>);

impl MaybeAuthenticatedUser {
    pub(crate) fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(Self(None));
        };

        let token = bearer_token(auth_header)?;
        let claims = state
            .jwt
            .verify_token(token)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Self(Some(AuthenticatedUser {
            user_id: claims.user_id,
        })))
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = bearer_token(auth_header)?;
    let claims = state
        .jwt
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
    });

    Ok(next.run(request).await)
}

fn bearer_token(auth_header: &str) -> Result<&str, AppError> {
    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next().ok_or(AppError::Unauthorized)?;
    let token = parts.next().ok_or(AppError::Unauthorized)?;
    if parts.next().is_some() {
        return Err(AppError::Unauthorized);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token)
}
