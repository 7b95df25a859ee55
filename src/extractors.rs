use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::convert::Infallible;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user id pulled from the `Authorization: Bearer` header.
/// Rejects with 401 when the header is missing or the token is invalid.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i32);

/// Like [`AuthUser`] but never rejects: endpoints that work for anonymous
/// callers use this and simply skip the user-specific parts.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<i32>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Authentication("Access token required".to_string()))?;

        let user_id = state.tokens.verify_access_token(token)?;

        Ok(AuthUser(user_id))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let user_id = bearer_token(parts)
            .and_then(|token| state.tokens.verify_access_token(token).ok());

        Ok(OptionalAuthUser(user_id))
    }
}
