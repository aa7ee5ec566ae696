use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use foodgram_shared::Error;

use crate::{AppState, error::AppError};

/// Caller authenticated with `Authorization: Token <jwt>` (or `Bearer`).
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

async fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let id = foodgram_user::validate_token(token, &state.config.jwt.secret).map_err(|err| {
        tracing::debug!(error = %err, "rejected auth token");
        Error::Unauthorized
    })?;

    if !foodgram_user::exists(&state.user_command.read_db, id).await? {
        return Err(Error::Unauthorized.into());
    }

    Ok(AuthUser { id })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Err(Error::Unauthorized.into());
        };

        authenticate(token, state).await
    }
}

/// Anonymous when the header is absent, a bad token is still rejected.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };

        Ok(Some(authenticate(token, state).await?))
    }
}
