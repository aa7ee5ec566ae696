use axum::{Json, extract::State, http::StatusCode};
use foodgram_user::LoginInput;
use serde::Serialize;

use super::AppState;
use crate::{
    auth::AuthUser,
    error::{ApiJson, AppResult},
};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> AppResult<Json<TokenResponse>> {
    let user_id = state.user_command.login(input).await?;
    let auth_token = foodgram_user::generate_token(
        user_id,
        &state.config.jwt.secret,
        state.config.jwt.lifetime_seconds(),
    )?;

    tracing::info!(user_id, "token issued");

    Ok(Json(TokenResponse { auth_token }))
}

/// Tokens are stateless, logging out only checks the caller is authenticated.
pub async fn logout(auth: AuthUser) -> StatusCode {
    tracing::info!(user_id = auth.id, "logged out");

    StatusCode::NO_CONTENT
}
