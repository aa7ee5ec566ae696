use axum::{
    Json,
    extract::{OriginalUri, State},
    http::StatusCode,
};
use foodgram_shared::{Error, Pagination};
use foodgram_user::{
    RegisterInput, SetPasswordInput, UserView,
    subscription::{self, SubscriptionView},
};
use serde::Deserialize;

use super::{AppState, Paginated};
use crate::{
    auth::AuthUser,
    error::{ApiJson, ApiPath, ApiQuery, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}

impl SubscriptionParams {
    fn pagination(&self) -> Pagination {
        let default = Pagination::default();

        Pagination::new(
            self.page.unwrap_or(default.page),
            self.limit.unwrap_or(default.limit),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipesLimitParams {
    pub recipes_limit: Option<u64>,
}

fn with_media_urls(state: &AppState, mut view: SubscriptionView) -> SubscriptionView {
    for recipe in view.recipes.iter_mut() {
        recipe.image = state.config.media.url_for(&recipe.image);
    }

    view
}

pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    auth: Option<AuthUser>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<Paginated<UserView>>> {
    let page = foodgram_user::list(&state.pool, pagination, auth.map(|a| a.id)).await?;

    Ok(Json(Paginated::new(&uri, page)))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let user = state.user_command.register(input).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn detail(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<UserView>> {
    match foodgram_user::find(&state.pool, id, auth.map(|a| a.id)).await? {
        Some(user) => Ok(Json(user)),
        None => Err(Error::NotFound(format!("User {id} not found.")).into()),
    }
}

pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserView>> {
    match foodgram_user::find(&state.pool, auth.id, Some(auth.id)).await? {
        Some(user) => Ok(Json(user)),
        None => Err(Error::Unauthorized.into()),
    }
}

pub async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<SetPasswordInput>,
) -> AppResult<StatusCode> {
    state.user_command.set_password(auth.id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn subscriptions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<SubscriptionParams>,
) -> AppResult<Json<Paginated<SubscriptionView>>> {
    let page = subscription::list(
        &state.pool,
        auth.id,
        params.pagination(),
        params.recipes_limit,
    )
    .await?
    .map(|view| with_media_urls(&state, view));

    Ok(Json(Paginated::new(&uri, page)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<RecipesLimitParams>,
) -> AppResult<(StatusCode, Json<SubscriptionView>)> {
    let view = state
        .user_command
        .subscription
        .subscribe(auth.id, id, params.recipes_limit)
        .await?;

    Ok((StatusCode::CREATED, Json(with_media_urls(&state, view))))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.user_command.subscription.unsubscribe(auth.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
