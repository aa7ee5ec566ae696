use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use foodgram_recipe::{
    RecipeInput, RecipeView, RecipesQuery, collection, shopping_list, tag,
};
use foodgram_shared::{Error, Pagination, recipe::Summary};
use serde::Deserialize;

use super::{AppState, Paginated};
use crate::{
    auth::AuthUser,
    error::{ApiJson, ApiPath, ApiQuery, AppResult},
};

#[derive(Debug, Default, Deserialize)]
pub struct RecipesParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn is_set(flag: &Option<String>) -> bool {
    matches!(flag.as_deref(), Some("1" | "true" | "True"))
}

impl RecipesParams {
    fn into_query(self, viewer: Option<i64>) -> RecipesQuery {
        let default = Pagination::default();

        RecipesQuery {
            viewer,
            author: self.author,
            is_favorited: is_set(&self.is_favorited),
            is_in_shopping_cart: is_set(&self.is_in_shopping_cart),
            tags: self.tags,
            pagination: Pagination::new(
                self.page.unwrap_or(default.page),
                self.limit.unwrap_or(default.limit),
            ),
        }
    }
}

fn with_media_url(state: &AppState, mut view: RecipeView) -> RecipeView {
    view.image = state.config.media.url_for(&view.image);
    view
}

pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    auth: Option<AuthUser>,
    ApiQuery(params): ApiQuery<RecipesParams>,
) -> AppResult<Json<Paginated<RecipeView>>> {
    let unknown = tag::unknown_slugs(&state.pool, &params.tags).await?;
    if !unknown.is_empty() {
        return Err(Error::field(
            "tags",
            format!(
                "Select a valid choice. {} is not one of the available choices.",
                unknown.join(", ")
            ),
        )
        .into());
    }

    let query = params.into_query(auth.map(|a| a.id));
    let page = foodgram_recipe::list(&state.pool, query)
        .await?
        .map(|view| with_media_url(&state, view));

    Ok(Json(Paginated::new(&uri, page)))
}

pub async fn detail(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<RecipeView>> {
    match foodgram_recipe::find(&state.pool, id, auth.map(|a| a.id)).await? {
        Some(view) => Ok(Json(with_media_url(&state, view))),
        None => Err(Error::NotFound(format!("Recipe {id} not found.")).into()),
    }
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<RecipeInput>,
) -> AppResult<(StatusCode, Json<RecipeView>)> {
    let view = state.recipe_command.create(auth.id, input).await?;

    Ok((StatusCode::CREATED, Json(with_media_url(&state, view))))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<RecipeInput>,
) -> AppResult<Json<RecipeView>> {
    let view = state.recipe_command.update(auth.id, id, input).await?;

    Ok(Json(with_media_url(&state, view)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.recipe_command.delete(auth.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn add_to(
    state: &AppState,
    collection: &collection::Command,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<(StatusCode, Json<Summary>)> {
    let mut summary = collection.add(user_id, recipe_id).await?;
    summary.image = state.config.media.url_for(&summary.image);

    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<Summary>)> {
    add_to(&state, &state.recipe_command.favorite, auth.id, id).await
}

pub async fn unfavorite(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.recipe_command.favorite.remove(auth.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<Summary>)> {
    add_to(&state, &state.recipe_command.shopping_cart, auth.id, id).await
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state
        .recipe_command
        .shopping_cart
        .remove(auth.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let content = shopping_list::render(&state.pool, auth.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=wishlist.txt",
            ),
        ],
        content,
    ))
}
