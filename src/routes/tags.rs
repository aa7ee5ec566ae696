use axum::{Json, extract::State};
use foodgram_recipe::tag::{self, Tag};
use foodgram_shared::Error;

use super::AppState;
use crate::error::{ApiPath, AppResult};

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(tag::list(&state.pool).await?))
}

pub async fn detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Tag>> {
    match tag::find(&state.pool, id).await? {
        Some(tag) => Ok(Json(tag)),
        None => Err(Error::NotFound(format!("Tag {id} not found.")).into()),
    }
}
