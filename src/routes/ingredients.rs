use axum::{Json, extract::State};
use foodgram_recipe::ingredient::{self, Ingredient};
use foodgram_shared::Error;
use serde::Deserialize;

use super::AppState;
use crate::error::{ApiPath, ApiQuery, AppResult};

#[derive(Debug, Deserialize)]
pub struct IngredientsParams {
    pub name: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<IngredientsParams>,
) -> AppResult<Json<Vec<Ingredient>>> {
    Ok(Json(
        ingredient::list(&state.pool, params.name.as_deref()).await?,
    ))
}

pub async fn detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Ingredient>> {
    match ingredient::find(&state.pool, id).await? {
        Some(ingredient) => Ok(Json(ingredient)),
        None => Err(Error::NotFound(format!("Ingredient {id} not found.")).into()),
    }
}
