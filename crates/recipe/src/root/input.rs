use foodgram_shared::{MAX_VALUE, MIN_VALUE, invalid};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use validator::{Validate, ValidationErrors};

use crate::image::{self, DecodedImage};

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientAmount {
    pub id: i64,
    pub amount: i64,
}

/// Payload of recipe creation and update. `name`, `text`, `cooking_time`
/// and `image` may be left out on update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeInput {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<i64>,
    pub image: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

pub(crate) struct ValidInput {
    pub image: Option<DecodedImage>,
}

fn in_bounds(value: i64) -> bool {
    (MIN_VALUE..=MAX_VALUE).contains(&value)
}

fn out_of_bounds_message(what: &str) -> String {
    format!("{what} must be between {MIN_VALUE} and {MAX_VALUE}.")
}

/// Returns the first id that appears twice.
fn first_duplicate(ids: impl IntoIterator<Item = i64>) -> Option<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

/// Ids from `ids` that have no row in `table`.
async fn missing_ids(pool: &SqlitePool, table: &str, ids: &[i64]) -> anyhow::Result<Vec<i64>> {
    let distinct = ids.iter().copied().collect::<HashSet<_>>();
    let sql = format!(
        "SELECT id FROM {table} WHERE id IN ({})",
        vec!["?"; distinct.len()].join(", ")
    );

    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    for id in distinct.iter() {
        query = query.bind(*id);
    }

    let found = query
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id,)| id)
        .collect::<HashSet<_>>();

    let mut missing = distinct.difference(&found).copied().collect::<Vec<_>>();
    missing.sort_unstable();

    Ok(missing)
}

impl RecipeInput {
    /// Runs every check against the payload and the reference tables before
    /// anything is written. Errors are collected per field.
    pub(crate) async fn check(
        &self,
        pool: &SqlitePool,
        creating: bool,
    ) -> foodgram_shared::Result<ValidInput> {
        let mut errors = match self.validate() {
            Ok(_) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if creating {
            if self.name.is_none() {
                errors.add("name", invalid("This field is required."));
            }

            if self.text.is_none() {
                errors.add("text", invalid("This field is required."));
            }

            if self.cooking_time.is_none() {
                errors.add("cooking_time", invalid("This field is required."));
            }
        }

        if self.cooking_time.is_some_and(|value| !in_bounds(value)) {
            errors.add(
                "cooking_time",
                invalid(out_of_bounds_message("Cooking time")),
            );
        }

        if self.ingredients.is_empty() {
            errors.add("ingredients", invalid("Add at least one ingredient."));
        } else if let Some(id) = first_duplicate(self.ingredients.iter().map(|i| i.id)) {
            errors.add(
                "ingredients",
                invalid(format!("Ingredient {id} is listed more than once.")),
            );
        } else {
            if self.ingredients.iter().any(|i| !in_bounds(i.amount)) {
                errors.add("ingredients", invalid(out_of_bounds_message("Amount")));
            }

            let ids = self.ingredients.iter().map(|i| i.id).collect::<Vec<_>>();
            for id in missing_ids(pool, "ingredient", &ids).await? {
                errors.add(
                    "ingredients",
                    invalid(format!("Ingredient {id} does not exist.")),
                );
            }
        }

        if self.tags.is_empty() {
            errors.add("tags", invalid("Add at least one tag."));
        } else if let Some(id) = first_duplicate(self.tags.iter().copied()) {
            errors.add(
                "tags",
                invalid(format!("Tag {id} is listed more than once.")),
            );
        } else {
            for id in missing_ids(pool, "tag", &self.tags).await? {
                errors.add("tags", invalid(format!("Tag {id} does not exist.")));
            }
        }

        let image = match self.image.as_deref().map(str::trim) {
            Some("") | None if creating => {
                errors.add("image", invalid("This field is required."));
                None
            }
            Some("") | None => None,
            Some(data_url) => match image::decode(data_url) {
                Ok(image) => Some(image),
                Err(err) => {
                    errors.add("image", err);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(ValidInput { image })
    }
}
