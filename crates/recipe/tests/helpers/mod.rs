#![allow(dead_code)]

use foodgram_recipe::{
    Command, IngredientAmount, MediaStore, RecipeInput,
    ingredient::{self, IngredientInput},
    tag::{self, TagInput},
};
use foodgram_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;
use temp_dir::TempDir;

pub const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct TestState {
    pub state: State,
    pub command: Command,
    pub users: foodgram_user::Command,
    pub dir: TempDir,
}

impl TestState {
    pub fn pool(&self) -> &SqlitePool {
        &self.state.read_db
    }
}

pub async fn setup_test_state() -> anyhow::Result<TestState> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let state = State::new(pool);

    Ok(TestState {
        command: Command::new(state.clone(), MediaStore::new(dir.child("media"))),
        users: foodgram_user::Command::new(state.clone()),
        state,
        dir,
    })
}

pub async fn create_user(state: &TestState, username: &str) -> anyhow::Result<i64> {
    let user = state
        .users
        .register(foodgram_user::RegisterInput {
            email: format!("{username}@foodgram.test"),
            username: username.to_owned(),
            first_name: username.to_owned(),
            last_name: "Cook".to_owned(),
            password: "my_secret_password".to_owned(),
        })
        .await?;

    Ok(user.id)
}

pub async fn create_tag(state: &TestState, slug: &str) -> anyhow::Result<i64> {
    let tag = tag::create(
        state.pool(),
        TagInput {
            name: slug.to_uppercase(),
            color: "#E26C2D".to_owned(),
            slug: slug.to_owned(),
        },
    )
    .await?;

    Ok(tag.id)
}

/// Imports `(name, unit)` pairs and returns their ids in the same order.
pub async fn create_ingredients(
    state: &TestState,
    items: &[(&str, &str)],
) -> anyhow::Result<Vec<i64>> {
    ingredient::import(
        state.pool(),
        items
            .iter()
            .map(|(name, unit)| IngredientInput {
                name: name.to_string(),
                measurement_unit: unit.to_string(),
            })
            .collect(),
    )
    .await?;

    let all = ingredient::list(state.pool(), None).await?;
    let mut ids = vec![];
    for (name, unit) in items {
        let Some(found) = all
            .iter()
            .find(|i| i.name == *name && i.measurement_unit == *unit)
        else {
            anyhow::bail!("ingredient {name} not imported");
        };
        ids.push(found.id);
    }

    Ok(ids)
}

pub fn recipe_input(name: &str, ingredients: Vec<(i64, i64)>, tags: Vec<i64>) -> RecipeInput {
    RecipeInput {
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
        tags,
        image: Some(PIXEL.to_owned()),
        name: Some(name.to_owned()),
        text: Some("Mix everything and serve.".to_owned()),
        cooking_time: Some(15),
    }
}

pub fn field_errors(err: &foodgram_shared::Error) -> Vec<String> {
    match err {
        foodgram_shared::Error::Validate(errors) => {
            let mut fields = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect::<Vec<_>>();
            fields.sort();
            fields
        }
        _ => vec![],
    }
}
