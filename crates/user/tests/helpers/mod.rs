#![allow(dead_code)]

use foodgram_shared::State;
use foodgram_user::{Command, RegisterInput};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;
use temp_dir::TempDir;

pub struct TestState {
    pub state: State,
    pub command: Command,
    _dir: TempDir,
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
        command: Command::new(state.clone()),
        state,
        _dir: dir,
    })
}

pub fn register_input(username: &str) -> RegisterInput {
    RegisterInput {
        email: format!("{username}@foodgram.test"),
        username: username.to_owned(),
        first_name: username.to_owned(),
        last_name: "Tester".to_owned(),
        password: "my_secret_password".to_owned(),
    }
}

pub async fn create_users(state: &TestState, usernames: Vec<&str>) -> anyhow::Result<Vec<i64>> {
    let mut ids = vec![];
    for username in usernames {
        ids.push(state.command.register(register_input(username)).await?.id);
    }

    Ok(ids)
}

pub async fn create_recipe(pool: &SqlitePool, author_id: i64, name: &str) -> anyhow::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO recipe (author_id, name, image, text, cooking_time, pub_date) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(author_id)
    .bind(name)
    .bind(format!("recipes/{name}.png"))
    .bind("Mix and serve.")
    .bind(10)
    .bind(1_700_000_000 + author_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
