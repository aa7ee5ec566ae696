#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use foodgram::{
    AppState,
    config::{Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig, ServerConfig},
};
use foodgram_recipe::{
    MediaStore,
    ingredient::{self, IngredientInput},
    tag::{self, TagInput},
};
use foodgram_shared::State;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

pub async fn create_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap());
    let pool = foodgram::db::create_pool(&url, 5).await.unwrap();
    foodgram::db::migrate(&pool).await.unwrap();

    let media_root = dir.child("media").to_str().unwrap().to_owned();
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 1,
        },
        media: MediaConfig {
            root: media_root.to_owned(),
            url: "/media".to_string(),
        },
        observability: ObservabilityConfig::default(),
    };

    let state = State::new(pool.clone());
    let router = foodgram::router(AppState {
        user_command: foodgram_user::Command::new(state.clone()),
        recipe_command: foodgram_recipe::Command::new(state, MediaStore::new(media_root)),
        pool: pool.clone(),
        config,
    });

    TestApp { router, pool, dir }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Registers `username` and returns `(id, token)`.
    pub async fn signup(&self, username: &str) -> (i64, String) {
        let email = format!("{username}@foodgram.test");
        let response = self
            .post(
                "/api/users/",
                None,
                json!({
                    "email": email,
                    "username": username,
                    "first_name": username,
                    "last_name": "Cook",
                    "password": "my_secret_password",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        let id = response.json()["id"].as_i64().unwrap();

        let response = self
            .post(
                "/api/auth/token/login/",
                None,
                json!({ "email": email, "password": "my_secret_password" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        (id, response.json()["auth_token"].as_str().unwrap().to_owned())
    }

    pub async fn seed(&self) -> (i64, Vec<i64>) {
        let tag = tag::create(
            &self.pool,
            TagInput {
                name: "Lunch".to_owned(),
                color: "#E26C2D".to_owned(),
                slug: "lunch".to_owned(),
            },
        )
        .await
        .unwrap();

        ingredient::import(
            &self.pool,
            vec![
                IngredientInput {
                    name: "salt".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
                IngredientInput {
                    name: "flour".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
            ],
        )
        .await
        .unwrap();

        let ingredients = ingredient::list(&self.pool, None)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();

        (tag.id, ingredients)
    }

    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        tag: i64,
        ingredients: Vec<(i64, i64)>,
    ) -> Value {
        let response = self
            .post(
                "/api/recipes/",
                Some(token),
                json!({
                    "name": name,
                    "text": "Mix and bake.",
                    "cooking_time": 30,
                    "image": PIXEL,
                    "tags": [tag],
                    "ingredients": ingredients
                        .into_iter()
                        .map(|(id, amount)| json!({ "id": id, "amount": amount }))
                        .collect::<Vec<_>>(),
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.json()
    }
}
