use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};
use foodgram_shared::Page;
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

mod auth;
mod health;
mod ingredients;
mod recipes;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: foodgram_user::Command,
    pub recipe_command: foodgram_recipe::Command,
    pub pool: SqlitePool,
}

/// Page envelope with links to the neighbouring pages.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

fn page_link(uri: &Uri, page: u64) -> String {
    let mut pairs = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
        .map(str::to_owned)
        .collect::<Vec<_>>();

    if page > 1 {
        pairs.push(format!("page={page}"));
    }

    if pairs.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{}", uri.path(), pairs.join("&"))
    }
}

impl<T> Paginated<T> {
    pub fn new(uri: &Uri, page: Page<T>) -> Self {
        Self {
            count: page.count,
            next: page.has_next().then(|| page_link(uri, page.page.saturating_add(1))),
            previous: page.has_previous().then(|| page_link(uri, page.page - 1)),
            results: page.results,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart/",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/recipes/{id}/",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/recipes/{id}/favorite/",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/recipes/{id}/shopping_cart/",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
        .route("/users/", get(users::list).post(users::register))
        .route("/users/me/", get(users::me))
        .route("/users/set_password/", post(users::set_password))
        .route("/users/subscriptions/", get(users::subscriptions))
        .route("/users/{id}/", get(users::detail))
        .route(
            "/users/{id}/subscribe/",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/auth/token/login/", post(auth::login))
        .route("/auth/token/logout/", post(auth::logout))
        .route("/tags/", get(tags::list))
        .route("/tags/{id}/", get(tags::detail))
        .route("/ingredients/", get(ingredients::list))
        .route("/ingredients/{id}/", get(ingredients::detail));

    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api", api);

    // Images are only served here when the media URL is local to this host.
    let media_url = app_state.config.media.url.trim_end_matches('/');
    if media_url.starts_with('/') && media_url.len() > 1 {
        router = router.nest_service(media_url, ServeDir::new(&app_state.config.media.root));
    }

    router.with_state(app_state)
}
