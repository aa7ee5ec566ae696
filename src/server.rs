use anyhow::Result;
use foodgram_recipe::MediaStore;
use foodgram_shared::State;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{AppState, config::Config, db};

/// Builds pools, commands and the router, then serves until Ctrl-C.
pub async fn serve(config: Config, host: String, port: u16) -> Result<()> {
    let write_db = db::create_write_pool(&config.database.url).await?;
    db::migrate(&write_db).await?;
    let read_db = db::create_read_pool(&config.database.url, config.database.max_connections).await?;

    tokio::fs::create_dir_all(&config.media.root).await?;

    let state = State {
        read_db: read_db.clone(),
        write_db,
    };

    let app_state = AppState {
        user_command: foodgram_user::Command::new(state.clone()),
        recipe_command: foodgram_recipe::Command::new(
            state,
            MediaStore::new(&config.media.root),
        ),
        pool: read_db,
        config,
    };

    let app = crate::routes::router(app_state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}
