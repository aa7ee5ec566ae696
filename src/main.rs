use anyhow::Result;
use clap::{Parser, Subcommand};
use foodgram::config::Config;
use foodgram_recipe::{ingredient, tag};
use sqlx::migrate::MigrateDatabase;

/// foodgram - recipe sharing backend
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipes, favorites, subscriptions and shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Import ingredients from a JSON file of {name, measurement_unit}
    LoadIngredients {
        #[arg(long, default_value = "data/ingredients.json")]
        path: String,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Create a tag
    Create {
        #[arg(long)]
        name: String,
        /// Hex color such as #E26C2D
        #[arg(long)]
        color: String,
        #[arg(long)]
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    foodgram::observability::init_observability(
        "foodgram",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::LoadIngredients { path } => load_ingredients_command(config, path).await,
        Commands::Tag {
            command: TagCommands::Create { name, color, slug },
        } => create_tag_command(config, name, color, slug).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting foodgram server...");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    foodgram::server::serve(config, host, port).await
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;
    foodgram::db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn load_ingredients_command(config: Config, path: String) -> Result<()> {
    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;
    foodgram::db::migrate(&pool).await?;

    let created = ingredient::import_file(&pool, &path).await?;
    pool.close().await;

    tracing::info!(created, path = %path, "ingredients loaded");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn create_tag_command(config: Config, name: String, color: String, slug: String) -> Result<()> {
    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;
    foodgram::db::migrate(&pool).await?;

    let tag = tag::create(&pool, tag::TagInput { name, color, slug }).await?;
    pool.close().await;

    tracing::info!(tag_id = tag.id, slug = %tag.slug, "tag created");

    Ok(())
}
