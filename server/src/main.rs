use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use recipes_backend::app_config::AppConfig;
use recipes_backend::recipe_service;
use recipes_backend::recipe_store::{self, RecipeStore};
use thiserror::Error as ThisError;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[derive(Debug, Parser)]
#[clap(about = "Serves recipes for the recipe list viewer")]
struct Args {
    /// Path to the TOML config file
    #[clap(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[derive(Debug, ThisError)]
enum Error {
    #[error("recipes server failed to load config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("recipes server failed to load recipes: {0}")]
    Store(#[from] recipe_store::Error),
    #[error("recipes server could not resolve its bind address: {0}")]
    Resolve(#[from] std::io::Error),
    #[error("recipes server failed: {0}")]
    Server(#[from] hyper::Error),
}
type Result<T> = std::result::Result<T, Error>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let conf = AppConfig::load(&args.config)?;
    let store = Arc::new(RecipeStore::load(Path::new(&conf.data_config.recipes_path)).await?);

    let addr = conf.http_config.socket_addr().await?;
    info!(
        "Serving recipes on {} ({addr})",
        conf.http_config.connection_string()
    );
    axum::Server::bind(&addr)
        .serve(recipe_service::app(store).into_make_service())
        .await?;
    Ok(())
}
