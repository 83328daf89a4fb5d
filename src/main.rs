use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use widget_shop::cards::StripeClient;
use widget_shop::config::AppConfig;
use widget_shop::state::AppState;
use widget_shop::store::{self, PgStore};

/// Server flags. Anything given here overrides environment configuration.
#[derive(Debug, Parser)]
#[command(name = "widget-shop", version, about = "Server-rendered widget storefront")]
struct Flags {
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Application environment {development|production}
    #[arg(long)]
    env: Option<String>,

    /// Postgres connection string
    #[arg(long)]
    dsn: Option<String>,

    /// URL of the client-facing payment API
    #[arg(long)]
    api: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let flags = Flags::parse();
    if let Some(env) = &flags.env {
        std::env::set_var("APP_ENV", env);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = AppConfig::from_env();
    if let Some(port) = flags.port {
        config.server.port = port;
    }
    if let Some(dsn) = flags.dsn {
        config.database.url = dsn;
    }
    if let Some(api) = flags.api {
        config.server.api_url = api;
    }

    let pool = store::connect(&config.database)
        .await
        .context("database setup failed")?;
    let store = Arc::new(PgStore::new(pool, &config.database));
    let payments =
        Arc::new(StripeClient::new(&config.stripe).context("payment client setup failed")?);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    info!(environment = ?config.environment, %bind_addr, "starting widget shop");

    let state = Arc::new(AppState::new(config, store, payments));
    let app = widget_shop::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
