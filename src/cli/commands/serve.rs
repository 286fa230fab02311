use anyhow::Context;
use clap::Args;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::auth::{Authorizer, RemoteJwks};
use crate::config::{self, AppConfig};
use crate::database::{schema, CatalogStore, DatabaseManager, MemoryCatalogStore, PgCatalogStore};
use crate::identity::{Auth0Provisioner, OAuthClient};
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Use a seeded in-memory store instead of PostgreSQL")]
    pub memory: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config::config();
    info!("Starting Snack Catalog API in {:?} mode", config.environment);
    if config.auth.domain.is_empty() {
        warn!("AUTH0_DOMAIN is not set; guarded routes will reject every token");
    }

    let store = build_store(config, args.memory).await?;
    let state = build_state(config, store)?;

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, crate::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn build_store(config: &AppConfig, memory: bool) -> anyhow::Result<Arc<dyn CatalogStore>> {
    if memory {
        let store = MemoryCatalogStore::new();
        schema::seed_categories(&store).await?;
        info!("Using in-memory store");
        return Ok(Arc::new(store));
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    schema::create_all(&pool).await.context("failed to create tables")?;
    Ok(Arc::new(PgCatalogStore::new(pool)))
}

fn build_state(config: &AppConfig, store: Arc<dyn CatalogStore>) -> anyhow::Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;

    let keys = RemoteJwks::new(config.auth.jwks_url(), http.clone());
    let authorizer = Authorizer::new(
        config.auth.issuer(),
        config.auth.audience.clone(),
        Arc::new(keys),
    );
    let provisioner = Auth0Provisioner::new(&config.auth, http.clone());
    let oauth = OAuthClient::new(config.auth.clone(), http);

    Ok(AppState::new(
        store,
        Arc::new(authorizer),
        Arc::new(provisioner),
        Arc::new(oauth),
        config.api.clone(),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
