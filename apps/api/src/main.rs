use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use listings_admin::config::Config;
use listings_admin::db::create_pool;
use listings_admin::identity::AuthAdminClient;
use listings_admin::routes::build_router;
use listings_admin::state::AppState;
use listings_admin::store::postgres::PgListingStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting listings admin API v{}", env!("CARGO_PKG_VERSION"));

    // Schema is managed by `listings-migrate`; the server never migrates.
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    let identities = AuthAdminClient::new(&config.auth_admin_url, config.service_role_key.clone())?;
    info!("Identity admin client initialized ({})", config.auth_admin_url);

    if config.reset_token.is_none() {
        info!("RESET_TOKEN not set; account reset endpoint is disabled");
    }

    let cors = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.site_url).context("SITE_URL is not a valid origin")?,
        )
        .allow_methods([Method::GET, Method::POST]);

    let state = AppState {
        store: Arc::new(PgListingStore::new(db)),
        identities: Arc::new(identities),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
