pub(crate) mod auth;
pub(crate) mod controllers;
pub(crate) mod core;
pub(crate) mod routes;
pub(crate) mod types;

use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::auth::password::PasswordHasher;
use crate::auth::token::SigningSecret;
use crate::core::error::ConfigError as Error;
use crate::core::state::AppState;
use crate::core::store::PgStore;

pub async fn run() -> Result<(), Error> {
    let config = crate::core::config::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(?config, "loaded configuration");

    let secret = SigningSecret::new(config.secret.as_bytes())?;

    let store = PgStore::connect(
        &config.database_url(),
        config.max_connections,
        config.store_timeout(),
    )
    .await?;

    sqlx::migrate!().run(store.pool()).await?;

    let state = AppState::new(
        Arc::new(store),
        &secret,
        PasswordHasher::default(),
        config.store_timeout(),
    )?;

    let app = routes::router::routes(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!("listening on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
