// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use blog_rust_server::{
    api::router,
    auth::{KeyError, TokenCodec},
    config::{AppConfig, ConfigError, LogFormat, DEFAULT_LOG_FILTER},
    error::ApiError,
    service::AccountService,
    state::AppState,
    storage::{BlogDatabase, StorageError},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("JWT secret: {0}")]
    Key(#[from] KeyError),

    #[error("database: {0}")]
    Storage(#[from] StorageError),

    #[error("seeding administrator: {0}")]
    Seed(#[from] ApiError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    tracing::info!(config = ?config, "Configuration loaded");

    let tokens = TokenCodec::from_base64_secret(&config.jwt_secret, config.jwt_expiration_ms)?;
    tracing::info!(
        algorithm = ?tokens.algorithm(),
        lifetime_ms = tokens.lifetime_ms(),
        "Token codec ready"
    );

    let db = Arc::new(BlogDatabase::open(&config.database_path())?);

    if let Some(admin) = &config.seed_admin {
        AccountService::new(&db, &tokens).seed_admin(admin)?;
    }

    let app = router(AppState::new(db, tokens));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Blog server listening on http://{}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
