//! Server entry point: configuration, store lifecycle, and serving.

use axum_extra::extract::cookie::Key;
use sqlx::postgres::PgPoolOptions;
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wicket_server::auth::{AppState, GoogleProvider, PgUserStore, SessionManager};
use wicket_server::config::ServerConfig;
use wicket_server::routes;

/// Unrecoverable startup failures.
#[derive(Debug)]
enum StartupError {
    /// Required configuration missing or invalid.
    Configuration { details: String },
    /// The signing secret is too short to derive a key from.
    WeakSigningSecret,
    /// Could not connect to or migrate the database.
    Database { details: String },
    /// Provider client construction failed.
    Provider { details: String },
    /// Could not bind the listen address.
    Bind { details: String },
    /// The server loop failed.
    Serve { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { details } => write!(f, "configuration error: {details}"),
            Self::WeakSigningSecret => {
                write!(f, "SESSION__SIGNING_SECRET must be at least 32 bytes")
            }
            Self::Database { details } => write!(f, "database error: {details}"),
            Self::Provider { details } => write!(f, "provider setup error: {details}"),
            Self::Bind { details } => write!(f, "failed to bind listen address: {details}"),
            Self::Serve { details } => write!(f, "server error: {details}"),
        }
    }
}

impl std::error::Error for StartupError {}

#[tokio::main]
async fn main() -> wicket_core::Result<(), StartupError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().map_err(|e| StartupError::Configuration {
        details: e.to_string(),
    })?;
    tracing::info!("Loaded configuration");

    // Key::derive_from panics below this length
    if config.session.signing_secret.len() < 32 {
        return Err(StartupError::WeakSigningSecret.into());
    }
    let cookie_key = Key::derive_from(config.session.signing_secret.as_bytes());

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| StartupError::Database {
            details: e.to_string(),
        })?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| StartupError::Database {
            details: e.to_string(),
        })?;

    let provider = GoogleProvider::new(&config.provider).map_err(|e| StartupError::Provider {
        details: e.to_string(),
    })?;

    let state = AppState::new(
        Arc::new(PgUserStore::new(db_pool.clone())),
        Arc::new(provider),
        SessionManager::new(&config.session),
        cookie_key,
        config.post_login_url.clone(),
    );

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .map_err(|e| StartupError::Bind {
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Serve {
            details: e.to_string(),
        })?;

    // Drained; release the store connections before exiting
    db_pool.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install Ctrl+C handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        _ = terminate => {},
    }
}
