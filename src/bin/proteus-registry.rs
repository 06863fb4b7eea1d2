//! Proteus probe registry server binary.
//!
//! Loads configuration, opens the configured client store, wires the registry
//! services and serves the HTTP API with graceful shutdown.

use anyhow::Result;
use proteus_registry::{
    config::{BuildInfo, Config},
    http::{AppState, build_router},
    registry::{
        Argon2CredentialHasher, Authenticator, CredentialHasher, JwtTokenSigner, Registrar,
        TokenSigner, UpdateAuthorizer,
    },
    storage::{create_client_storage, parse_storage_backend},
};
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "proteus_registry=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();

    let version = proteus_registry::config::version()?;

    env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    tracing::info!(?version, "Starting proteus registry");

    let config = Config::new()?;

    // Parse storage backend configuration
    let storage_backend =
        parse_storage_backend(&config.storage_backend, config.database_url.as_deref())?;
    tracing::info!(backend = %config.storage_backend, "Opening client storage");
    let storage = create_client_storage(storage_backend).await?;

    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher::new());
    let signer: Arc<dyn TokenSigner> =
        Arc::new(JwtTokenSigner::new(config.signing_secret.as_ref()));

    let app_context = AppState {
        build_info: Arc::new(BuildInfo::current()?),
        registrar: Arc::new(Registrar::new(storage.clone(), hasher.clone())),
        authenticator: Arc::new(Authenticator::new(
            storage.clone(),
            hasher,
            signer.clone(),
            *config.token_lifetime.as_ref(),
        )),
        update_authorizer: Arc::new(UpdateAuthorizer::new(storage, signer)),
    };

    // Build the router
    let app = build_router(app_context);

    // Setup graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    {
        let tracker = tracker.clone();
        let inner_token = token.clone();

        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(err) => {
                    tracing::error!("failed to install signal handler: {}", err);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::spawn(async move {
            tokio::select! {
                () = inner_token.cancelled() => { },
                _ = terminate => {},
                _ = ctrl_c => {},
            }

            tracker.close();
            inner_token.cancel();
        });
    }

    // Start HTTP server
    {
        let http_port = *config.http_port.as_ref();
        let bind_address = format!("0.0.0.0:{http_port}");
        let listener = TcpListener::bind(&bind_address).await?;
        tracing::info!("Starting server on {bind_address}");

        let inner_token = token.clone();
        tracker.spawn(async move {
            let shutdown_token = inner_token.clone();
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_token.cancelled().await;
                    tracing::info!("axum graceful shutdown complete");
                })
                .await;
            if let Err(err) = result {
                tracing::error!("axum task failed: {}", err);
            }

            inner_token.cancel();
        });
    }

    tracker.wait().await;

    Ok(())
}
