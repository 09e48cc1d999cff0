mod config;

use std::sync::Arc;

use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use wishes_api::rate_limit::{self, RateLimiter};
use wishes_api::service::GuestbookService;
use wishes_api::state::{AppState, AppStateInner};
use wishes_gateway::dispatcher::Dispatcher;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wishes=debug,wishes_api=debug,wishes_gateway=debug,wishes_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = wishes_db::Database::open(&config.db_path)?;

    // Shared state
    let shutdown = CancellationToken::new();
    let dispatcher = Dispatcher::new();
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let app_state: AppState = Arc::new(AppStateInner {
        guestbook: GuestbookService::new(Arc::new(db), dispatcher.clone()),
        limiter: limiter.clone(),
    });

    // Background sweep of expired throttle windows
    let sweep = tokio::spawn(rate_limit::run_sweep_loop(
        limiter,
        config.sweep_interval,
        shutdown.clone(),
    ));

    let app = Router::new()
        .merge(wishes_api::router(app_state))
        .merge(wishes_gateway::router(dispatcher, shutdown.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!(
        "Wall of Wishes listening on {} ({} submissions per {:?} per source)",
        config.addr, config.rate_limit.limit, config.rate_limit.window
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    // Covers serve returning without a signal
    shutdown.cancel();
    if let Err(e) = sweep.await {
        warn!("rate limiter sweep task failed: {}", e);
    }

    info!("Wall of Wishes stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels `shutdown` so long-lived
/// gateway connections and the sweep loop wind down with the server.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    shutdown.cancel();
}
