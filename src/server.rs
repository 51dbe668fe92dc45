mod handlers;
mod responses;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    api::Entsoe,
    core::{FeedSource, ForecastBuilder, ForecastCache},
    prelude::*,
};

/// Upstream forecasts may take a while to page through.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct AppState<S> {
    pub builder: ForecastBuilder<S>,
    pub cache: ForecastCache,

    /// [`None`] when the security token is not configured.
    pub entsoe: Option<Entsoe>,
}

pub fn router<S: FeedSource + Send + Sync + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::get_health))
        .route("/api/forecast", get(handlers::get_forecast::<S>))
        .route("/api/optimize-forecast", post(handlers::optimize_forecast::<S>))
        .route("/api/realtime-production", get(handlers::get_realtime_production::<S>))
        .with_state(state)
        .layer((
            TraceLayer::new_for_http(),
            TimeoutLayer::new(REQUEST_TIMEOUT),
            CorsLayer::permissive(),
        ))
}

/// Warm up the cache in the background, so that the first request does not wait for Elia.
pub fn prefetch<S: FeedSource + Send + Sync + 'static>(state: Arc<AppState<S>>) {
    tokio::spawn(async move {
        info!("prefetching the forecast…");
        match state.cache.get_or_build(&state.builder).await {
            Ok(entry) => {
                info!(date = %entry.forecast.date(), n_hours = entry.forecast.len(), "prefetched");
            }
            Err(error) => {
                warn!("failed to prefetch the forecast: {:#}", anyhow::Error::from(error));
            }
        }
    });
}

pub async fn run<S: FeedSource + Send + Sync + 'static>(
    bind_address: SocketAddr,
    state: Arc<AppState<S>>,
) -> Result {
    let listener =
        TcpListener::bind(bind_address).await.context("failed to bind to the address")?;
    info!(%bind_address, "serving…");
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutting down…");
}
