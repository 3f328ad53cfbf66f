mod config;
mod render;

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fleetmap_connect::{DispatchApiClient, WsPositionChannel};
use fleetmap_core::Tracker;

use config::Config;
use render::LogRenderSink;

fn init_tracing() {
    let log_format = std::env::var("FLEETMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();

    let api = Arc::new(DispatchApiClient::new(&config.api_url)?);
    let channel = Arc::new(WsPositionChannel::new(&config.ws_url));
    let tracker = Tracker::start(config.tracker_config(), api, channel, Arc::new(LogRenderSink));
    tracing::info!(
        "Tracking {} (push channel {})",
        config.api_url,
        config.ws_url
    );

    let mut stats_ticker = tokio::time::interval(config.stats_interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = stats_ticker.tick() => {
                let stats = tracker.stats().await;
                let connection = tracker.connection_state().await;
                tracing::info!(
                    "{} vehicles ({} available), {} active cases, {} routes drawn, {} facilities, push channel {}",
                    stats.total_vehicles,
                    stats.available_vehicles,
                    stats.active_cases,
                    stats.drawn_routes,
                    stats.total_facilities,
                    connection
                );
            }
        }
    }

    tracing::info!("Shutting down");
    tracker.shutdown().await;
    Ok(())
}
