use std::time::Duration;

use fleetmap_core::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_RECONNECT_DELAY_MS};
use fleetmap_core::TrackerConfig;

pub struct Config {
    pub api_url: String,
    pub ws_url: String,
    pub poll_interval: Duration,
    pub reconnect_delay: Duration,
    pub fit_view: bool,
    pub stats_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_url = std::env::var("FLEETMAP_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let ws_url = std::env::var("FLEETMAP_WS_URL")
            .unwrap_or_else(|_| "ws://localhost:8080/ws/positions".to_string());
        let poll_ms: u64 = std::env::var("FLEETMAP_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_MS.to_string())
            .parse()
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        let reconnect_ms: u64 = std::env::var("FLEETMAP_RECONNECT_DELAY_MS")
            .unwrap_or_else(|_| DEFAULT_RECONNECT_DELAY_MS.to_string())
            .parse()
            .unwrap_or(DEFAULT_RECONNECT_DELAY_MS);
        let fit_view = std::env::var("FLEETMAP_FIT_VIEW")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);
        let stats_ms: u64 = std::env::var("FLEETMAP_STATS_INTERVAL_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Self {
            api_url,
            ws_url,
            poll_interval: Duration::from_millis(poll_ms),
            reconnect_delay: Duration::from_millis(reconnect_ms),
            fit_view,
            stats_interval: Duration::from_millis(stats_ms),
        }
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            poll_interval: self.poll_interval,
            reconnect_delay: self.reconnect_delay,
            fit_view_on_rebuild: self.fit_view,
            ..TrackerConfig::default()
        }
    }
}
