//! Tracker session configuration.

use std::time::Duration;

use crate::constants::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_RECONNECT_DELAY_MS, DEFAULT_ROUTE_PALETTE,
};

/// Configuration for a live tracking session.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Period between snapshot polls.
    pub poll_interval: Duration,
    /// Delay before a push-channel reconnect attempt.
    pub reconnect_delay: Duration,
    /// Route colors, cycled by drawn-route index.
    pub route_palette: Vec<String>,
    /// Emit a fit-view command after a route rebuild that drew at least one layer.
    pub fit_view_on_rebuild: bool,
    /// Initial visibility of vehicle markers.
    pub vehicles_visible: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            route_palette: DEFAULT_ROUTE_PALETTE
                .iter()
                .map(|c| c.to_string())
                .collect(),
            fit_view_on_rebuild: false,
            vehicles_visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.reconnect_delay, Duration::from_millis(5000));
        assert_eq!(config.route_palette.len(), 10);
        assert!(!config.fit_view_on_rebuild);
        assert!(config.vehicles_visible);
    }
}
