/// Default snapshot poll period in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Default delay before a push-channel reconnect attempt, in milliseconds
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5000;

/// Default route color palette, cycled by drawn-route index
pub const DEFAULT_ROUTE_PALETTE: [&str; 10] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f1c40f", "#9b59b6", "#e67e22", "#1abc9c", "#34495e",
    "#d35400", "#27ae60",
];

/// Route color used when the configured palette is empty
pub const FALLBACK_ROUTE_COLOR: &str = "#3388ff";
