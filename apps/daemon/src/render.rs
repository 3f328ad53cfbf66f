//! Render sink that logs commands instead of drawing them.

use fleetmap_core::render::{RenderCommand, RenderSink};

/// Headless sink: every render command becomes one JSON log line.
///
/// Lets the daemon run without a map while keeping the full command stream
/// observable (pipe it into `jq`, or diff two runs).
pub struct LogRenderSink;

impl RenderSink for LogRenderSink {
    fn apply(&self, command: RenderCommand) {
        match serde_json::to_string(&command) {
            Ok(json) => tracing::debug!(target: "fleetmap::render", "{}", json),
            Err(e) => tracing::warn!("Failed to serialize render command: {}", e),
        }
    }
}
