//! Render sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::RenderCommand;

/// Trait for receiving render commands.
///
/// Implementations translate commands into map mutations. The engine emits
/// commands through this trait after every reconciliation pass.
///
/// # Design Rules
///
/// - `apply()` must be fast and non-blocking (no network calls, no layout)
/// - Implementations must tolerate removes for ids they never saw
/// - Failure to render must not affect reconciliation state (best-effort)
pub trait RenderSink: Send + Sync {
    /// Apply a single render command.
    fn apply(&self, command: RenderCommand);

    /// Apply multiple render commands in order.
    ///
    /// Default implementation calls `apply()` for each command.
    /// Implementations may override for batch optimization.
    fn apply_batch(&self, commands: Vec<RenderCommand>) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// No-op implementation for tests or headless contexts without a map.
#[derive(Clone, Default)]
pub struct NoOpRenderSink;

impl RenderSink for NoOpRenderSink {
    fn apply(&self, _command: RenderCommand) {
        // Intentionally empty - commands are discarded
    }
}

/// Mock sink for testing - collects applied commands.
#[derive(Clone, Default)]
pub struct MockRenderSink {
    commands: Arc<Mutex<Vec<RenderCommand>>>,
}

impl MockRenderSink {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected commands.
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Clears collected commands.
    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }

    /// Returns the number of collected commands.
    pub fn len(&self) -> usize {
        self.commands.lock().unwrap().len()
    }

    /// Returns true if no commands have been collected.
    pub fn is_empty(&self) -> bool {
        self.commands.lock().unwrap().is_empty()
    }
}

impl RenderSink for MockRenderSink {
    fn apply(&self, command: RenderCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LngLat;
    use crate::render::MarkerId;

    fn remove(id: i64) -> RenderCommand {
        RenderCommand::RemoveMarker {
            id: MarkerId::Vehicle(id),
        }
    }

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpRenderSink;
        sink.apply(RenderCommand::FitView {
            coordinates: vec![LngLat::new(-7.98, 31.63)],
        });
        sink.apply_batch(vec![remove(1), remove(2)]);
    }

    #[test]
    fn test_mock_sink_collects_commands() {
        let sink = MockRenderSink::new();
        assert!(sink.is_empty());

        sink.apply(remove(1));
        assert_eq!(sink.len(), 1);

        sink.apply_batch(vec![remove(2), remove(3)]);
        assert_eq!(sink.len(), 3);

        let commands = sink.commands();
        assert_eq!(commands.len(), 3);

        sink.clear();
        assert!(sink.is_empty());
    }
}
