//! Live tracking session module.
//!
//! This module merges two feeds of the same fleet into one reconciled view:
//!
//! - [`types`] - Update payloads flowing from the feeders into the engine
//! - [`traits`] - Seams to the snapshot backend and the push channel
//! - [`view`] - The reconciliation engine and its derived stats
//! - [`poller`] - Fixed-interval snapshot polling loop
//! - [`listener`] - Push-channel listener with fixed-delay reconnect
//! - [`tracker`] - Session facade tying the pieces together
//!
//! # Architecture
//!
//! ```text
//! SnapshotPoller --+                       +--> RenderSink (map)
//!                  +--> mpsc --> LiveView -+
//! PushListener  ---+    (apply loop)       +--> visible_cases / stats
//! ```
//!
//! The engine is a single writer: every mutation travels through the update
//! queue and is applied by one loop, so feeder ordering is the only ordering.
//! Snapshots are authoritative; push events are a low-latency hint that the
//! next snapshot confirms or corrects.

pub mod listener;
pub mod poller;
pub mod tracker;
pub mod traits;
pub mod types;
pub mod view;


// Re-export commonly used types for convenience
pub use listener::{ConnectionState, PushListener};
pub use poller::SnapshotPoller;
pub use tracker::Tracker;
pub use traits::{DispatchApi, PositionChannel, PositionStream};
pub use types::{LiveUpdate, ResourceKind};
pub use view::{LiveStats, LiveView, RouteLayer};
