//! Fleetmap Core - Live fleet state reconciliation.
//!
//! This crate merges periodic REST snapshots and incremental push events
//! into one canonical view of a dispatch fleet, emitting minimal render
//! commands toward a map sink. It is transport-agnostic: the `connect`
//! crate supplies the HTTP and WebSocket implementations of the seams
//! defined here.

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod errors;
pub mod facilities;
pub mod fleet;
pub mod geo;
pub mod live;
pub mod render;

// Re-export the session surface
pub use config::TrackerConfig;
pub use live::{ConnectionState, DispatchApi, LiveStats, PositionChannel, Tracker};
pub use render::{RenderCommand, RenderSink};

// Re-export error types
pub use errors::ChannelError;
pub use errors::DecodeError;
pub use errors::FetchError;
