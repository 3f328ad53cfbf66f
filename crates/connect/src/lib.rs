//! Fleetmap Connect - transports for the live tracking engine.
//!
//! This crate provides the production implementations of the seams defined
//! in `fleetmap_core`: [`DispatchApiClient`] fetches snapshots over HTTP
//! and [`WsPositionChannel`] subscribes to position pushes over WebSocket.

pub mod client;
pub mod stream;

// Re-export commonly used types
pub use client::DispatchApiClient;
pub use stream::WsPositionChannel;
