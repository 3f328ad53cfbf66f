//! Error types for the live tracking subsystem.
//!
//! None of these errors is fatal: every failure path degrades to a stale but
//! consistent view. Snapshot fetch failures keep the previous snapshot
//! authoritative, geometry decode failures skip a single route, and channel
//! failures feed the reconnect state machine.

use thiserror::Error;

/// Errors raised by the snapshot data-access layer.
///
/// The poller reports these to the engine as a failed refresh and retries
/// implicitly on the next tick; no retry logic lives here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The upstream service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body or status text, truncated by the client
        message: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The response arrived but its body was not the expected shape.
    #[error("Response decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Returns the HTTP status code, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}

/// Errors raised while decoding an encoded route polyline.
///
/// The owning work item is skipped for the current rebuild pass; other
/// routes are unaffected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Input was empty or whitespace-only.
    #[error("Encoded polyline is empty")]
    Empty,

    /// Input contained a byte outside the polyline alphabet.
    #[error("Invalid polyline character at byte {index}")]
    InvalidCharacter {
        /// Byte offset of the offending character
        index: usize,
    },

    /// Input ended in the middle of a coordinate chunk.
    #[error("Polyline truncated mid-coordinate")]
    Truncated,

    /// A coordinate chunk sequence ran past the representable range.
    #[error("Polyline coordinate overflow at byte {index}")]
    Overflow {
        /// Byte offset where the overlong chunk sequence was detected
        index: usize,
    },
}

/// Errors raised by the push-channel transport.
///
/// Any of these returns the listener to the disconnected state and schedules
/// a reconnect; they never propagate further.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The subscription could not be established.
    #[error("Connect failed: {0}")]
    Connect(String),

    /// The established connection failed mid-stream.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server closed the connection.
    #[error("Channel closed by peer")]
    Closed,
}
