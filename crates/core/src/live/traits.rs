//! Trait seams between the tracking session and the outside world.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::dispatch::Case;
use crate::errors::{ChannelError, FetchError};
use crate::facilities::Facility;
use crate::fleet::{PositionUpdate, Vehicle};

/// Stream of incremental position updates from one subscription.
///
/// Dropping the stream tears the subscription down; an `Err` item or the end
/// of the stream means the connection is gone.
pub type PositionStream = BoxStream<'static, Result<PositionUpdate, ChannelError>>;

/// Read-only snapshot access to the dispatch backend.
///
/// Every call returns the full current collection for one resource kind.
/// Implementations perform no retries; the poller retries implicitly on its
/// next tick.
#[async_trait]
pub trait DispatchApi: Send + Sync {
    /// Fetch all fleet vehicles.
    async fn fetch_vehicles(&self) -> Result<Vec<Vehicle>, FetchError>;

    /// Fetch all dispatch cases, including recently closed ones.
    async fn fetch_cases(&self) -> Result<Vec<Case>, FetchError>;

    /// Fetch all facilities.
    async fn fetch_facilities(&self) -> Result<Vec<Facility>, FetchError>;
}

/// Transport for the incremental position-update channel.
///
/// `subscribe` establishes one logical subscription from scratch; there is
/// no resumption token, missed events are reconciled by the next snapshot
/// poll. All reconnect policy lives in the listener, not here.
#[async_trait]
pub trait PositionChannel: Send + Sync {
    /// Open a new subscription and return its event stream.
    async fn subscribe(&self) -> Result<PositionStream, ChannelError>;
}
