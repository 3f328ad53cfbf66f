//! Snapshot polling loop.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::live::traits::DispatchApi;
use crate::live::types::{LiveUpdate, ResourceKind};

/// Fetches full snapshots on a fixed interval and forwards them to the
/// engine's apply loop.
///
/// The poller is the authoritative feed: whatever the push channel missed
/// (or mangled) is corrected at the latest by the next tick. It owns no
/// engine state and talks only through the update channel.
pub struct SnapshotPoller {
    api: Arc<dyn DispatchApi>,
    updates: mpsc::Sender<LiveUpdate>,
    interval: Duration,
}

impl SnapshotPoller {
    pub fn new(
        api: Arc<dyn DispatchApi>,
        updates: mpsc::Sender<LiveUpdate>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            updates,
            interval,
        }
    }

    /// Run until the receiving side of the update channel goes away.
    ///
    /// The first tick fires immediately. Ticks never overlap: the three
    /// fetches run sequentially inside the tick, and a tick that overruns
    /// the interval delays the next one rather than letting ticks stack up.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Snapshot poller started, interval {:?}", self.interval);
        loop {
            ticker.tick().await;
            if !self.poll_once().await {
                break;
            }
        }
        debug!("Snapshot poller stopped");
    }

    /// One full poll pass: vehicles, then cases, then facilities.
    ///
    /// Each fetch fails independently; a failure is forwarded as
    /// [`LiveUpdate::RefreshFailed`] and the pass moves on to the next
    /// resource. Returns false once the engine is gone.
    async fn poll_once(&self) -> bool {
        let update = match self.api.fetch_vehicles().await {
            Ok(vehicles) => LiveUpdate::VehicleSnapshot(vehicles),
            Err(error) => LiveUpdate::RefreshFailed {
                kind: ResourceKind::Vehicles,
                error,
            },
        };
        if self.updates.send(update).await.is_err() {
            return false;
        }

        let update = match self.api.fetch_cases().await {
            Ok(cases) => LiveUpdate::CaseSnapshot(cases),
            Err(error) => LiveUpdate::RefreshFailed {
                kind: ResourceKind::Cases,
                error,
            },
        };
        if self.updates.send(update).await.is_err() {
            return false;
        }

        let update = match self.api.fetch_facilities().await {
            Ok(facilities) => LiveUpdate::FacilitySnapshot(facilities),
            Err(error) => LiveUpdate::RefreshFailed {
                kind: ResourceKind::Facilities,
                error,
            },
        };
        self.updates.send(update).await.is_ok()
    }
}
