//! Live tracking session lifecycle.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

use crate::config::TrackerConfig;
use crate::dispatch::Case;
use crate::live::listener::{ConnectionState, PushListener};
use crate::live::poller::SnapshotPoller;
use crate::live::traits::{DispatchApi, PositionChannel};
use crate::live::types::LiveUpdate;
use crate::live::view::{LiveStats, LiveView};
use crate::render::RenderSink;

/// Bounded queue between the feeders and the apply loop. Snapshots arrive a
/// handful per poll tick, so backpressure here only matters when the sink
/// stalls badly.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// One live tracking session: the engine plus its background feeders.
///
/// `start` spawns three tasks on the current runtime: the snapshot poller,
/// the push listener, and the apply loop that owns all engine mutations.
/// The engine itself stays single-writer; the poller and listener only push
/// [`LiveUpdate`]s into the queue.
///
/// Dropping a `Tracker` without calling [`shutdown`](Tracker::shutdown)
/// leaves the background tasks running. Shut the session down explicitly.
pub struct Tracker {
    view: Arc<RwLock<LiveView>>,
    connection: Arc<RwLock<ConnectionState>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Tracker {
    /// Start a session. The first snapshot poll begins immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: TrackerConfig,
        api: Arc<dyn DispatchApi>,
        channel: Arc<dyn PositionChannel>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let view = Arc::new(RwLock::new(LiveView::new(config.clone(), sink)));

        let poller = SnapshotPoller::new(api, tx.clone(), config.poll_interval);
        let listener = PushListener::new(channel, tx, config.reconnect_delay);
        let connection = listener.state_handle();

        let apply_view = view.clone();
        let apply_task = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                let mut view = apply_view.write().await;
                match update {
                    LiveUpdate::VehicleSnapshot(vehicles) => {
                        view.apply_vehicle_snapshot(vehicles)
                    }
                    LiveUpdate::CaseSnapshot(cases) => view.apply_case_snapshot(cases),
                    LiveUpdate::FacilitySnapshot(facilities) => {
                        view.apply_facility_snapshot(facilities)
                    }
                    LiveUpdate::Position(update) => view.apply_position_update(update),
                    LiveUpdate::RefreshFailed { kind, error } => {
                        view.record_refresh_failure(kind, &error)
                    }
                }
            }
            debug!("Apply loop stopped");
        });

        info!("Live tracking session started");
        Self {
            view,
            connection,
            tasks: vec![
                tokio::spawn(poller.run()),
                tokio::spawn(listener.run()),
                apply_task,
            ],
        }
    }

    /// Stop the background tasks and release every rendered resource.
    ///
    /// Aborting is safe at any point: engine operations are synchronous, so
    /// a cancelled apply loop never leaves a half-applied update behind.
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        for task in &self.tasks {
            task.abort();
        }
        self.view.write().await.dispose();
        info!("Live tracking session stopped");
    }

    /// Non-terminal cases in stable snapshot order.
    pub async fn visible_cases(&self) -> Vec<Case> {
        self.view.read().await.visible_cases()
    }

    /// Counters derived from canonical state.
    pub async fn stats(&self) -> LiveStats {
        self.view.read().await.stats()
    }

    /// Show or hide vehicle markers. Canonical state is untouched.
    pub async fn set_vehicles_visible(&self, visible: bool) {
        self.view.write().await.set_vehicles_visible(visible);
    }

    /// Whether vehicle markers are currently shown.
    pub async fn vehicles_visible(&self) -> bool {
        self.view.read().await.vehicles_visible()
    }

    /// Current push-channel connection state.
    pub async fn connection_state(&self) -> ConnectionState {
        *self.connection.read().await
    }
}
