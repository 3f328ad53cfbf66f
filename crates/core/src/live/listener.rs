//! Push-channel listener with fixed-delay reconnect.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::{mpsc, RwLock};

use crate::live::traits::{PositionChannel, PositionStream};
use crate::live::types::LiveUpdate;

/// Lifecycle of the push-channel subscription.
///
/// ```text
///                subscribe ok
///   Connecting ----------------> Connected
///      ^   \                        |
///      |    \ subscribe err         | stream err / stream end
///      |     v                      v
///      +-- Disconnected <-----------+
///        (full reconnect delay)
/// ```
///
/// There is no backoff ladder and no attempt limit: every disconnect leads
/// to exactly one new attempt after the full fixed delay, forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No subscription; the reconnect delay may be running.
    #[default]
    Disconnected,
    /// A subscription attempt is in flight.
    Connecting,
    /// Subscribed; events are flowing.
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Maintains one push-channel subscription and forwards its events to the
/// engine's apply loop.
///
/// Losing the subscription is routine, not fatal: the listener marks itself
/// disconnected, sleeps the full reconnect delay, and subscribes again from
/// scratch. Missed events are not replayed; the snapshot poller repairs any
/// divergence on its next tick.
pub struct PushListener {
    channel: Arc<dyn PositionChannel>,
    updates: mpsc::Sender<LiveUpdate>,
    state: Arc<RwLock<ConnectionState>>,
    reconnect_delay: Duration,
}

impl PushListener {
    pub fn new(
        channel: Arc<dyn PositionChannel>,
        updates: mpsc::Sender<LiveUpdate>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            channel,
            updates,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            reconnect_delay,
        }
    }

    /// Shared handle for observing the connection state.
    pub fn state_handle(&self) -> Arc<RwLock<ConnectionState>> {
        self.state.clone()
    }

    /// Run until the receiving side of the update channel goes away.
    pub async fn run(self) {
        loop {
            self.set_state(ConnectionState::Connecting).await;
            match self.channel.subscribe().await {
                Ok(stream) => {
                    self.set_state(ConnectionState::Connected).await;
                    info!("Push channel connected");
                    if !self.drain(stream).await {
                        self.set_state(ConnectionState::Disconnected).await;
                        return;
                    }
                }
                Err(error) => {
                    warn!("Push channel connect failed: {}", error);
                }
            }

            self.set_state(ConnectionState::Disconnected).await;
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Forward events until the stream dies. Returns false once the engine
    /// is gone and the listener should exit instead of reconnecting.
    async fn drain(&self, mut stream: PositionStream) -> bool {
        loop {
            match stream.next().await {
                Some(Ok(update)) => {
                    if self
                        .updates
                        .send(LiveUpdate::Position(update))
                        .await
                        .is_err()
                    {
                        return false;
                    }
                }
                Some(Err(error)) => {
                    warn!("Push channel failed: {}", error);
                    return true;
                }
                None => {
                    info!("Push channel closed by remote");
                    return true;
                }
            }
        }
    }

    async fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write().await;
        if *state != next {
            debug!("Push channel {} -> {}", *state, next);
            *state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;

    use async_trait::async_trait;
    use futures::stream;
    use tokio::time::timeout;

    use super::*;
    use crate::errors::ChannelError;
    use crate::fleet::PositionUpdate;

    const RECV_DEADLINE: Duration = Duration::from_secs(2);

    fn event(vehicle_id: i64) -> PositionUpdate {
        PositionUpdate {
            vehicle_id,
            latitude: 31.61,
            longitude: -7.91,
        }
    }

    /// One scripted subscription outcome.
    enum Session {
        /// `subscribe` fails outright.
        Refused,
        /// Yields the given items, then the stream ends.
        Events(Vec<Result<PositionUpdate, ChannelError>>),
        /// Yields the given items, then stays open forever.
        EventsThenOpen(Vec<Result<PositionUpdate, ChannelError>>),
    }

    /// Fake channel that plays back one [`Session`] per subscribe call and
    /// records when each call happened.
    #[derive(Clone, Default)]
    struct ScriptedChannel {
        sessions: Arc<Mutex<VecDeque<Session>>>,
        subscribe_times: Arc<Mutex<Vec<Instant>>>,
    }

    impl ScriptedChannel {
        fn with_sessions(sessions: Vec<Session>) -> Self {
            Self {
                sessions: Arc::new(Mutex::new(sessions.into())),
                subscribe_times: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn subscribe_times(&self) -> Vec<Instant> {
            self.subscribe_times.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PositionChannel for ScriptedChannel {
        async fn subscribe(&self) -> Result<PositionStream, ChannelError> {
            self.subscribe_times.lock().unwrap().push(Instant::now());
            let session = self
                .sessions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Session::Refused);
            match session {
                Session::Refused => Err(ChannelError::Connect("refused".to_string())),
                Session::Events(items) => Ok(stream::iter(items).boxed()),
                Session::EventsThenOpen(items) => {
                    Ok(stream::iter(items).chain(stream::pending()).boxed())
                }
            }
        }
    }

    async fn recv(rx: &mut mpsc::Receiver<LiveUpdate>) -> LiveUpdate {
        timeout(RECV_DEADLINE, rx.recv())
            .await
            .expect("timed out waiting for update")
            .expect("update channel closed")
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_events_are_forwarded_in_order() {
        let channel = ScriptedChannel::with_sessions(vec![Session::EventsThenOpen(vec![
            Ok(event(1)),
            Ok(event(2)),
        ])]);
        let (tx, mut rx) = mpsc::channel(16);
        let listener = PushListener::new(Arc::new(channel), tx, Duration::from_secs(60));
        let state = listener.state_handle();
        let handle = tokio::spawn(listener.run());

        match recv(&mut rx).await {
            LiveUpdate::Position(update) => assert_eq!(update.vehicle_id, 1),
            other => panic!("expected position update, got {:?}", other),
        }
        match recv(&mut rx).await {
            LiveUpdate::Position(update) => assert_eq!(update.vehicle_id, 2),
            other => panic!("expected position update, got {:?}", other),
        }
        assert_eq!(*state.read().await, ConnectionState::Connected);

        handle.abort();
    }

    #[tokio::test]
    async fn test_stream_error_leads_to_one_delayed_reconnect() {
        let channel = ScriptedChannel::with_sessions(vec![
            Session::Events(vec![Ok(event(1)), Err(ChannelError::Transport("reset".to_string()))]),
            Session::EventsThenOpen(vec![Ok(event(2))]),
        ]);
        let probe = channel.clone();
        let (tx, mut rx) = mpsc::channel(16);
        let listener = PushListener::new(Arc::new(channel), tx, Duration::from_millis(40));
        let handle = tokio::spawn(listener.run());

        match recv(&mut rx).await {
            LiveUpdate::Position(update) => assert_eq!(update.vehicle_id, 1),
            other => panic!("expected position update, got {:?}", other),
        }
        // Delivered only by the second subscription, after the full delay
        match recv(&mut rx).await {
            LiveUpdate::Position(update) => assert_eq!(update.vehicle_id, 2),
            other => panic!("expected position update, got {:?}", other),
        }

        let times = probe.subscribe_times();
        assert_eq!(times.len(), 2);
        assert!(times[1] - times[0] >= Duration::from_millis(40));

        handle.abort();
    }

    #[tokio::test]
    async fn test_refused_connects_do_not_storm() {
        let channel = ScriptedChannel::default();
        let probe = channel.clone();
        let (tx, _rx) = mpsc::channel(16);
        let listener = PushListener::new(Arc::new(channel), tx, Duration::from_millis(40));
        let state = listener.state_handle();
        let handle = tokio::spawn(listener.run());

        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        let times = probe.subscribe_times();
        // 150ms with a 40ms delay permits at most 4 attempts, one per window
        assert!(times.len() >= 2);
        assert!(times.len() <= 5);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(40));
        }
        assert_eq!(*state.read().await, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_remote_close_reconnects_after_full_delay() {
        let channel = ScriptedChannel::with_sessions(vec![
            Session::Events(vec![]),
            Session::Events(vec![]),
            Session::EventsThenOpen(vec![]),
        ]);
        let probe = channel.clone();
        let (tx, _rx) = mpsc::channel(16);
        let listener = PushListener::new(Arc::new(channel), tx, Duration::from_millis(30));
        let handle = tokio::spawn(listener.run());

        tokio::time::sleep(Duration::from_millis(140)).await;
        handle.abort();

        let times = probe.subscribe_times();
        assert_eq!(times.len(), 3);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(30));
        }
    }

    #[tokio::test]
    async fn test_listener_exits_when_engine_gone() {
        let channel = ScriptedChannel::with_sessions(vec![Session::EventsThenOpen(vec![Ok(
            event(1),
        )])]);
        let (tx, rx) = mpsc::channel(16);
        drop(rx);
        let listener = PushListener::new(Arc::new(channel), tx, Duration::from_millis(5));
        let state = listener.state_handle();
        let handle = tokio::spawn(listener.run());

        timeout(RECV_DEADLINE, handle)
            .await
            .expect("listener kept running after channel closed")
            .expect("listener task panicked");
        assert_eq!(*state.read().await, ConnectionState::Disconnected);
    }
}
