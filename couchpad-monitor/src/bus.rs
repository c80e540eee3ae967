//! Channels carrying actions and connection notifications out of the monitor

use couchpad_common::{Action, ConnectionEvent};
use tokio::sync::mpsc;

/// Default queue capacity. A full queue blocks the producing reader instead
/// of dropping events.
pub const DEFAULT_CAPACITY: usize = 64;

/// Paired output channels of the device monitor
///
/// Many producers (one per active reader, plus the supervisor for connect
/// notifications), one consumer per stream. Each receiver can be taken
/// exactly once.
pub struct ActionBus {
    action_tx: mpsc::Sender<Action>,
    action_rx: Option<mpsc::Receiver<Action>>,
    connection_tx: mpsc::Sender<ConnectionEvent>,
    connection_rx: Option<mpsc::Receiver<ConnectionEvent>>,
}

impl ActionBus {
    pub fn new(capacity: usize) -> Self {
        let (action_tx, action_rx) = mpsc::channel(capacity);
        let (connection_tx, connection_rx) = mpsc::channel(capacity);
        Self {
            action_tx,
            action_rx: Some(action_rx),
            connection_tx,
            connection_rx: Some(connection_rx),
        }
    }

    /// Receiver for the action stream
    pub fn actions(&mut self) -> mpsc::Receiver<Action> {
        self.action_rx.take().expect("Action receiver already taken")
    }

    /// Receiver for the connection-state stream
    pub fn connections(&mut self) -> mpsc::Receiver<ConnectionEvent> {
        self.connection_rx
            .take()
            .expect("Connection receiver already taken")
    }

    pub(crate) fn action_sender(&self) -> mpsc::Sender<Action> {
        self.action_tx.clone()
    }

    pub(crate) fn connection_sender(&self) -> mpsc::Sender<ConnectionEvent> {
        self.connection_tx.clone()
    }
}

impl Default for ActionBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
