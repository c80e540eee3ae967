//! Per-device blocking read loop
//!
//! One reader runs per monitored device on the blocking thread pool. It owns
//! the device's event stream, translates raw events and publishes the
//! resulting actions. On exit, whatever the cause, it removes its own path
//! from the monitored set; that is the only place paths are removed, so no
//! two readers ever run for the same path.

use crate::source::EventStream;
use crate::translate;
use couchpad_common::settings::DeviceMapping;
use couchpad_common::{Action, ConnectionEvent, DeviceIdentity};
use evdev::InputEventKind;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

pub(crate) struct Reader {
    pub identity: DeviceIdentity,
    pub mapping: DeviceMapping,
    pub stream: Box<dyn EventStream>,
    pub actions: mpsc::Sender<Action>,
    pub connections: mpsc::Sender<ConnectionEvent>,
    pub monitored: Arc<Mutex<HashSet<PathBuf>>>,
    pub shutdown: watch::Receiver<bool>,
}

impl Reader {
    /// Consume the device's event stream until removal, error or shutdown
    pub fn run(mut self) {
        info!("monitoring events from {}", self.identity);

        let rt = Handle::current();
        'read: loop {
            if *self.shutdown.borrow() {
                debug!("shutdown requested, stopping reader for {}", self.identity);
                break;
            }

            let events = match self.stream.next_events() {
                Ok(events) => events,
                Err(err) => {
                    // Unplugging the device mid-read lands here; it is an
                    // expected way out, not a fault.
                    info!("device {} stopped delivering events: {}", self.identity, err);
                    break;
                }
            };

            for event in &events {
                let Some(action) = translate::translate(&self.mapping, event) else {
                    if let InputEventKind::Key(key) = event.kind() {
                        if event.value() == 1 {
                            debug!("{}: key code {} not mapped", self.identity.name, key.0);
                        }
                    }
                    continue;
                };

                debug!(
                    "{}: code {} -> action {}",
                    self.identity.name,
                    event.code(),
                    action
                );
                if rt.block_on(self.actions.send(action)).is_err() {
                    // The consumer is gone, which only happens on shutdown.
                    debug!("action channel closed, stopping reader for {}", self.identity);
                    break 'read;
                }
            }
        }

        self.finish(&rt);
    }

    // Terminal path: drop the path from the monitored set, then notify.
    fn finish(self, rt: &Handle) {
        {
            let mut monitored = self.monitored.lock().unwrap();
            monitored.remove(&self.identity.path);
        }
        info!("device removed from monitoring: {}", self.identity);

        // Published after releasing the lock so a full queue cannot stall
        // a concurrent scan.
        if self.mapping.tray {
            let notice = ConnectionEvent::Disconnected(self.identity.name.clone());
            if rt.block_on(self.connections.send(notice)).is_err() {
                debug!(
                    "connection channel closed while reporting {}",
                    self.identity.name
                );
            }
        }
    }
}
