//! Periodic device discovery and reader lifecycle management
//!
//! The supervisor polls the device source on a fixed interval, starts a
//! reader task for every newly seen allowed device and leaves devices that
//! are already monitored alone. Readers unregister themselves on their
//! terminal path, so a replugged device is picked up by a later scan with a
//! brand-new reader. Polling, rather than OS hot-plug notification, keeps
//! the loop portable and simple at the cost of up to one interval of
//! detection latency.

use crate::bus::ActionBus;
use crate::reader::Reader;
use crate::registry::Registry;
use crate::source::DeviceSource;
use couchpad_common::settings::DeviceMapping;
use couchpad_common::{Action, ConnectionEvent, DeviceIdentity};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{debug, info, warn};

/// How often the supervisor rescans for plugged and unplugged devices
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Requests the supervisor loop and its readers to stop
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Supervisor for the per-device reader tasks
pub struct DeviceMonitor {
    registry: Arc<Registry>,
    source: Arc<dyn DeviceSource>,
    monitored: Arc<Mutex<HashSet<PathBuf>>>,
    bus: ActionBus,
    poll_interval: Duration,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl DeviceMonitor {
    pub fn new(registry: Registry, source: Arc<dyn DeviceSource>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            registry: Arc::new(registry),
            source,
            monitored: Arc::new(Mutex::new(HashSet::new())),
            bus: ActionBus::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Override the rescan interval (tests use a short one)
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Receiver for the action stream; can be taken once
    pub fn actions(&mut self) -> mpsc::Receiver<Action> {
        self.bus.actions()
    }

    /// Receiver for the connection-state stream; can be taken once
    pub fn connections(&mut self) -> mpsc::Receiver<ConnectionEvent> {
        self.bus.connections()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown_tx: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Snapshot of the device paths currently being read
    pub fn monitored_paths(&self) -> Vec<PathBuf> {
        let monitored = self.monitored.lock().unwrap();
        monitored.iter().cloned().collect()
    }

    /// Run one discovery pass, starting readers for newly seen devices
    ///
    /// Devices already being monitored are left untouched; their readers own
    /// their own lifecycle. Devices whose name has no registry entry are
    /// ignored on purpose.
    pub async fn scan_once(&self) {
        let devices = self.source.enumerate();

        let mut fresh: Vec<(DeviceIdentity, DeviceMapping)> = Vec::new();
        {
            let monitored = self.monitored.lock().unwrap();
            for identity in devices {
                let Some(mapping) = self.registry.lookup(&identity.name) else {
                    continue;
                };
                if monitored.contains(&identity.path) {
                    continue;
                }
                fresh.push((identity, mapping.clone()));
            }
        }

        for (identity, mapping) in fresh {
            // Opening can race an unplug; skip and let the next scan retry.
            let stream = match self.source.open(&identity.path) {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("failed to open {}: {}", identity, err);
                    continue;
                }
            };

            info!("new device detected: {}", identity);
            {
                let mut monitored = self.monitored.lock().unwrap();
                monitored.insert(identity.path.clone());
            }

            if mapping.tray {
                let notice = ConnectionEvent::Connected(identity.name.clone());
                if self.bus.connection_sender().send(notice).await.is_err() {
                    debug!("connection channel closed while reporting {}", identity.name);
                }
            }

            let reader = Reader {
                identity,
                mapping,
                stream,
                actions: self.bus.action_sender(),
                connections: self.bus.connection_sender(),
                monitored: Arc::clone(&self.monitored),
                shutdown: self.shutdown_rx.clone(),
            };
            tokio::task::spawn_blocking(move || reader.run());
        }
    }

    /// Scan at the poll interval until shutdown is requested
    pub async fn run(&self) {
        info!(
            "starting device supervisor (rescan every {:?})",
            self.poll_interval
        );

        let mut shutdown = self.shutdown_rx.clone();
        loop {
            self.scan_once().await;

            tokio::select! {
                _ = time::sleep(self.poll_interval) => {}
                _ = shutdown.changed() => {
                    info!("device supervisor stopping");
                    break;
                }
            }
        }
    }
}
