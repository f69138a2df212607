//! Connectivity tracking for image loads.
//!
//! The monitor holds the last observed connectivity state. Hosts feed it
//! [`ConnectivityEvent`]s either directly via [`NetworkQualityMonitor::apply`]
//! or through a channel drained by [`NetworkQualityMonitor::spawn_listener`].
//!
//! # Thread Safety
//!
//! State lives behind a `parking_lot::RwLock`; reads never block each other
//! and no lock is held across an await point.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::tier::{ConnectionSignals, LoadConfig, QualityTier};

/// Connection type reported before the host provides one.
pub const UNKNOWN_CONNECTION_TYPE: &str = "unknown";

/// A connectivity notification from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectivityEvent {
    /// The host regained connectivity.
    Online,
    /// The host lost connectivity.
    Offline,
    /// Bandwidth/latency estimates changed.
    Changed(ConnectionSignals),
}

#[derive(Debug)]
struct NetworkState {
    online: bool,
    tier: QualityTier,
    connection_type: String,
    signals: ConnectionSignals,
}

/// Classifies the current network and hands out load configurations.
#[derive(Debug)]
pub struct NetworkQualityMonitor {
    state: RwLock<NetworkState>,
}

impl NetworkQualityMonitor {
    /// Create a monitor with the host-reported initial connectivity and no
    /// bandwidth signals (tier defaults to good).
    pub fn new(initially_online: bool) -> Self {
        Self::with_signals(initially_online, ConnectionSignals::default())
    }

    /// Create a monitor with initial connectivity and signals.
    pub fn with_signals(initially_online: bool, signals: ConnectionSignals) -> Self {
        let tier = QualityTier::classify(&signals);
        let connection_type = signals
            .effective_type
            .clone()
            .unwrap_or_else(|| UNKNOWN_CONNECTION_TYPE.to_string());

        Self {
            state: RwLock::new(NetworkState {
                online: initially_online,
                tier,
                connection_type,
                signals,
            }),
        }
    }

    /// Create a monitor already subscribed to a notification channel.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribed(
        initially_online: bool,
        signals: ConnectionSignals,
        events: mpsc::Receiver<ConnectivityEvent>,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let monitor = Arc::new(Self::with_signals(initially_online, signals));
        let listener = monitor.spawn_listener(events);
        (monitor, listener)
    }

    /// The current quality tier.
    pub fn current_tier(&self) -> QualityTier {
        self.state.read().tier
    }

    /// Whether the last connectivity event reported the host online.
    pub fn is_online(&self) -> bool {
        self.state.read().online
    }

    /// Last reported effective connection type.
    pub fn connection_type(&self) -> String {
        self.state.read().connection_type.clone()
    }

    /// Last reported connection signals.
    pub fn signals(&self) -> ConnectionSignals {
        self.state.read().signals.clone()
    }

    /// The fixed load configuration for a tier.
    pub fn load_config_for(&self, tier: QualityTier) -> LoadConfig {
        tier.load_config()
    }

    /// The load configuration for the current tier.
    pub fn load_config(&self) -> LoadConfig {
        self.load_config_for(self.current_tier())
    }

    /// Apply a single connectivity event.
    pub fn apply(&self, event: ConnectivityEvent) {
        let mut state = self.state.write();
        match event {
            ConnectivityEvent::Online => {
                if !state.online {
                    info!("Network connected");
                }
                state.online = true;
            }
            ConnectivityEvent::Offline => {
                if state.online {
                    info!("Network disconnected");
                }
                state.online = false;
            }
            ConnectivityEvent::Changed(signals) => {
                let tier = QualityTier::classify(&signals);
                state.connection_type = signals
                    .effective_type
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CONNECTION_TYPE.to_string());
                if tier != state.tier {
                    info!(
                        connection_type = %state.connection_type,
                        from = %state.tier,
                        to = %tier,
                        "Network quality changed"
                    );
                } else {
                    debug!(
                        connection_type = %state.connection_type,
                        tier = %tier,
                        "Network signals updated"
                    );
                }
                state.tier = tier;
                state.signals = signals;
            }
        }
    }

    /// Drain a notification channel into this monitor.
    ///
    /// The listener task ends when every sender has been dropped.
    pub fn spawn_listener(
        self: &Arc<Self>,
        mut events: mpsc::Receiver<ConnectivityEvent>,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                monitor.apply(event);
            }
            debug!("Connectivity listener stopped");
        })
    }
}

impl Default for NetworkQualityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
