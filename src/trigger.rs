//! Hardware trigger adapter.
//!
//! External event sources (a momentary button, a motion sensor) send
//! [`TriggerKind`] events on a channel; the adapter answers each one with
//! the same fire-and-forget action: light the indicator, save a snapshot
//! through the shared camera session, hold briefly, extinguish. GPIO wiring
//! itself lives outside this crate; anything able to send on the channel is
//! a valid source.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::camera::CameraSession;
use crate::storage::SnapshotStore;

/// The kind of external event that requested a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Momentary switch press.
    Button,
    /// Motion sensor activation.
    Motion,
}

impl TriggerKind {
    /// Short label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Motion => "motion",
        }
    }

    /// Parse a label back into a kind.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "button" => Some(Self::Button),
            "motion" => Some(Self::Motion),
            _ => None,
        }
    }
}

/// Visual feedback for a triggered capture.
///
/// The default implementation only logs; a GPIO-backed LED would implement
/// this trait in deployment wiring.
pub trait Indicator: Send + Sync {
    /// Turn the indicator on or off.
    fn set_lit(&self, lit: bool);
}

/// Indicator that records transitions in the log.
#[derive(Debug, Default)]
pub struct LogIndicator;

impl Indicator for LogIndicator {
    fn set_lit(&self, lit: bool) {
        debug!(lit, "Trigger indicator");
    }
}

/// Consumes trigger events and turns each into one snapshot attempt.
pub struct TriggerAdapter {
    session: Arc<CameraSession>,
    store: SnapshotStore,
    indicator: Arc<dyn Indicator>,
    hold: Duration,
}

impl TriggerAdapter {
    pub fn new(
        session: Arc<CameraSession>,
        store: SnapshotStore,
        indicator: Arc<dyn Indicator>,
        hold: Duration,
    ) -> Self {
        Self {
            session,
            store,
            indicator,
            hold,
        }
    }

    /// Run until every sender is dropped.
    pub async fn run(self, mut events: mpsc::Receiver<TriggerKind>) {
        while let Some(kind) = events.recv().await {
            self.handle_event(kind).await;
        }
        debug!("Trigger adapter stopped: all event sources gone");
    }

    /// Handle one event: indicator on, snapshot, hold, indicator off.
    ///
    /// Snapshot failures are logged, never propagated; the indicator always
    /// ends up off.
    pub async fn handle_event(&self, kind: TriggerKind) {
        info!(source = kind.label(), "Trigger event");
        self.indicator.set_lit(true);

        let session = Arc::clone(&self.session);
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || session.save_snapshot(&store)).await {
            Ok(Ok(name)) => info!(source = kind.label(), name = %name, "Triggered snapshot saved"),
            Ok(Err(err)) => {
                warn!(source = kind.label(), error = %err, "Triggered snapshot failed");
            }
            Err(err) => warn!(source = kind.label(), error = %err, "Snapshot task failed"),
        }

        tokio::time::sleep(self.hold).await;
        self.indicator.set_lit(false);
    }
}
