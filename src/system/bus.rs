//! Channels between the input source, the engine thread and the renderer.
//!
//! Gestures may be produced on any thread; they are queued here and drained
//! by the single thread that ticks the engine, so they are always judged
//! against up-to-date note positions on the next tick.

use crate::input::events::GestureEvent;
use crate::shared::snapshot::EngineSnapshot;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

/// Host-level events for the engine thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    /// Stop ticking until `Resume`.
    Pause,
    Resume,
    /// Shutdown requested.
    Quit,
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct SystemBus {
    /// Input → Engine: classified gestures.
    pub gesture_tx: Sender<GestureEvent>,
    pub gesture_rx: Receiver<GestureEvent>,

    /// Engine → Render: state snapshots.
    pub snapshot_tx: Sender<EngineSnapshot>,
    pub snapshot_rx: Receiver<EngineSnapshot>,

    /// Host → Engine: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (gesture_tx, gesture_rx) = unbounded();

        // Bounded snapshot channel: max 2 frames queued to limit latency
        let (snapshot_tx, snapshot_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();

        Self {
            gesture_tx,
            gesture_rx,
            snapshot_tx,
            snapshot_rx,
            sys_tx,
            sys_rx,
        }
    }

    /// Takes every gesture queued since the last call, in arrival order.
    pub fn drain_gestures(&self) -> Vec<GestureEvent> {
        self.gesture_rx.try_iter().collect()
    }

    /// Publishes a snapshot, dropping it if the renderer is behind.
    pub fn publish(&self, snapshot: EngineSnapshot) {
        let _ = self.snapshot_tx.try_send(snapshot);
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
