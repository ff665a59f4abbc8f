//! Typed run notifications.
//!
//! RULE: Consumers observe the run ONLY through these events; the
//! engine never hardcodes a call site. Stats displays, charts, and
//! logging all subscribe independently.

use crate::quantity::Quantity;
use crate::sample::Phase;
use crate::types::{Hour, NodeId, RunId};
use serde::Serialize;

/// Every notification emitted during a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    RunStarted {
        run_id: RunId,
    },
    /// Monotonically non-decreasing within a phase; reset to 0 only
    /// at run start. Exactly 50 at the phase boundary, 100 at
    /// completion.
    ProgressUpdated {
        percent: f64,
        phase: Phase,
    },
    /// Exactly the (entity, quantity) views touched by one sample,
    /// enabling incremental refresh.
    SampleIngested {
        time: Hour,
        phase: Phase,
        touched: Vec<(NodeId, Quantity)>,
    },
    PhaseCompleted {
        phase: Phase,
    },
    RunCompleted {
        run_id: RunId,
    },
    RunCancelled {
        run_id: RunId,
    },
    RunFailed {
        run_id: RunId,
        message: String,
    },
}

/// A subscriber. The engine calls every registered sink in
/// subscription order for each event; sinks must not block.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &MonitorEvent);
}
