//! waterworks-core: real-time monitoring core for a water
//! distribution simulation.
//!
//! The crate drives a two-phase solver run (hydraulic then quality)
//! over a fixed one-week horizon, collects one sample per simulated
//! hour, and maintains per-(entity, quantity) running statistics and
//! threshold-compliance counters.
//!
//! RULES:
//!   - The solver is an external boundary ([`solver::NetworkSolver`]);
//!     the core never computes hydraulics itself.
//!   - The tracking universe is fixed per run and rebuilt from the
//!     network config at every run start.
//!   - Samples are ingested exactly once, in time order, by a single
//!     writer; consumers observe the run only through
//!     [`event::MonitorEvent`].
//!   - Compliance boundaries are inclusive: only readings strictly
//!     below the low bound or strictly above the high bound count as
//!     excursions.

pub mod compliance;
pub mod engine;
pub mod error;
pub mod event;
pub mod ingest;
pub mod network;
pub mod patch;
pub mod quantity;
pub mod registry;
pub mod sample;
pub mod solver;
pub mod stats;
pub mod synthetic;
pub mod types;

pub use compliance::{ComplianceSnapshot, ComplianceTracker};
pub use engine::{RunConfig, RunEngine, RunParams, RunState, StopHandle};
pub use error::{SimError, SimResult};
pub use event::{EventSink, MonitorEvent};
pub use network::NetworkConfig;
pub use quantity::{Quantity, ThresholdBand};
pub use registry::TrackingRegistry;
pub use sample::{Phase, Sample};
pub use solver::{NetworkSolver, NodeProperty};
pub use stats::{StatAccumulator, StatSnapshot};
pub use synthetic::SyntheticSolver;
pub use types::{Hour, NodeId, RunId};
