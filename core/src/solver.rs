//! The external solver boundary.
//!
//! The core never reimplements hydraulics. It depends only on "advance
//! one internal step, report elapsed simulated seconds, and read a
//! named node's value for a property code", treating every call as
//! fallible.

use crate::error::SimResult;

/// EPANET-style node property codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeProperty {
    Demand,
    Head,
    Pressure,
    Quality,
}

impl NodeProperty {
    pub fn code(&self) -> i32 {
        match self {
            NodeProperty::Demand   => 9,
            NodeProperty::Head     => 10,
            NodeProperty::Pressure => 11,
            NodeProperty::Quality  => 12,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeProperty::Demand   => "demand",
            NodeProperty::Head     => "head",
            NodeProperty::Pressure => "pressure",
            NodeProperty::Quality  => "quality",
        }
    }
}

/// A water-network solving engine driven one internal step at a time.
///
/// Implementations must tolerate close calls for solves that were
/// never opened: the engine releases resources best-effort on error
/// and cancellation paths.
pub trait NetworkSolver: Send {
    /// Set up the solver workspace. May fail transiently; the engine
    /// retries with backoff.
    fn initialize(&mut self) -> SimResult<()>;

    /// Load a (patched) model definition.
    fn load_model(&mut self, model_text: &str) -> SimResult<()>;

    fn open_hydraulics(&mut self) -> SimResult<()>;
    fn init_hydraulics(&mut self) -> SimResult<()>;
    /// Solve the current hydraulic step; returns elapsed simulated
    /// seconds.
    fn step_hydraulics(&mut self) -> SimResult<u64>;
    /// Advance to the next hydraulic step; 0 means the solve is done.
    fn advance_hydraulics(&mut self) -> SimResult<u64>;
    fn save_hydraulics(&mut self) -> SimResult<()>;
    fn close_hydraulics(&mut self) -> SimResult<()>;

    /// Seed the source (reservoir) disinfectant concentration before
    /// the quality solve.
    fn set_initial_quality(&mut self, source_quality: f64) -> SimResult<()>;
    fn open_quality(&mut self) -> SimResult<()>;
    fn init_quality(&mut self) -> SimResult<()>;
    fn step_quality(&mut self) -> SimResult<u64>;
    fn advance_quality(&mut self) -> SimResult<u64>;
    fn close_quality(&mut self) -> SimResult<()>;

    /// Read one node's value for a property at the current step.
    fn node_value(&mut self, node: &str, property: NodeProperty) -> SimResult<f64>;

    /// Release all solver-held resources.
    fn close(&mut self) -> SimResult<()>;
}
