//! A deterministic stand-in solver producing smooth diurnal waveforms.
//!
//! Used by the headless runner and the end-to-end tests. Not a
//! hydraulic model; values are plausible, not physical. Hour-boundary
//! steps line up with the engine's collection window so a full run
//! yields exactly one sample per hour per phase.

use crate::error::{SimError, SimResult};
use crate::network::NetworkConfig;
use crate::solver::{NetworkSolver, NodeProperty};
use std::f64::consts::TAU;

const DEFAULT_STEP_SECONDS: u64 = 1800;

pub struct SyntheticSolver {
    tank_id: String,
    tank_base_elevation: f64,
    horizon_seconds: u64,
    step_seconds: u64,
    elapsed: u64,
    source_quality: f64,
    init_failures_left: u32,
}

impl SyntheticSolver {
    pub fn new(network: &NetworkConfig) -> Self {
        Self {
            tank_id: network.tank_id.clone(),
            tank_base_elevation: network.tank_base_elevation,
            horizon_seconds: crate::engine::TOTAL_SIM_SECONDS,
            step_seconds: DEFAULT_STEP_SECONDS,
            elapsed: 0,
            source_quality: 0.0,
            init_failures_left: 0,
        }
    }

    /// Fail the first `n` initialize calls. Exercises the engine's
    /// retry/backoff path.
    pub fn with_init_failures(mut self, n: u32) -> Self {
        self.init_failures_left = n;
        self
    }

    /// Override the internal step length (seconds).
    pub fn with_step_seconds(mut self, step_seconds: u64) -> Self {
        self.step_seconds = step_seconds.max(1);
        self
    }

    fn hour(&self) -> f64 {
        self.elapsed as f64 / 3600.0
    }

    /// Stable per-node phase offset so series differ between nodes.
    fn node_offset(node: &str) -> f64 {
        (node.bytes().map(u64::from).sum::<u64>() % 24) as f64
    }

    fn advance(&mut self) -> u64 {
        if self.elapsed + self.step_seconds >= self.horizon_seconds {
            0
        } else {
            self.elapsed += self.step_seconds;
            self.step_seconds
        }
    }
}

impl NetworkSolver for SyntheticSolver {
    fn initialize(&mut self) -> SimResult<()> {
        if self.init_failures_left > 0 {
            self.init_failures_left -= 1;
            return Err(SimError::Solver("synthetic workspace unavailable".into()));
        }
        Ok(())
    }

    fn load_model(&mut self, _model_text: &str) -> SimResult<()> {
        Ok(())
    }

    fn open_hydraulics(&mut self) -> SimResult<()> {
        self.elapsed = 0;
        Ok(())
    }

    fn init_hydraulics(&mut self) -> SimResult<()> {
        Ok(())
    }

    fn step_hydraulics(&mut self) -> SimResult<u64> {
        Ok(self.elapsed)
    }

    fn advance_hydraulics(&mut self) -> SimResult<u64> {
        Ok(self.advance())
    }

    fn save_hydraulics(&mut self) -> SimResult<()> {
        Ok(())
    }

    fn close_hydraulics(&mut self) -> SimResult<()> {
        Ok(())
    }

    fn set_initial_quality(&mut self, source_quality: f64) -> SimResult<()> {
        self.source_quality = source_quality;
        Ok(())
    }

    fn open_quality(&mut self) -> SimResult<()> {
        self.elapsed = 0;
        Ok(())
    }

    fn init_quality(&mut self) -> SimResult<()> {
        Ok(())
    }

    fn step_quality(&mut self) -> SimResult<u64> {
        Ok(self.elapsed)
    }

    fn advance_quality(&mut self) -> SimResult<u64> {
        Ok(self.advance())
    }

    fn close_quality(&mut self) -> SimResult<()> {
        Ok(())
    }

    fn node_value(&mut self, node: &str, property: NodeProperty) -> SimResult<f64> {
        let hour = self.hour();
        if node == self.tank_id {
            // Only head is meaningful for the tank; level is derived
            // by the collector.
            let head = self.tank_base_elevation + 55.0 + 9.0 * (TAU * hour / 24.0).sin();
            return Ok(head);
        }

        let wave = (TAU * (hour + Self::node_offset(node)) / 24.0).sin();
        let value = match property {
            NodeProperty::Head     => 1042.0 + 11.0 * wave,
            NodeProperty::Pressure => 63.0 + 21.0 * wave,
            NodeProperty::Demand   => (155.0 + 48.0 * wave).max(0.0),
            NodeProperty::Quality  => (self.source_quality * (0.65 + 0.3 * wave)).max(0.0),
        };
        Ok(value)
    }

    fn close(&mut self) -> SimResult<()> {
        Ok(())
    }
}
