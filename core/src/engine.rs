//! The run engine: drives the two-phase solver loop and feeds the
//! tracking registry.
//!
//! STATE MACHINE (fixed, documented):
//!   Idle -> Initializing -> HydraulicRunning -> QualityRunning -> Completed
//! with terminal Errored reachable from any non-terminal state, and a
//! distinct terminal Cancelled entered when a stop request is observed
//! at a step yield point.
//!
//! RULES:
//!   - Registry reset is the first action of every run; nothing
//!     survives from the previous run.
//!   - Exactly one sample is ever in flight; ingest is single-writer.
//!   - An in-flight sample always finishes forwarding before a stop
//!     request is honored.
//!   - Error and cancel paths release solver resources best-effort; a
//!     release failure never masks the original error.

use crate::error::{SimError, SimResult};
use crate::event::{EventSink, MonitorEvent};
use crate::ingest::SampleIngestor;
use crate::network::NetworkConfig;
use crate::patch;
use crate::registry::TrackingRegistry;
use crate::sample::{NodeReadings, Phase, Sample, TankReading};
use crate::solver::{NetworkSolver, NodeProperty};
use crate::types::{Hour, RunId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Simulated horizon: one week of hourly samples (hours 0..=167).
pub const SIMULATION_HOURS: Hour = 168;
pub const TOTAL_SIM_SECONDS: u64 = SIMULATION_HOURS as u64 * 3600;

/// A step landing within this many hours of an integer hour boundary
/// produces that hour's sample.
const HOUR_EPSILON: f64 = 0.01;

const INIT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base delay between solver-initialize retries; grows linearly
    /// per attempt.
    pub init_backoff: Duration,
    /// Cooperative pause between solver steps. Keeps a host UI
    /// responsive; zero in tests.
    pub step_pause: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            init_backoff: Duration::from_secs(1),
            step_pause: Duration::from_millis(10),
        }
    }
}

/// User-chosen parameters for one run. Domain enforcement (quality
/// 0-10 mg/L, positive cost) is the caller's job, not the core's.
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    /// Disinfectant concentration seeded at the source (mg/L).
    pub initial_quality: f64,
    /// Price per 4,000 gallons; drives the demand adjustment patch.
    pub water_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Initializing,
    HydraulicRunning,
    QualityRunning,
    Completed,
    Cancelled,
    Errored { message: String },
}

/// Cooperative stop request, observed at each step yield point.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

pub struct RunEngine {
    network: NetworkConfig,
    config: RunConfig,
    solver: Box<dyn NetworkSolver>,
    ingestor: SampleIngestor,
    sinks: Vec<Box<dyn EventSink>>,
    state: RunState,
    stop: StopHandle,
    run_id: RunId,
    last_percent: f64,
}

impl RunEngine {
    pub fn new(network: NetworkConfig, solver: Box<dyn NetworkSolver>, config: RunConfig) -> Self {
        let registry = TrackingRegistry::new(&network);
        Self {
            ingestor: SampleIngestor::new(registry),
            network,
            config,
            solver,
            sinks: Vec::new(),
            state: RunState::Idle,
            stop: StopHandle::default(),
            run_id: RunId::new(),
            last_percent: 0.0,
        }
    }

    /// Register a consumer. Sinks are called in subscription order for
    /// every event.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Tracking views for the current (or just-finished) run.
    pub fn registry(&self) -> &TrackingRegistry {
        self.ingestor.registry()
    }

    /// Drive one full two-phase run. Prior-run tracking state is
    /// discarded before the first sample is produced.
    pub fn run(&mut self, params: RunParams) -> SimResult<()> {
        self.run_id = format!("run-{}", uuid::Uuid::new_v4());
        self.state = RunState::Initializing;
        self.last_percent = 0.0;
        self.stop.clear();
        self.ingestor.reset();

        self.emit(MonitorEvent::RunStarted {
            run_id: self.run_id.clone(),
        });
        self.report_progress(0.0, Phase::Hydraulic);
        log::info!(
            "run {} started (quality={} mg/L, cost=${})",
            self.run_id,
            params.initial_quality,
            params.water_cost
        );

        match self.execute(params) {
            Ok(()) => {
                self.state = RunState::Completed;
                self.emit(MonitorEvent::RunCompleted {
                    run_id: self.run_id.clone(),
                });
                log::info!("run {} completed", self.run_id);
                Ok(())
            }
            Err(SimError::Cancelled) => {
                self.release_solver();
                self.state = RunState::Cancelled;
                self.emit(MonitorEvent::RunCancelled {
                    run_id: self.run_id.clone(),
                });
                log::info!("run {} cancelled", self.run_id);
                Err(SimError::Cancelled)
            }
            Err(e) => {
                self.release_solver();
                self.state = RunState::Errored {
                    message: e.to_string(),
                };
                self.emit(MonitorEvent::RunFailed {
                    run_id: self.run_id.clone(),
                    message: e.to_string(),
                });
                log::error!("run {} failed: {e}", self.run_id);
                Err(e)
            }
        }
    }

    fn execute(&mut self, params: RunParams) -> SimResult<()> {
        self.initialize_solver()?;

        if let Some(template) = self.network.model_template.clone() {
            let patched = patch::apply_demand_adjustments(&template, params.water_cost)?;
            let patched = patch::ensure_quality_entries(&patched)?;
            self.solver.load_model(&patched)?;
        }

        self.run_hydraulic_phase()?;

        self.solver.set_initial_quality(params.initial_quality)?;
        self.solver.save_hydraulics()?;

        self.run_quality_phase()?;

        self.solver.close()?;
        Ok(())
    }

    /// Initializing -> HydraulicRunning gate. Transient setup failures
    /// are retried with increasing backoff; exhaustion is fatal.
    fn initialize_solver(&mut self) -> SimResult<()> {
        let mut last_error = None;
        for attempt in 1..=INIT_MAX_ATTEMPTS {
            if attempt > 1 {
                thread::sleep(self.config.init_backoff * (attempt - 1));
            }
            match self.solver.initialize() {
                Ok(()) => {
                    last_error = None;
                    break;
                }
                Err(e) => {
                    log::warn!(
                        "solver initialization attempt {attempt}/{INIT_MAX_ATTEMPTS} failed: {e}"
                    );
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            None => Ok(()),
            Some(e) => Err(SimError::EngineInit {
                attempts: INIT_MAX_ATTEMPTS,
                message: e.to_string(),
            }),
        }
    }

    fn run_hydraulic_phase(&mut self) -> SimResult<()> {
        self.state = RunState::HydraulicRunning;
        log::debug!("hydraulic phase started");
        self.solver.open_hydraulics()?;
        self.solver.init_hydraulics()?;

        let mut last_collected: Option<Hour> = None;
        loop {
            let elapsed = self.solver.step_hydraulics()?;
            let raw = (elapsed as f64 / TOTAL_SIM_SECONDS as f64 * 50.0).min(50.0);
            self.report_progress(raw, Phase::Hydraulic);

            if let Some(hour) = hour_boundary(elapsed, &mut last_collected) {
                let sample = self.collect_hydraulic_sample(hour);
                self.forward(sample);
            }

            let step = self.solver.advance_hydraulics()?;
            if self.stop.is_stop_requested() {
                return Err(SimError::Cancelled);
            }
            if step == 0 {
                break;
            }
            self.pause();
        }

        self.solver.close_hydraulics()?;
        self.report_progress(50.0, Phase::Hydraulic);
        self.emit(MonitorEvent::PhaseCompleted {
            phase: Phase::Hydraulic,
        });
        log::debug!("hydraulic phase completed");
        Ok(())
    }

    fn run_quality_phase(&mut self) -> SimResult<()> {
        self.state = RunState::QualityRunning;
        log::debug!("quality phase started");
        self.solver.open_quality()?;
        self.solver.init_quality()?;

        let mut last_collected: Option<Hour> = None;
        loop {
            let elapsed = self.solver.step_quality()?;
            let raw = (50.0 + elapsed as f64 / TOTAL_SIM_SECONDS as f64 * 50.0).min(100.0);
            self.report_progress(raw, Phase::Quality);

            if let Some(hour) = hour_boundary(elapsed, &mut last_collected) {
                let sample = self.collect_quality_sample(hour);
                self.forward(sample);
            }

            let step = self.solver.advance_quality()?;
            if self.stop.is_stop_requested() {
                return Err(SimError::Cancelled);
            }
            if step == 0 {
                break;
            }
            self.pause();
        }

        self.solver.close_quality()?;
        self.report_progress(100.0, Phase::Quality);
        self.emit(MonitorEvent::PhaseCompleted {
            phase: Phase::Quality,
        });
        log::debug!("quality phase completed");
        Ok(())
    }

    fn collect_hydraulic_sample(&mut self, hour: Hour) -> Sample {
        let mut sample = Sample::new(hour, Phase::Hydraulic);

        for node in &self.network.junctions {
            let readings = NodeReadings {
                head: read_or_log(self.solver.as_mut(), node, NodeProperty::Head, hour),
                pressure: read_or_log(self.solver.as_mut(), node, NodeProperty::Pressure, hour),
                demand: read_or_log(self.solver.as_mut(), node, NodeProperty::Demand, hour),
                quality: None,
            };
            sample.nodes.insert(node.clone(), readings);
        }

        // Tank level is derived from head; the offset is the tank floor.
        let tank_head = read_or_log(
            self.solver.as_mut(),
            &self.network.tank_id,
            NodeProperty::Head,
            hour,
        );
        if let Some(head) = tank_head {
            sample.tank.insert(
                self.network.tank_id.clone(),
                TankReading {
                    level: head - self.network.tank_base_elevation,
                },
            );
        }

        sample
    }

    fn collect_quality_sample(&mut self, hour: Hour) -> Sample {
        let mut sample = Sample::new(hour, Phase::Quality);
        for node in &self.network.junctions {
            let readings = NodeReadings {
                quality: read_or_log(self.solver.as_mut(), node, NodeProperty::Quality, hour),
                ..NodeReadings::default()
            };
            sample.nodes.insert(node.clone(), readings);
        }
        sample
    }

    /// Exactly-once forwarding: every collected sample is ingested
    /// once, and the touched views are published for incremental
    /// consumers.
    fn forward(&mut self, sample: Sample) {
        let time = sample.time;
        let phase = sample.phase;
        let touched = self.ingestor.ingest(&sample);
        self.emit(MonitorEvent::SampleIngested {
            time,
            phase,
            touched,
        });
    }

    /// Monotone within a phase; reset only at run start.
    fn report_progress(&mut self, raw: f64, phase: Phase) {
        let percent = raw.max(self.last_percent);
        self.last_percent = percent;
        self.emit(MonitorEvent::ProgressUpdated { percent, phase });
    }

    fn pause(&self) {
        if !self.config.step_pause.is_zero() {
            thread::sleep(self.config.step_pause);
        }
    }

    /// Best-effort teardown on the error/cancel path. Failures here
    /// are logged only, so the original error stays visible.
    fn release_solver(&mut self) {
        if let Err(e) = self.solver.close_quality() {
            log::debug!("release of quality solve failed: {e}");
        }
        if let Err(e) = self.solver.close_hydraulics() {
            log::debug!("release of hydraulic solve failed: {e}");
        }
        if let Err(e) = self.solver.close() {
            log::debug!("release of solver failed: {e}");
        }
    }

    fn emit(&mut self, event: MonitorEvent) {
        for sink in &mut self.sinks {
            sink.on_event(&event);
        }
    }
}

/// Some(hour) when `elapsed` lands within 0.01 h of an integer hour
/// not yet collected. The guard keeps ingestion exactly-once even if
/// two solver steps straddle the same boundary.
fn hour_boundary(elapsed: u64, last_collected: &mut Option<Hour>) -> Option<Hour> {
    let hours = elapsed as f64 / 3600.0;
    if (hours - hours.round()).abs() >= HOUR_EPSILON {
        return None;
    }
    let hour = hours.round() as Hour;
    if *last_collected == Some(hour) {
        return None;
    }
    *last_collected = Some(hour);
    Some(hour)
}

/// Per-entity reads are recovered failures: log and leave the field
/// missing so the series shows a gap instead of aborting the sample.
fn read_or_log(
    solver: &mut dyn NetworkSolver,
    node: &str,
    property: NodeProperty,
    hour: Hour,
) -> Option<f64> {
    match solver.node_value(node, property) {
        Ok(value) => Some(value),
        Err(e) => {
            let err = SimError::EntityRead {
                entity: node.to_string(),
                quantity: property.name().to_string(),
                message: e.to_string(),
            };
            log::warn!("hour={hour}: {err}");
            None
        }
    }
}
