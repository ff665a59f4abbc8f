//! Fan-out of inbound samples into the tracking registry.

use crate::quantity::Quantity;
use crate::registry::TrackingRegistry;
use crate::sample::{Phase, Sample};
use crate::types::NodeId;

/// Receives one sample per simulated hour per phase and routes every
/// reading present in it to the matching accumulator/tracker.
///
/// Not idempotent: re-ingesting a sample double-counts. The engine
/// guarantees each produced sample is forwarded exactly once.
#[derive(Debug)]
pub struct SampleIngestor {
    registry: TrackingRegistry,
}

impl SampleIngestor {
    pub fn new(registry: TrackingRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TrackingRegistry {
        &self.registry
    }

    /// Discard all tracking state at the start of a new run.
    pub fn reset(&mut self) {
        self.registry.reset();
    }

    /// Forward every reading present in the sample. Returns the exact
    /// (entity, quantity) pairs updated, so consumers can refresh
    /// incrementally instead of rescanning all entities.
    pub fn ingest(&mut self, sample: &Sample) -> Vec<(NodeId, Quantity)> {
        let mut touched = Vec::new();

        match sample.phase {
            Phase::Hydraulic => {
                for (node, readings) in &sample.nodes {
                    let fields = [
                        (Quantity::Head, readings.head),
                        (Quantity::Pressure, readings.pressure),
                        (Quantity::Demand, readings.demand),
                    ];
                    for (quantity, value) in fields {
                        if let Some(value) = value {
                            self.route(node, quantity, value, &mut touched);
                        }
                    }
                }
                for (tank, reading) in &sample.tank {
                    self.route(tank, Quantity::TankLevel, reading.level, &mut touched);
                }
            }
            Phase::Quality => {
                for (node, readings) in &sample.nodes {
                    if let Some(value) = readings.quality {
                        self.route(node, Quantity::Quality, value, &mut touched);
                    }
                }
            }
        }

        touched
    }

    fn route(
        &mut self,
        entity: &str,
        quantity: Quantity,
        value: f64,
        touched: &mut Vec<(NodeId, Quantity)>,
    ) {
        match self.registry.ingest(entity, quantity, value) {
            Ok(()) => touched.push((entity.to_string(), quantity)),
            // Recovered: one bad key must not abort the run.
            Err(e) => log::warn!("dropped reading {quantity}={value} for '{entity}': {e}"),
        }
    }
}
