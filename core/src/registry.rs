//! Ownership and indexing of all accumulators/trackers for one run.
//!
//! RULES:
//!   - The (entity, quantity) universe is fixed at construction and
//!     rebuilt empty by reset(); prior-run data is discarded, never
//!     merged.
//!   - Unknown keys are reported to the caller, not swallowed; one
//!     bad key must not abort the run.

use crate::compliance::{ComplianceSnapshot, ComplianceTracker};
use crate::error::{SimError, SimResult};
use crate::network::NetworkConfig;
use crate::quantity::{Quantity, TANK_LEVEL_BAND};
use crate::stats::{StatAccumulator, StatSnapshot};
use crate::types::NodeId;
use std::collections::BTreeMap;

/// Owns one StatAccumulator per (entity, quantity) pair and one
/// ComplianceTracker per compliance-monitored pair.
#[derive(Debug)]
pub struct TrackingRegistry {
    junctions: Vec<NodeId>,
    tank_id: NodeId,
    stats: BTreeMap<Quantity, BTreeMap<NodeId, StatAccumulator>>,
    compliance: BTreeMap<Quantity, BTreeMap<NodeId, ComplianceTracker>>,
}

impl TrackingRegistry {
    pub fn new(network: &NetworkConfig) -> Self {
        let mut registry = Self {
            junctions: network.junctions.clone(),
            tank_id: network.tank_id.clone(),
            stats: BTreeMap::new(),
            compliance: BTreeMap::new(),
        };
        registry.reset();
        registry
    }

    /// Discard all prior-run state and rebuild the empty universe:
    /// every junction gets head/pressure/demand/quality accumulators
    /// plus pressure/quality trackers; the tank gets a level
    /// accumulator plus the tank-band tracker.
    pub fn reset(&mut self) {
        self.stats.clear();
        self.compliance.clear();

        for quantity in Quantity::JUNCTION_QUANTITIES {
            let mut per_node = BTreeMap::new();
            for node in &self.junctions {
                per_node.insert(node.clone(), StatAccumulator::new());
            }
            self.stats.insert(quantity, per_node);

            if let Some(band) = quantity.band() {
                let mut trackers = BTreeMap::new();
                for node in &self.junctions {
                    trackers.insert(node.clone(), ComplianceTracker::new(band));
                }
                self.compliance.insert(quantity, trackers);
            }
        }

        let mut tank_stats = BTreeMap::new();
        tank_stats.insert(self.tank_id.clone(), StatAccumulator::new());
        self.stats.insert(Quantity::TankLevel, tank_stats);

        let mut tank_tracker = BTreeMap::new();
        tank_tracker.insert(self.tank_id.clone(), ComplianceTracker::new(TANK_LEVEL_BAND));
        self.compliance.insert(Quantity::TankLevel, tank_tracker);
    }

    /// Route one value to the matching accumulator (always) and
    /// compliance tracker (only when that quantity is monitored for
    /// the entity). Unknown pairs return `TrackingKey` for the caller
    /// to log and continue.
    pub fn ingest(&mut self, entity: &str, quantity: Quantity, value: f64) -> SimResult<()> {
        let accumulator = self
            .stats
            .get_mut(&quantity)
            .and_then(|per_node| per_node.get_mut(entity));

        let Some(accumulator) = accumulator else {
            return Err(SimError::TrackingKey {
                entity: entity.to_string(),
                quantity: quantity.key().to_string(),
            });
        };
        accumulator.record(value);

        if let Some(tracker) = self
            .compliance
            .get_mut(&quantity)
            .and_then(|per_node| per_node.get_mut(entity))
        {
            tracker.record(value);
        }
        Ok(())
    }

    pub fn stats(&self, entity: &str, quantity: Quantity) -> Option<StatSnapshot> {
        self.stats
            .get(&quantity)?
            .get(entity)
            .map(StatAccumulator::snapshot)
    }

    /// Length of the observed series; the end-to-end contract is
    /// exactly one entry per simulated hour per applicable phase.
    pub fn series_len(&self, entity: &str, quantity: Quantity) -> Option<usize> {
        self.stats
            .get(&quantity)?
            .get(entity)
            .map(StatAccumulator::len)
    }

    /// The raw series in arrival order, for chart consumers.
    pub fn series(&self, entity: &str, quantity: Quantity) -> Option<&[f64]> {
        self.stats
            .get(&quantity)?
            .get(entity)
            .map(StatAccumulator::values)
    }

    pub fn compliance(&self, entity: &str, quantity: Quantity) -> Option<ComplianceSnapshot> {
        self.compliance
            .get(&quantity)?
            .get(entity)
            .map(ComplianceTracker::snapshot)
    }

    /// Entities tracked for a quantity, in stable order.
    pub fn entities(&self, quantity: Quantity) -> impl Iterator<Item = &NodeId> {
        self.stats
            .get(&quantity)
            .into_iter()
            .flat_map(|per_node| per_node.keys())
    }

    pub fn junctions(&self) -> &[NodeId] {
        &self.junctions
    }

    pub fn tank_id(&self) -> &str {
        &self.tank_id
    }
}
