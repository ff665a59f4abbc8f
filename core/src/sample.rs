//! Sample events: one timestamped multi-entity reading batch per phase.

use crate::types::{Hour, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The hydraulic sub-run supplies head/pressure/demand/tank-level;
/// the quality sub-run supplies disinfectant concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Hydraulic,
    Quality,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Hydraulic => "hydraulic",
            Phase::Quality   => "quality",
        })
    }
}

/// Per-junction readings. Fields the collector failed to read stay
/// `None`; the sample still forwards and the series shows a gap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeReadings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TankReading {
    pub level: f64,
}

/// One sample per simulated hour per phase. Samples arrive in strictly
/// increasing `time` order and must be ingested exactly once;
/// re-ingesting double-counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub time: Hour,
    #[serde(rename = "type")]
    pub phase: Phase,
    pub nodes: BTreeMap<NodeId, NodeReadings>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tank: BTreeMap<NodeId, TankReading>,
}

impl Sample {
    pub fn new(time: Hour, phase: Phase) -> Self {
        Self {
            time,
            phase,
            nodes: BTreeMap::new(),
            tank: BTreeMap::new(),
        }
    }
}
