//! The monitored-network description: which nodes feed the registry.

use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Height of the tank floor above the model datum (ft). Tank level
/// readings are `tank head - base elevation`.
pub const TANK_BASE_ELEVATION_FT: f64 = 1006.12;

/// The set of monitored entities, fixed for the lifetime of a run and
/// known before the run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Junctions whose head/pressure/demand/quality are tracked.
    pub junctions: Vec<NodeId>,
    /// The single monitored storage tank.
    pub tank_id: NodeId,
    /// Subtracted from tank head to obtain the level series.
    pub tank_base_elevation: f64,
    /// INP model text handed to the solver after patching, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_template: Option<String>,
}

impl NetworkConfig {
    /// The Martin County network monitored by the dashboard.
    pub fn martin_county() -> Self {
        Self {
            junctions: [
                "J-1-37", "J-1-38", "J-1-58",
                "J-5-15", "J-5-12", "J-5-13",
                "J-6", "J-6-65", "J-9-5",
                "J-8-8", "J-10-3",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            tank_id: "T-1".to_string(),
            tank_base_elevation: TANK_BASE_ELEVATION_FT,
            model_template: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::martin_county()
    }
}
