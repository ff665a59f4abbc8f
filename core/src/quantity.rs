//! Measured quantities, their units, and their regulatory bands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The [low, high] range within which a reading is considered acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub low:  f64,
    pub high: f64,
}

/// Regulatory pressure band (psi).
pub const PRESSURE_BAND: ThresholdBand = ThresholdBand { low: 20.0, high: 150.0 };
/// EPA disinfectant residual band (mg/L).
pub const QUALITY_BAND: ThresholdBand = ThresholdBand { low: 0.2, high: 4.0 };
/// Operational tank level band (ft above the tank floor).
pub const TANK_LEVEL_BAND: ThresholdBand = ThresholdBand { low: 39.0, high: 73.88 };

/// A measured variable. Junctions report head/pressure/demand/quality;
/// the tank reports its water level, keyed internally as `tank`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Head,
    Pressure,
    Demand,
    Quality,
    #[serde(rename = "tank")]
    TankLevel,
}

impl Quantity {
    /// Quantities tracked for every monitored junction.
    pub const JUNCTION_QUANTITIES: [Quantity; 4] = [
        Quantity::Head,
        Quantity::Pressure,
        Quantity::Demand,
        Quantity::Quality,
    ];

    /// Every quantity, in dashboard tab order.
    pub const ALL: [Quantity; 5] = [
        Quantity::Head,
        Quantity::Pressure,
        Quantity::Demand,
        Quantity::Quality,
        Quantity::TankLevel,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Quantity::Head      => "head",
            Quantity::Pressure  => "pressure",
            Quantity::Demand    => "demand",
            Quantity::Quality   => "quality",
            Quantity::TankLevel => "tank",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::Head      => "ft",
            Quantity::Pressure  => "psi",
            Quantity::Demand    => "gpm",
            Quantity::Quality   => "mg/L",
            Quantity::TankLevel => "ft",
        }
    }

    /// Decimal places used when displaying values of this quantity.
    pub fn display_decimals(&self) -> usize {
        match self {
            Quantity::Demand | Quantity::Quality => 3,
            _ => 2,
        }
    }

    /// The compliance band, if this quantity is compliance-monitored.
    /// Head and demand have no band.
    pub fn band(&self) -> Option<ThresholdBand> {
        match self {
            Quantity::Pressure  => Some(PRESSURE_BAND),
            Quantity::Quality   => Some(QUALITY_BAND),
            Quantity::TankLevel => Some(TANK_LEVEL_BAND),
            Quantity::Head | Quantity::Demand => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
