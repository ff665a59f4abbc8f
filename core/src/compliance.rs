//! Threshold-compliance counting for one (entity, quantity) series.

use crate::quantity::ThresholdBand;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplianceSnapshot {
    /// Hours spent below the low threshold.
    pub low_count:  u64,
    /// Hours spent above the high threshold.
    pub high_count: u64,
    pub total_points: u64,
    pub in_compliance_pct:  f64,
    pub out_of_compliance_pct: f64,
}

/// Counts samples falling below/above a fixed band.
///
/// Boundary readings are compliant: the comparisons are strictly
/// `< low` and `> high`. Do not change them to inclusive bounds
/// without re-verifying the compliance-counting intent.
#[derive(Debug)]
pub struct ComplianceTracker {
    band: ThresholdBand,
    low_count:  u64,
    high_count: u64,
    total_points: u64,
}

impl ComplianceTracker {
    pub fn new(band: ThresholdBand) -> Self {
        Self {
            band,
            low_count:  0,
            high_count: 0,
            total_points: 0,
        }
    }

    pub fn band(&self) -> ThresholdBand {
        self.band
    }

    /// Count one reading. Low and high violations are mutually
    /// exclusive; a compliant reading only bumps the total.
    pub fn record(&mut self, value: f64) {
        self.total_points += 1;
        if value < self.band.low {
            self.low_count += 1;
        } else if value > self.band.high {
            self.high_count += 1;
        }
    }

    /// Percentages are 0.0/0.0 before the first sample arrives.
    pub fn snapshot(&self) -> ComplianceSnapshot {
        let violations = self.low_count + self.high_count;
        let (in_pct, out_pct) = if self.total_points == 0 {
            (0.0, 0.0)
        } else {
            let out = violations as f64 / self.total_points as f64 * 100.0;
            (100.0 - out, out)
        };
        ComplianceSnapshot {
            low_count:  self.low_count,
            high_count: self.high_count,
            total_points: self.total_points,
            in_compliance_pct:  in_pct,
            out_of_compliance_pct: out_pct,
        }
    }
}
