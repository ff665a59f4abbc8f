//! Online descriptive statistics for one (entity, quantity) series.

use serde::Serialize;

/// Mean, median, and population standard deviation over everything
/// recorded so far. All zero when nothing has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSnapshot {
    pub mean:    f64,
    pub median:  f64,
    pub std_dev: f64,
}

impl StatSnapshot {
    pub const ZERO: StatSnapshot = StatSnapshot {
        mean:    0.0,
        median:  0.0,
        std_dev: 0.0,
    };
}

/// Accumulates every value observed for one series.
///
/// The sequence only grows: exactly one append per ingested sample,
/// never reordered or truncated mid-run. A new run rebuilds the
/// accumulator from scratch.
#[derive(Debug, Default)]
pub struct StatAccumulator {
    values: Vec<f64>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append one observed value. NaN/Infinity pass through untouched;
    /// producers are expected not to emit them.
    pub fn record(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw series in arrival order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Compute the snapshot over the full sequence collected so far.
    /// Non-mutating and repeatable; reflects every `record` call made
    /// before it, in order.
    pub fn snapshot(&self) -> StatSnapshot {
        if self.values.is_empty() {
            return StatSnapshot::ZERO;
        }

        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;

        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        // Population variance: the divisor is the count, not count - 1.
        let variance = self
            .values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        StatSnapshot {
            mean,
            median,
            std_dev: variance.sqrt(),
        }
    }
}
