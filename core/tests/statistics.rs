//! Statistical snapshot behavior: mean/median over the full sequence,
//! population (not sample) standard deviation, and empty-series zeros.

use waterworks_core::stats::{StatAccumulator, StatSnapshot};

fn accumulate(values: &[f64]) -> StatAccumulator {
    let mut acc = StatAccumulator::new();
    for &v in values {
        acc.record(v);
    }
    acc
}

#[test]
fn even_length_series_uses_population_std_dev() {
    let acc = accumulate(&[1.0, 2.0, 3.0, 4.0]);
    let snap = acc.snapshot();

    assert!((snap.mean - 2.5).abs() < 1e-12);
    // Even length: median is the mean of the two middle values.
    assert!((snap.median - 2.5).abs() < 1e-12);
    // Population variance 1.25, divisor n not n-1.
    assert!((snap.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
}

#[test]
fn odd_length_median_is_middle_of_sorted_values() {
    let acc = accumulate(&[5.0, 1.0, 3.0]);
    assert!((acc.snapshot().median - 3.0).abs() < 1e-12);
}

#[test]
fn empty_series_snapshots_to_zero() {
    let acc = StatAccumulator::new();
    assert!(acc.is_empty());
    assert_eq!(acc.snapshot(), StatSnapshot::ZERO);
}

#[test]
fn single_value_series() {
    let acc = accumulate(&[42.5]);
    let snap = acc.snapshot();
    assert!((snap.mean - 42.5).abs() < 1e-12);
    assert!((snap.median - 42.5).abs() < 1e-12);
    assert!(snap.std_dev.abs() < 1e-12);
}

#[test]
fn snapshot_is_repeatable_and_non_mutating() {
    let acc = accumulate(&[9.0, 7.0, 8.0]);
    let first = acc.snapshot();
    let second = acc.snapshot();
    assert_eq!(first, second);
    assert_eq!(acc.len(), 3);
    // Arrival order is preserved; snapshot sorting works on a copy.
    assert_eq!(acc.values(), &[9.0, 7.0, 8.0]);
}
