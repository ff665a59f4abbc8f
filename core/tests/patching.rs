//! INP text patching: demand rewrites from the consumption curves and
//! quality-baseline completion.

use waterworks_core::patch::{adjusted_demands, apply_demand_adjustments, ensure_quality_entries};
use waterworks_core::SimError;

const SAMPLE_INP: &str = "\
[TITLE]
Martin County skeleton

[JUNCTIONS]
;ID    Elev    Demand
J-1-37\t980.0\t50
J-5-15\t975.5\t60\t;peak zone
J-99\t970.0\t10
J-6\t985.0

[RESERVOIRS]
R-1\t1050.0

[TANKS]
T-1\t1006.12\t55\t39\t73.88\t40

[PIPES]
P-1\tR-1\tJ-1-37\t1200\t12\t100
";

#[test]
fn demand_column_is_rewritten_from_the_consumption_curves() {
    let cost = 30.0;
    let expected = adjusted_demands(cost);
    let patched = apply_demand_adjustments(SAMPLE_INP, cost).unwrap();

    for node in ["J-1-37", "J-5-15", "J-6"] {
        let row = patched
            .lines()
            .find(|l| l.split_whitespace().next() == Some(node))
            .unwrap_or_else(|| panic!("{node} row missing"));
        let demand: f64 = row.split_whitespace().nth(2).unwrap().parse().unwrap();
        // Written with two decimals, so compare at that resolution.
        assert!(
            (demand - expected[node]).abs() < 0.005,
            "{node}: {demand} vs {}",
            expected[node]
        );
    }
}

#[test]
fn unmatched_rows_and_comments_pass_through_untouched() {
    let patched = apply_demand_adjustments(SAMPLE_INP, 30.0).unwrap();

    // J-99 is not a monitored demand node.
    assert!(patched.contains("J-99\t970.0\t10"));
    assert!(patched.contains(";ID    Elev    Demand"));
    // Other sections are untouched.
    assert!(patched.contains("T-1\t1006.12\t55\t39\t73.88\t40"));
    assert!(patched.contains("P-1\tR-1\tJ-1-37\t1200\t12\t100"));
}

#[test]
fn short_junction_rows_are_padded_before_the_demand_write() {
    // J-6 has no demand column in the source text.
    let patched = apply_demand_adjustments(SAMPLE_INP, 30.0).unwrap();
    let row = patched
        .lines()
        .find(|l| l.split_whitespace().next() == Some("J-6"))
        .unwrap();
    assert_eq!(row.split_whitespace().count(), 3);
}

#[test]
fn missing_junctions_section_is_a_patch_error() {
    let err = apply_demand_adjustments("[TITLE]\nempty model\n", 30.0);
    assert!(matches!(err, Err(SimError::ModelPatch(_))));
}

#[test]
fn consumption_curves_match_their_published_form() {
    let demands = adjusted_demands(30.0);

    // Group with the 1.05 uplift: (-3.1057*30 + 435.93) * 1.05 * 100/1440,
    // node multiplier 1.10.
    let base = (-3.1057 * 30.0 + 435.93) * 1.05 * 100.0 / 1440.0;
    assert!((demands["J-1-37"] - base * 1.10).abs() < 1e-9);

    // Quadratic group: 0.0819x^2 - 8.701x + 394.94, multiplier 1.15.
    let base = (0.0819 * 900.0 - 8.701 * 30.0 + 394.94) * 100.0 / 1440.0;
    assert!((demands["J-5-15"] - base * 1.15).abs() < 1e-9);

    // Every monitored demand node gets a value.
    assert_eq!(demands.len(), 11);
}

#[test]
fn quality_entries_are_added_for_every_declared_node() {
    let patched = ensure_quality_entries(SAMPLE_INP).unwrap();

    assert!(patched.contains("[QUALITY]"));
    for node in ["J-1-37", "J-5-15", "J-99", "J-6", "R-1", "T-1"] {
        assert!(
            patched.lines().any(|l| l == format!("{node}\t0")),
            "missing baseline for {node}"
        );
    }

    // Idempotent once complete.
    let again = ensure_quality_entries(&patched).unwrap();
    assert_eq!(patched, again);
}

#[test]
fn existing_quality_entries_are_preserved() {
    let inp = format!("{SAMPLE_INP}\n[QUALITY]\nJ-1-37\t0.8\n");
    let patched = ensure_quality_entries(&inp).unwrap();

    // The covered node keeps its value; only the gaps are filled.
    assert!(patched.contains("J-1-37\t0.8"));
    assert!(!patched.contains("J-1-37\t0\n"));
    assert!(patched.lines().any(|l| l == "T-1\t0"));
}

#[test]
fn model_without_nodes_is_a_patch_error() {
    let err = ensure_quality_entries("[TITLE]\nnothing declared\n");
    assert!(matches!(err, Err(SimError::ModelPatch(_))));
}
