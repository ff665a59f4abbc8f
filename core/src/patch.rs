//! INP model-text patching. Pure text substitution, no hydraulics.
//!
//! Demand magnitudes come from per-cost consumption polynomials. The
//! coefficients are domain calibration constants; keep them unchanged.

use crate::error::{SimError, SimResult};
use std::collections::{BTreeMap, BTreeSet};

/// Served population behind each demand group.
pub const POPULATION_SIZE: f64 = 100.0;

/// Gallons/person/day at water cost `x`: `a*x^2 + b*x + c`.
#[derive(Debug, Clone, Copy)]
struct Consumption {
    a: f64,
    b: f64,
    c: f64,
}

impl Consumption {
    fn eval(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }
}

struct DemandGroup {
    nodes: &'static [&'static str],
    multipliers: &'static [f64],
    consumption: Consumption,
    /// Extra uplift applied to the whole group's base demand.
    extra: f64,
}

const DEMAND_GROUPS: [DemandGroup; 3] = [
    DemandGroup {
        nodes: &["J-1-37", "J-1-38", "J-1-58"],
        multipliers: &[1.10, 1.05, 1.00],
        consumption: Consumption { a: 0.0, b: -3.1057, c: 435.93 },
        extra: 1.05,
    },
    DemandGroup {
        nodes: &["J-5-15", "J-5-12", "J-5-13", "J-6"],
        multipliers: &[1.15, 1.10, 1.05, 1.00],
        consumption: Consumption { a: 0.0819, b: -8.701, c: 394.94 },
        extra: 1.0,
    },
    DemandGroup {
        nodes: &["J-6-65", "J-9-5", "J-8-8", "J-10-3"],
        multipliers: &[1.15, 1.10, 1.05, 1.00],
        consumption: Consumption { a: 0.1213, b: -10.659, c: 335.43 },
        extra: 1.0,
    },
];

/// Per-node demand (gpm) for a given water cost.
pub fn adjusted_demands(cost: f64) -> BTreeMap<String, f64> {
    let mut demands = BTreeMap::new();
    for group in &DEMAND_GROUPS {
        // GPD per person -> GPM for the served population.
        let base_gpm = group.consumption.eval(cost) * group.extra * POPULATION_SIZE / 1440.0;
        for (node, multiplier) in group.nodes.iter().zip(group.multipliers) {
            demands.insert((*node).to_string(), base_gpm * multiplier);
        }
    }
    demands
}

/// Rewrite the demand column of matching `[JUNCTIONS]` rows. Comment
/// and non-matching rows pass through untouched.
pub fn apply_demand_adjustments(inp: &str, cost: f64) -> SimResult<String> {
    let demands = adjusted_demands(cost);
    let mut in_junctions = false;
    let mut found_section = false;
    let mut out: Vec<String> = Vec::new();

    for line in inp.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_junctions = trimmed.eq_ignore_ascii_case("[JUNCTIONS]");
            found_section |= in_junctions;
            out.push(line.to_string());
            continue;
        }

        if in_junctions && !trimmed.is_empty() && !trimmed.starts_with(';') {
            let mut tokens: Vec<String> =
                trimmed.split_whitespace().map(str::to_string).collect();
            let demand = tokens.first().and_then(|id| demands.get(id)).copied();
            if let Some(demand) = demand {
                if tokens.len() < 3 {
                    tokens.resize(3, "0".to_string());
                }
                tokens[2] = format!("{demand:.2}");
                out.push(tokens.join("\t"));
                continue;
            }
        }

        out.push(line.to_string());
    }

    if !found_section {
        return Err(SimError::ModelPatch(
            "model has no [JUNCTIONS] section".to_string(),
        ));
    }
    Ok(out.join("\n"))
}

/// Guarantee every declared node has a `[QUALITY]` entry, so the
/// quality solve has a readable baseline for all monitored entities.
/// Uncovered nodes get a `0` entry; the section is appended when
/// missing entirely.
pub fn ensure_quality_entries(inp: &str) -> SimResult<String> {
    let mut declared = BTreeSet::new();
    for section in ["JUNCTIONS", "RESERVOIRS", "TANKS"] {
        declared.extend(section_node_ids(inp, section));
    }
    if declared.is_empty() {
        return Err(SimError::ModelPatch("model declares no nodes".to_string()));
    }

    let covered = section_node_ids(inp, "QUALITY");
    let missing: Vec<String> = declared.difference(&covered).cloned().collect();
    if missing.is_empty() {
        return Ok(inp.to_string());
    }

    let mut out: Vec<String> = inp.lines().map(str::to_string).collect();
    if let Some(header_idx) = out
        .iter()
        .position(|l| l.trim().eq_ignore_ascii_case("[QUALITY]"))
    {
        for (offset, node) in missing.iter().enumerate() {
            out.insert(header_idx + 1 + offset, format!("{node}\t0"));
        }
    } else {
        out.push("[QUALITY]".to_string());
        out.extend(missing.iter().map(|node| format!("{node}\t0")));
    }
    Ok(out.join("\n"))
}

/// First token of every data row in one section. Inline `;` comments
/// are stripped before tokenizing.
fn section_node_ids(inp: &str, section: &str) -> BTreeSet<String> {
    let header = format!("[{section}]");
    let mut ids = BTreeSet::new();
    let mut inside = false;

    for line in inp.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            inside = trimmed.eq_ignore_ascii_case(&header);
            continue;
        }
        if !inside {
            continue;
        }
        let data = trimmed.split(';').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }
        if let Some(id) = data.split_whitespace().next() {
            ids.insert(id.to_string());
        }
    }
    ids
}
