//! Shared primitive types used across the entire monitoring core.

/// A simulated hour. The standard run covers hours 0..=167 (one week).
pub type Hour = u32;

/// A stable, unique identifier for a monitored node (junction or tank).
pub type NodeId = String;

/// The canonical run identifier.
pub type RunId = String;
