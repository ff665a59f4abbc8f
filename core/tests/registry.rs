//! Registry universe shape, unknown-key rejection, and reset semantics.

use waterworks_core::{NetworkConfig, Quantity, SimError, TrackingRegistry};

#[test]
fn universe_covers_every_junction_quantity_and_the_tank() {
    let network = NetworkConfig::martin_county();
    let registry = TrackingRegistry::new(&network);

    for quantity in Quantity::JUNCTION_QUANTITIES {
        assert_eq!(
            registry.entities(quantity).count(),
            network.junctions.len(),
            "{quantity} should track every monitored junction"
        );
    }
    let tank_entities: Vec<_> = registry.entities(Quantity::TankLevel).collect();
    assert_eq!(tank_entities, vec!["T-1"]);

    // Empty at construction: zero-length series everywhere.
    assert_eq!(registry.series_len("J-6", Quantity::Pressure), Some(0));
    assert_eq!(registry.series_len("T-1", Quantity::TankLevel), Some(0));
}

#[test]
fn head_and_demand_carry_no_compliance_tracker() {
    let mut registry = TrackingRegistry::new(&NetworkConfig::martin_county());
    registry.ingest("J-6", Quantity::Head, 1040.0).unwrap();
    registry.ingest("J-6", Quantity::Demand, 120.0).unwrap();

    assert!(registry.compliance("J-6", Quantity::Head).is_none());
    assert!(registry.compliance("J-6", Quantity::Demand).is_none());
    // The accumulators still recorded.
    assert_eq!(registry.series_len("J-6", Quantity::Head), Some(1));
    assert_eq!(registry.series_len("J-6", Quantity::Demand), Some(1));
}

#[test]
fn unknown_pairs_are_rejected_with_tracking_key() {
    let mut registry = TrackingRegistry::new(&NetworkConfig::martin_county());

    // Unknown entity.
    let err = registry.ingest("J-99", Quantity::Pressure, 50.0);
    assert!(matches!(err, Err(SimError::TrackingKey { .. })));

    // Known entity, quantity not tracked for it: junctions never
    // report a tank level.
    let err = registry.ingest("J-6", Quantity::TankLevel, 50.0);
    assert!(matches!(err, Err(SimError::TrackingKey { .. })));

    // Tank reports only its level.
    let err = registry.ingest("T-1", Quantity::Pressure, 50.0);
    assert!(matches!(err, Err(SimError::TrackingKey { .. })));
}

#[test]
fn reset_discards_all_prior_data() {
    let mut registry = TrackingRegistry::new(&NetworkConfig::martin_county());
    registry.ingest("J-6", Quantity::Pressure, 15.0).unwrap();
    registry.ingest("T-1", Quantity::TankLevel, 55.0).unwrap();
    assert_eq!(registry.series_len("J-6", Quantity::Pressure), Some(1));

    registry.reset();

    assert_eq!(registry.series_len("J-6", Quantity::Pressure), Some(0));
    assert_eq!(registry.series_len("T-1", Quantity::TankLevel), Some(0));
    let compliance = registry.compliance("J-6", Quantity::Pressure).unwrap();
    assert_eq!(compliance.total_points, 0);
    assert_eq!(compliance.low_count, 0);
}
