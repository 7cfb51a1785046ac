//! Property-based tests for zone mapping and default placement.

use proptest::prelude::*;

use super::{default_position, zone_for, Position, Zone, CANVAS_HEIGHT, CANVAS_WIDTH};

fn any_zone() -> impl Strategy<Value = Zone> {
    prop::sample::select(Zone::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        .. ProptestConfig::default()
    })]

    // A point inside a zone's rectangle maps to that zone unless an earlier
    // zone in priority order also contains it.
    #[test]
    fn zone_for_respects_priority(x in 0.0f64..=CANVAS_WIDTH, y in 0.0f64..=CANVAS_HEIGHT) {
        let position = Position::new(x, y);
        let zone = zone_for(position);
        let first_containing = Zone::ALL.into_iter().find(|z| z.rect().contains(position));
        prop_assert_eq!(zone, first_containing.unwrap_or(Zone::Center));
    }

    // Off-canvas points always fall back to CENTER.
    #[test]
    fn zone_for_off_canvas_is_center(x in 841.0f64..5000.0, y in -5000.0f64..5000.0) {
        prop_assert_eq!(zone_for(Position::new(x, y)), Zone::Center);
    }

    // The first rows of the default grid stay inside the zone they were laid out for.
    #[test]
    fn default_position_first_rows_stay_in_zone(zone in any_zone(), index in 0usize..6) {
        let position = default_position(zone, index);
        prop_assert!(position.is_on_canvas());
        prop_assert_eq!(zone_for(position), zone);
    }
}
