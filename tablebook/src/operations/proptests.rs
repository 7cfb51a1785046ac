//! Property-based tests for operations module.

use proptest::prelude::*;

use super::reports::{occupancy_rate, trend};
use super::search::matches_table;
use crate::floorplan::Zone;
use crate::table::{Table, TableId, TableShape, TableStatus};

fn table(number: u32, zone: Zone, description: Option<String>) -> Table {
    Table {
        id: TableId(1),
        number,
        capacity: 4,
        zone,
        shape: TableShape::Square,
        status: TableStatus::Available,
        position: None,
        description,
        created_at: crate::database::test_util::test_now(),
    }
}

fn zone_strategy() -> impl Strategy<Value = Zone> {
    prop::sample::select(Zone::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Occupancy is a percentage and never exceeds 100.
    #[test]
    fn occupancy_rate_is_bounded(total in 0u32..500, share in 0.0f64..=1.0) {
        let occupying = (f64::from(total) * share).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let occupying = occupying as u32;
        let rate = occupancy_rate(occupying, total);
        prop_assert!((0.0..=100.0).contains(&rate));
        if occupying == total && total > 0 {
            prop_assert!((rate - 100.0).abs() < f64::EPSILON);
        }
    }

    // The trend never points against the direction of change.
    #[test]
    fn trend_sign_follows_change(current in 0u32..10_000, previous in 0u32..10_000) {
        let t = trend(current, previous);
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => prop_assert!(t >= 0.0),
            std::cmp::Ordering::Equal => prop_assert!(t.abs() < f64::EPSILON),
            std::cmp::Ordering::Less => prop_assert!(t <= 0.0 && t >= -100.0),
        }
    }

    // Table search ignores case.
    #[test]
    fn table_search_is_case_insensitive(
        number in 1u32..1000,
        zone in zone_strategy(),
        description in prop::option::of("[a-zA-Z ]{1,20}"),
    ) {
        let t = table(number, zone, description.clone());
        prop_assert!(matches_table(&t, &number.to_string()));
        prop_assert!(matches_table(&t, &zone.as_str().to_lowercase()));
        if let Some(text) = description {
            prop_assert!(matches_table(&t, &text.to_lowercase()));
        }
    }
}
