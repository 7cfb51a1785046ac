//! Property-based tests for slot generation.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

use super::{hours_for, FixedClock, SlotGenerator, SlotTime, CLOSING_BUFFER_MINUTES};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Every slot starts at least an hour before closing and on the half-hour grid.
    #[test]
    fn slots_respect_close_buffer_and_grid(day_offset in 0i64..365) {
        let date = base_date() + Duration::days(day_offset);
        let now = base_date().and_hms_opt(0, 0, 0).unwrap() - Duration::days(1);
        let generator = SlotGenerator::new(FixedClock::new(now));
        let hours = hours_for(date.weekday());

        for slot in generator.slots_for(date) {
            prop_assert!(slot.minutes() + CLOSING_BUFFER_MINUTES <= hours.close_minutes);
            prop_assert!(slot >= hours.open);
            prop_assert_eq!((slot.minutes() - hours.open.minutes()) % 30, 0);
        }
    }

    // Slots are strictly ascending.
    #[test]
    fn slots_strictly_ascending(day_offset in 0i64..365) {
        let date = base_date() + Duration::days(day_offset);
        let now = base_date().and_hms_opt(0, 0, 0).unwrap();
        let generator = SlotGenerator::new(FixedClock::new(now));
        let slots: Vec<SlotTime> = generator.slots_for(date).collect();
        for pair in slots.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    // For today, every emitted slot is strictly after now, and nothing later is lost.
    #[test]
    fn today_slots_are_the_future_suffix(day_offset in 0i64..14, minute_of_day in 0u32..1440) {
        let date = base_date() + Duration::days(day_offset);
        let now = date.and_hms_opt(minute_of_day / 60, minute_of_day % 60, 0).unwrap();
        let today = SlotGenerator::new(FixedClock::new(now));
        let earlier = SlotGenerator::new(FixedClock::new(now - Duration::days(1)));

        let expected: Vec<SlotTime> = earlier
            .slots_for(date)
            .filter(|s| u32::from(s.minutes()) > minute_of_day)
            .collect();
        let actual: Vec<SlotTime> = today.slots_for(date).collect();
        prop_assert_eq!(actual, expected);
    }

    // Any HH:MM time survives display and parse.
    #[test]
    fn slot_time_text_roundtrip(minutes in 0u16..1440) {
        let time = SlotTime::try_from(minutes).unwrap();
        prop_assert_eq!(time.to_string().parse::<SlotTime>().unwrap(), time);
        prop_assert_eq!(time.display_12h().parse::<SlotTime>().unwrap(), time);
    }
}
