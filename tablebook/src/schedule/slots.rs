//! Bookable slot generation.

use chrono::{Datelike, NaiveDate, Timelike};

use super::{hours_for, Clock, SlotTime, SystemClock, MINUTES_PER_DAY};

/// Spacing between consecutive slots.
pub const SLOT_INTERVAL_MINUTES: u16 = 30;

/// No slot may start less than this many minutes before closing.
pub const CLOSING_BUFFER_MINUTES: u16 = 60;

/// Generates bookable slots for calendar dates.
///
/// A slot is bookable when it lies on the 30-minute grid starting at opening
/// time, starts at least an hour before closing, falls on the requested
/// calendar date (late-night Saturday service belongs to Sunday's date), and
/// for today, starts strictly after the current time. Dates before today
/// have no slots.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tablebook::{FixedClock, SlotGenerator};
///
/// let now = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let generator = SlotGenerator::new(FixedClock::new(now));
///
/// // 2025-06-08 is a Sunday: 11:30 through 20:00.
/// let sunday = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
/// let slots: Vec<String> = generator.slots_for(sunday).map(|s| s.to_string()).collect();
/// assert_eq!(slots.first().unwrap(), "11:30");
/// assert_eq!(slots.last().unwrap(), "20:00");
/// assert_eq!(slots.len(), 18);
/// ```
#[derive(Debug, Clone)]
pub struct SlotGenerator<C = SystemClock> {
    clock: C,
}

impl Default for SlotGenerator<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> SlotGenerator<C> {
    /// Creates a generator that reads "now" from `clock`.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Returns the clock this generator consults.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the bookable slots for `date` in ascending order.
    ///
    /// The returned iterator is finite and can be cloned to restart it. An
    /// empty sequence means no times are available and is not an error.
    #[must_use]
    pub fn slots_for(&self, date: NaiveDate) -> Slots {
        let hours = hours_for(date.weekday());
        let last_start = hours.close_minutes.saturating_sub(CLOSING_BUFFER_MINUTES);
        let end = last_start.saturating_add(1).min(MINUTES_PER_DAY);
        let mut slots = Slots {
            next: hours.open.minutes(),
            end,
        };

        let now = self.clock.now();
        if date < now.date() {
            slots.next = end;
        } else if date == now.date() {
            let now_secs = now.num_seconds_from_midnight();
            while slots.next < end && u32::from(slots.next) * 60 <= now_secs {
                slots.next += SLOT_INTERVAL_MINUTES;
            }
        }

        log::debug!(
            "slots for {date} ({}): {} candidate(s)",
            date.weekday(),
            slots.clone().count()
        );
        slots
    }

    /// Returns `true` if `time` is one of the bookable slots for `date`.
    #[must_use]
    pub fn is_bookable(&self, date: NaiveDate, time: SlotTime) -> bool {
        self.slots_for(date).any(|slot| slot == time)
    }
}

/// Iterator over the bookable slots of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots {
    next: u16,
    end: u16,
}

impl Iterator for Slots {
    type Item = SlotTime;

    fn next(&mut self) -> Option<SlotTime> {
        if self.next >= self.end {
            return None;
        }
        let slot = SlotTime(self.next);
        self.next += SLOT_INTERVAL_MINUTES;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.end {
            0
        } else {
            usize::from((self.end - self.next).div_ceil(SLOT_INTERVAL_MINUTES))
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Slots {}

impl std::iter::FusedIterator for Slots {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generator_at(now: (i32, u32, u32, u32, u32)) -> SlotGenerator<FixedClock> {
        let (y, mo, d, h, mi) = now;
        let now = date(y, mo, d).and_hms_opt(h, mi, 0).unwrap();
        SlotGenerator::new(FixedClock::new(now))
    }

    fn strings(slots: Slots) -> Vec<String> {
        slots.map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weekday_slots_respect_close_buffer() {
        let generator = generator_at((2025, 6, 1, 8, 0));
        // 2025-06-10 is a Tuesday.
        let slots = strings(generator.slots_for(date(2025, 6, 10)));
        assert_eq!(slots.first().unwrap(), "05:00");
        assert_eq!(slots.last().unwrap(), "22:00");
        assert!(!slots.contains(&"22:30".to_string()));
        assert_eq!(slots.len(), 35);
    }

    #[test]
    fn test_sunday_slots() {
        let generator = generator_at((2025, 6, 1, 8, 0));
        let slots = strings(generator.slots_for(date(2025, 6, 8)));
        assert_eq!(slots.first().unwrap(), "11:30");
        assert_eq!(slots.last().unwrap(), "20:00");
        assert!(!slots.contains(&"20:30".to_string()));
    }

    #[test]
    fn test_saturday_stops_at_midnight() {
        let generator = generator_at((2025, 6, 1, 8, 0));
        // 2025-06-14 is a Saturday.
        let slots = strings(generator.slots_for(date(2025, 6, 14)));
        assert_eq!(slots.first().unwrap(), "05:00");
        assert_eq!(slots.last().unwrap(), "23:30");
        assert_eq!(slots.len(), 38);
    }

    #[test]
    fn test_today_excludes_past_and_current_slots() {
        let generator = generator_at((2025, 6, 10, 17, 45));
        let slots = strings(generator.slots_for(date(2025, 6, 10)));
        assert_eq!(slots.first().unwrap(), "18:00");
        assert!(!slots.contains(&"17:30".to_string()));

        let on_the_dot = generator_at((2025, 6, 10, 18, 0));
        let slots = strings(on_the_dot.slots_for(date(2025, 6, 10)));
        assert_eq!(slots.first().unwrap(), "18:30");
    }

    #[test]
    fn test_today_after_last_slot_is_empty() {
        let generator = generator_at((2025, 6, 10, 22, 15));
        assert_eq!(generator.slots_for(date(2025, 6, 10)).count(), 0);
    }

    #[test]
    fn test_past_date_has_no_slots() {
        let generator = generator_at((2025, 6, 10, 8, 0));
        assert_eq!(generator.slots_for(date(2025, 6, 9)).count(), 0);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let generator = generator_at((2025, 6, 1, 8, 0));
        let slots = generator.slots_for(date(2025, 6, 10));
        let first_pass: Vec<_> = slots.clone().collect();
        let second_pass: Vec<_> = slots.collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_size_hint_matches_count() {
        let generator = generator_at((2025, 6, 10, 12, 10));
        let slots = generator.slots_for(date(2025, 6, 10));
        assert_eq!(slots.len(), slots.clone().count());
    }

    #[test]
    fn test_is_bookable() {
        let generator = generator_at((2025, 6, 1, 8, 0));
        let tuesday = date(2025, 6, 10);
        assert!(generator.is_bookable(tuesday, "18:00".parse().unwrap()));
        assert!(!generator.is_bookable(tuesday, "18:15".parse().unwrap()));
        assert!(!generator.is_bookable(tuesday, "22:30".parse().unwrap()));
        assert!(!generator.is_bookable(tuesday, "04:30".parse().unwrap()));
    }
}
