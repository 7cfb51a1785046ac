//! Source of "now" for rules that depend on the current wall-clock time.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Provides the current local date and time.
///
/// Production code uses [`SystemClock`]; tests pin the time with
/// [`FixedClock`] so "today" rules are deterministic.
pub trait Clock {
    /// The current naive local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Today's calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a given instant.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tablebook::{Clock, FixedClock};
///
/// let now = NaiveDate::from_ymd_opt(2025, 6, 10)
///     .unwrap()
///     .and_hms_opt(17, 45, 0)
///     .unwrap();
/// let clock = FixedClock::new(now);
/// assert_eq!(clock.today(), now.date());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    /// Creates a clock that always reports `now`.
    #[must_use]
    pub const fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
