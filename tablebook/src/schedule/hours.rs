//! The restaurant's fixed weekly opening hours.

use chrono::Weekday;
use serde::Serialize;

use super::SlotTime;

/// Opening window for one weekday.
///
/// `close_minutes` counts minutes since the opening day's midnight and may
/// exceed 1440 when service runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingHours {
    /// Opening time.
    pub open: SlotTime,
    /// Closing time in minutes since midnight of the opening day.
    pub close_minutes: u16,
}

impl OperatingHours {
    const fn new(open_minutes: u16, close_minutes: u16) -> Self {
        Self {
            open: SlotTime(open_minutes),
            close_minutes,
        }
    }

    /// Returns `true` if the window closes after midnight.
    #[must_use]
    pub const fn closes_next_day(&self) -> bool {
        self.close_minutes > super::MINUTES_PER_DAY
    }

    /// Closing time as a wall-clock time of day.
    #[must_use]
    pub const fn close_time(&self) -> SlotTime {
        SlotTime(self.close_minutes % super::MINUTES_PER_DAY)
    }
}

/// Returns the opening window for a weekday.
///
/// | Days            | Hours               |
/// |-----------------|---------------------|
/// | Monday–Friday   | 05:00–23:00         |
/// | Saturday        | 05:00–02:00 (+1 day)|
/// | Sunday          | 11:30–21:00         |
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use tablebook::hours_for;
///
/// let sunday = hours_for(Weekday::Sun);
/// assert_eq!(sunday.open.to_string(), "11:30");
/// assert_eq!(sunday.close_minutes, 21 * 60);
/// assert!(hours_for(Weekday::Sat).closes_next_day());
/// ```
#[must_use]
pub const fn hours_for(weekday: Weekday) -> OperatingHours {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
            OperatingHours::new(5 * 60, 23 * 60)
        }
        Weekday::Sat => OperatingHours::new(5 * 60, 26 * 60),
        Weekday::Sun => OperatingHours::new(11 * 60 + 30, 21 * 60),
    }
}
