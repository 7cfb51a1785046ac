//! Opening hours and bookable time slots.
//!
//! Times of day are naive local wall-clock times with no timezone. The
//! canonical textual form is 24-hour `HH:MM`; a 12-hour form such as
//! `6:30 PM` is accepted on input and available for display.

mod clock;
mod hours;
mod slots;

#[cfg(test)]
mod proptests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use clock::{Clock, FixedClock, SystemClock};
pub use hours::{hours_for, OperatingHours};
pub use slots::{SlotGenerator, Slots, CLOSING_BUFFER_MINUTES, SLOT_INTERVAL_MINUTES};

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day with minute precision (`00:00` through `23:59`).
///
/// # Examples
///
/// ```
/// use tablebook::SlotTime;
///
/// let t: SlotTime = "18:30".parse().unwrap();
/// assert_eq!(t.minutes(), 18 * 60 + 30);
/// assert_eq!(t.to_string(), "18:30");
/// assert_eq!(t.display_12h(), "6:30 PM");
///
/// assert_eq!("6:30 PM".parse::<SlotTime>().unwrap(), t);
/// assert!(SlotTime::try_from(24 * 60).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u16);

impl SlotTime {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a time from an hour and minute.
    ///
    /// # Errors
    ///
    /// Returns an error if `hour > 23` or `minute > 59`.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, InvalidTimeError> {
        if hour > 23 || minute > 59 {
            return Err(InvalidTimeError::new(
                format!("{hour}:{minute:02}"),
                "hour must be 0-23 and minute 0-59",
            ));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0-23).
    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Formats the time for display in 12-hour form, e.g. `6:30 PM`.
    #[must_use]
    pub fn display_12h(self) -> String {
        let (hour, suffix) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{hour}:{:02} {suffix}", self.minute())
    }

    /// Converts to a `chrono` time.
    #[must_use]
    pub fn to_naive_time(self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or_default()
    }

    /// Truncates a `chrono` time to minute precision.
    #[must_use]
    pub fn from_naive_time(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        // hour() < 24 and minute() < 60, so the sum always fits.
        #[allow(clippy::cast_possible_truncation)]
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl TryFrom<u16> for SlotTime {
    type Error = InvalidTimeError;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        if minutes >= MINUTES_PER_DAY {
            Err(InvalidTimeError::new(
                minutes.to_string(),
                "minutes since midnight must be below 1440",
            ))
        } else {
            Ok(Self(minutes))
        }
    }
}

impl FromStr for SlotTime {
    type Err = InvalidTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let mut parts = clock.split(':');
        let parse_part = |part: Option<&str>| -> Result<u16, InvalidTimeError> {
            let part = part.ok_or_else(|| InvalidTimeError::new(s, "expected HH:MM"))?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InvalidTimeError::new(s, "expected HH:MM"));
            }
            part.parse::<u16>()
                .map_err(|_| InvalidTimeError::new(s, "expected HH:MM"))
        };

        let hour = parse_part(parts.next())?;
        let minute = parse_part(parts.next())?;
        // Seconds are tolerated for stored `HH:MM:SS` values but must be zero.
        if let Some(seconds) = parts.next() {
            if meridiem.is_some() || seconds != "00" {
                return Err(InvalidTimeError::new(s, "seconds are not supported"));
            }
        }
        if parts.next().is_some() {
            return Err(InvalidTimeError::new(s, "expected HH:MM"));
        }

        let hour = match meridiem {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => {
                return Err(InvalidTimeError::new(s, "12-hour times use hours 1-12"));
            }
            Some(false) => hour % 12,
            Some(true) => hour % 12 + 12,
        };

        Self::from_hm(hour, minute).map_err(|e| InvalidTimeError::new(s, e.reason))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for SlotTime {
    type Error = InvalidTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotTime> for String {
    fn from(time: SlotTime) -> Self {
        time.to_string()
    }
}

/// Error type for unparseable or out-of-range times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeError {
    /// The rejected input.
    pub value: String,
    /// The reason the time is invalid.
    pub reason: String,
}

impl InvalidTimeError {
    fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InvalidTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidTimeError {}
