//! Day/night security window.
//!
//! A window is a half-open range of minutes since midnight.  When the
//! start is not before the end the window wraps midnight (22:00-06:00
//! covers the night).

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::error::ScheduleError;

/// Wall-clock time of day at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// `None` when either part is out of range.
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes since midnight (0-1439).
    pub const fn minutes(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Parses `"HH:MM"` (one-digit parts are accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.trim().split_once(':').ok_or(ScheduleError::MissingSeparator)?;
        let hour: u32 = h.parse().map_err(|_| ScheduleError::NotANumber)?;
        let minute: u32 = m.parse().map_err(|_| ScheduleError::NotANumber)?;
        if hour > 23 {
            return Err(ScheduleError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(ScheduleError::MinuteOutOfRange(minute));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Time-of-day range during which the security subsystem should be armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl SecurityWindow {
    /// Shown to the operator while no window has been configured.
    pub const DISPLAY_DEFAULT: Self = Self {
        start: TimeOfDay { hour: 22, minute: 0 },
        end: TimeOfDay { hour: 6, minute: 0 },
    };

    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Parse a window from two `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ScheduleError> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: TimeOfDay) -> bool {
        let (start, end, now) = (self.start.minutes(), self.end.minutes(), now.minutes());
        if start < end {
            now >= start && now < end
        } else {
            // Wraps midnight.
            now >= start || now < end
        }
    }
}

impl fmt::Display for SecurityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
