//! Unified error types for the controller core.
//!
//! The control path itself never fails: an unreadable quantity becomes
//! [`Reading::Invalid`](crate::record::Reading) and a safety condition
//! becomes a [`SafetyFault`] bit.  Errors only surface at the operator
//! boundary, where text coming from the UI layer has to be parsed.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operator-facing call funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A security schedule string could not be parsed.
    Schedule(ScheduleError),
    /// An action request body was not valid JSON for the expected shape.
    Request(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schedule(e) => write!(f, "schedule: {e}"),
            Self::Request(msg) => write!(f, "request: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Schedule errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// No `:` separating hours from minutes, or an empty component.
    MissingSeparator,
    /// A component was not a decimal number.
    NotANumber,
    /// Hour outside 0-23.
    HourOutOfRange(u32),
    /// Minute outside 0-59.
    MinuteOutOfRange(u32),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "expected HH:MM"),
            Self::NotANumber => write!(f, "hour and minute must be numbers"),
            Self::HourOutOfRange(h) => write!(f, "hour {h} out of range"),
            Self::MinuteOutOfRange(m) => write!(f, "minute {m} out of range"),
        }
    }
}

impl From<ScheduleError> for Error {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Safety faults
// ---------------------------------------------------------------------------

/// Conditions that force an actuator off regardless of requested mode.
/// Accumulated in a bitfield by the safety supervisor so that several
/// can be active at once and cleared individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SafetyFault {
    /// Reservoir below the critical level (latched until hysteresis band clears).
    ReservoirLow = 0b0000_0001,
    /// Irrigation pump exceeded its maximum run duration.
    PumpRuntimeExceeded = 0b0000_0010,
    /// Reservoir reached its maximum level while filling.
    ReservoirFull = 0b0000_0100,
    /// A quantity the safety logic depends on could not be measured.
    SensorUnavailable = 0b0000_1000,
}

impl SafetyFault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservoirLow => write!(f, "reservoir low"),
            Self::PumpRuntimeExceeded => write!(f, "pump runtime exceeded"),
            Self::ReservoirFull => write!(f, "reservoir full"),
            Self::SensorUnavailable => write!(f, "sensor unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
