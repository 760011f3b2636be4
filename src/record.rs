//! Measurement values and the per-pass snapshot.
//!
//! [`Reading`] replaces magic "no data" numbers: a comparison against a
//! threshold only compiles after the caller has matched out the
//! `Valid` case.  [`MeasurementRecord`] is the immutable snapshot of
//! every quantity taken at one sampling instant.

use core::cmp::Ordering;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// A measured quantity that may not have been trustworthily measured.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Reading<T> {
    Valid(T),
    #[default]
    Invalid,
}

impl<T: Copy> Reading<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Self::Valid(v) => Reading::Valid(f(v)),
            Self::Invalid => Reading::Invalid,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Reading<U>) -> Reading<U> {
        match self {
            Self::Valid(v) => f(v),
            Self::Invalid => Reading::Invalid,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::Valid(v),
            None => Self::Invalid,
        }
    }
}

/// Invalid readings go over the wire as `null`.
impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(v) => v.serialize(s),
            Self::Invalid => s.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// System status
// ---------------------------------------------------------------------------

/// Overall severity surfaced to the UI.
///
/// Total order (lowest to highest): `Normal < Warning < SensorError < Alarm`.
/// Combining two conditions keeps the more severe one ([`SystemStatus::merge`]).
/// A sensor fault outranks a reservoir warning since the warning may rest
/// on an untrustworthy reading; a latched alarm outranks everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SystemStatus {
    #[default]
    Normal,
    Warning,
    Alarm,
    SensorError,
}

impl SystemStatus {
    /// Numeric code used on the wire (matches the UI's status table).
    pub const fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Warning => 1,
            Self::Alarm => 2,
            Self::SensorError => 3,
        }
    }

    /// Rank in the severity order.
    pub const fn severity(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Warning => 1,
            Self::SensorError => 2,
            Self::Alarm => 3,
        }
    }

    /// The more severe of the two.
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

impl Ord for SystemStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl PartialOrd for SystemStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for SystemStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.code())
    }
}

// ---------------------------------------------------------------------------
// Measurement record
// ---------------------------------------------------------------------------

/// Actuator states captured alongside a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorFlags {
    pub irrigation: bool,
    pub fill: bool,
    pub lighting: bool,
}

/// Every quantity measured at one sampling instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementRecord {
    /// Ambient air temperature (°C).
    pub ambient_temp: Reading<f32>,
    /// Ambient relative humidity (%).
    pub ambient_humidity: Reading<f32>,
    /// Soil temperature (°C).
    pub soil_temp: Reading<f32>,
    /// Soil moisture (0-100 %).
    pub soil_moisture: Reading<u8>,
    /// Filtered soil ADC value behind `soil_moisture`.
    pub soil_raw: Reading<u16>,
    /// Reservoir level (0-100 %).
    pub tank_level: Reading<u8>,
    /// Filtered sensor-to-surface distance behind `tank_level` (cm).
    pub tank_distance_cm: Reading<f32>,
    /// Ambient light (0-100 %).
    pub light_level: Reading<u8>,
    /// Filtered light ADC value behind `light_level`.
    pub light_raw: Reading<u16>,
    pub motion_detected: bool,
    pub actuators: ActuatorFlags,
    pub status: SystemStatus,
    /// Uptime of the last successful full measurement (ms), `None` before the first.
    pub last_measurement_ms: Option<u64>,
    /// Uptime at which this record was captured (ms).
    pub captured_at_ms: u64,
}

impl MeasurementRecord {
    /// True until the first full measurement pass has completed.
    pub fn is_initial(&self) -> bool {
        self.last_measurement_ms.is_none()
    }
}
