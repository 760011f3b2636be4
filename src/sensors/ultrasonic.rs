//! Ultrasonic reservoir ranging (HC-SR04 class, top-mounted).
//!
//! The driver reports the echo round-trip time in microseconds.  Sound
//! speed depends on air temperature and humidity, so the conversion uses
//! the ambient values measured earlier in the same pass:
//!
//! ```text
//! v = 331.3 + 0.606·T + 0.0124·RH   (m/s)
//! ```
//!
//! Each echo is range-checked before it enters the trimmed burst.

use crate::record::Reading;

/// 343 m/s (dry air at 20 °C) expressed in cm/µs.
pub const STANDARD_CM_PER_US: f32 = 0.0343;

/// Closest distance the transducer can resolve (cm).
pub const MIN_ECHO_CM: f32 = 2.0;
/// Farthest plausible echo (cm).
pub const MAX_ECHO_CM: f32 = 400.0;

/// Speed of sound in cm/µs, corrected for ambient conditions.  Falls back
/// to the standard-conditions constant when either input is missing.
pub fn sound_speed_cm_per_us(temp_c: Reading<f32>, humidity: Reading<f32>) -> f32 {
    match (temp_c, humidity) {
        (Reading::Valid(t), Reading::Valid(h)) => {
            let m_per_s = 331.3 + 0.606 * t + 0.0124 * h;
            m_per_s / 10_000.0
        }
        _ => STANDARD_CM_PER_US,
    }
}

/// One-way distance for a round-trip echo time, or `None` when the echo is
/// outside the transducer's plausible range.
pub fn echo_distance_cm(round_trip_us: f32, cm_per_us: f32) -> Option<f32> {
    if round_trip_us <= 0.0 {
        return None;
    }
    let d = round_trip_us * cm_per_us / 2.0;
    (MIN_ECHO_CM..=MAX_ECHO_CM).contains(&d).then_some(d)
}

/// Container geometry as seen from the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankGeometry {
    /// Distance to the bottom / empty surface (cm).
    pub empty_cm: f32,
    /// Distance to the surface when full (cm).
    pub full_cm: f32,
}

impl TankGeometry {
    /// Fill level for a measured surface distance.
    pub fn level_percent(&self, distance_cm: f32) -> u8 {
        if distance_cm >= self.empty_cm {
            return 0;
        }
        if distance_cm <= self.full_cm {
            return 100;
        }
        // Here full_cm < distance_cm < empty_cm, so the span is positive.
        let pct = (self.empty_cm - distance_cm) / (self.empty_cm - self.full_cm) * 100.0;
        pct.clamp(0.0, 100.0) as u8
    }
}
