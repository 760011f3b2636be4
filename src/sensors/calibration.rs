//! Raw ADC value → percentage mapping.
//!
//! Two calibration endpoints define a line; the result is clamped to
//! 0-100.  Endpoints may be inverted (capacitive soil probes read lower
//! when wet) or even equal; neither produces an out-of-range result.

use crate::record::Reading;

/// Endpoint pair plus a disconnect floor for one ADC-backed quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Raw value mapped to 0 %.
    pub zero: f32,
    /// Raw value mapped to 100 %.
    pub full: f32,
    /// Filtered raw values below this mean the sensor is not connected.
    pub floor: f32,
}

impl Calibration {
    pub fn new(zero: u16, full: u16, floor: u16) -> Self {
        Self {
            zero: f32::from(zero),
            full: f32::from(full),
            floor: f32::from(floor),
        }
    }

    /// Map a filtered raw value to a percentage, or `Invalid` when it sits
    /// below the disconnect floor.
    pub fn percent(&self, raw: f32) -> Reading<u8> {
        if raw < self.floor {
            return Reading::Invalid;
        }
        Reading::Valid(linear_percent(raw, self.zero, self.full))
    }
}

/// Linear interpolation of `raw` between `zero` (0 %) and `full` (100 %),
/// clamped and truncated to a whole percent.
pub fn linear_percent(raw: f32, zero: f32, full: f32) -> u8 {
    let span = full - zero;
    if span.abs() < f32::EPSILON {
        // Degenerate calibration: a step at the shared endpoint.
        return if raw >= zero { 100 } else { 0 };
    }
    let pct = (raw - zero) * 100.0 / span;
    pct.clamp(0.0, 100.0) as u8
}
