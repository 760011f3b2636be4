//! System configuration parameters
//!
//! All tunable parameters for the controller: calibration endpoints,
//! automation thresholds, safety limits, timing and per-quantity
//! sampling plans.  Supplied from outside the core (UI form, stored
//! file) and replaceable at runtime; every change applies on the next
//! tick.
//!
//! Nothing here is validated on the way in.  Degenerate calibration
//! endpoints are tolerated downstream by clamping, so a bad form
//! submission can never halt the control loop.

use serde::{Deserialize, Serialize};

/// How one physical quantity is sampled: burst size, trim count and
/// the delay between consecutive raw reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPlan {
    /// Raw reads attempted per burst.
    pub samples: usize,
    /// Values discarded from each end of the sorted burst.
    pub trim: usize,
    /// Delay between consecutive reads (milliseconds).
    pub delay_ms: u32,
}

impl SamplingPlan {
    pub const fn new(samples: usize, trim: usize, delay_ms: u32) -> Self {
        Self {
            samples,
            trim,
            delay_ms,
        }
    }

    /// Fewest valid readings that still leave a non-empty central window.
    pub const fn min_valid(&self) -> usize {
        self.trim.saturating_mul(2).saturating_add(1)
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Soil moisture ---
    /// Raw ADC reading of completely dry soil (maps to 0%).
    pub soil_dry_raw: u16,
    /// Raw ADC reading of saturated soil (maps to 100%).
    pub soil_wet_raw: u16,
    /// Reads below this are treated as a disconnected probe.
    pub soil_min_raw: u16,
    /// Irrigation starts below this moisture (%).
    pub moisture_threshold: u8,
    /// Irrigation stops at or above this moisture (%).
    pub moisture_stop: u8,

    // --- Light ---
    /// Raw ADC reading mapped to 0% light.
    pub light_min_raw: u16,
    /// Raw ADC reading mapped to 100% light.
    pub light_max_raw: u16,
    /// Filtered light raw below this is treated as a disconnected sensor.
    pub light_floor_raw: u16,
    /// Lighting turns on below this level (%).
    pub light_threshold_low: u8,
    /// Lighting turns off above this level (%).
    pub light_threshold_high: u8,

    // --- Reservoir ---
    /// Sensor-to-surface distance of an empty container (cm).
    pub tank_empty_cm: f32,
    /// Sensor-to-surface distance of a full container (cm).
    pub tank_full_cm: f32,
    /// Below this level irrigation is unsafe and filling starts (%).
    pub tank_critical_level: u8,
    /// Filling stops at this level (%).
    pub tank_max_level: u8,
    /// Warning clears only once the level is this far above critical (%).
    pub tank_hysteresis: u8,

    // --- Safety ---
    /// Hard ceiling on a single irrigation run (milliseconds).
    pub pump_max_run_ms: u64,

    // --- Timing ---
    /// Full-environment measurement interval (minutes).
    pub measurement_interval_min: u32,
    /// Alarm tone / indicator pulse period (milliseconds).
    pub alarm_pulse_ms: u64,
    /// Longest wait for the wall clock before skipping the schedule (milliseconds).
    pub clock_timeout_ms: u32,
    /// Power-rail settle time before the light and ultrasonic phases (milliseconds).
    pub rail_settle_ms: u32,
    /// UI data polling hint (seconds); echoed, not used by the core.
    pub server_polling_interval_sec: u32,
    /// UI status polling hint (seconds); echoed, not used by the core.
    pub status_polling_interval_sec: u32,

    // --- Sampling ---
    pub ambient_temp_plan: SamplingPlan,
    pub ambient_humidity_plan: SamplingPlan,
    pub soil_temp_plan: SamplingPlan,
    pub soil_moisture_plan: SamplingPlan,
    pub light_plan: SamplingPlan,
    pub echo_plan: SamplingPlan,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Soil
            soil_dry_raw: 2500,
            soil_wet_raw: 1000,
            soil_min_raw: 150,
            moisture_threshold: 40,
            moisture_stop: 80,

            // Light
            light_min_raw: 200,
            light_max_raw: 3500,
            light_floor_raw: 150,
            light_threshold_low: 40,
            light_threshold_high: 70,

            // Reservoir
            tank_empty_cm: 15.0,
            tank_full_cm: 8.6,
            tank_critical_level: 20,
            tank_max_level: 100,
            tank_hysteresis: 5,

            // Safety
            pump_max_run_ms: 120_000, // 2 min per burst

            // Timing
            measurement_interval_min: 10,
            alarm_pulse_ms: 500,
            clock_timeout_ms: 100,
            rail_settle_ms: 200,
            server_polling_interval_sec: 5,
            status_polling_interval_sec: 30,

            // Sampling: DHT-class sensors need ~100 ms between reads,
            // the echo burst is larger and trims harder (bursty reflections).
            ambient_temp_plan: SamplingPlan::new(10, 2, 100),
            ambient_humidity_plan: SamplingPlan::new(10, 2, 100),
            soil_temp_plan: SamplingPlan::new(10, 2, 0),
            soil_moisture_plan: SamplingPlan::new(10, 2, 2),
            light_plan: SamplingPlan::new(10, 2, 2),
            echo_plan: SamplingPlan::new(20, 7, 30),
        }
    }
}

impl SystemConfig {
    /// Measurement interval in milliseconds.
    pub fn measurement_interval_ms(&self) -> u64 {
        u64::from(self.measurement_interval_min) * 60_000
    }

    /// Level at or above which a reservoir warning clears.
    pub fn tank_recovery_level(&self) -> u16 {
        u16::from(self.tank_critical_level) + u16::from(self.tank_hysteresis)
    }

    /// Apply a partial update.  Absent fields keep their current value.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $( if let Some(v) = update.$field { self.$field = v; } )*
            };
        }
        take!(
            soil_dry_raw,
            soil_wet_raw,
            moisture_threshold,
            light_min_raw,
            light_max_raw,
            light_threshold_low,
            light_threshold_high,
            tank_empty_cm,
            tank_full_cm,
            tank_critical_level,
            pump_max_run_ms,
            measurement_interval_min,
            server_polling_interval_sec,
            status_polling_interval_sec,
        );
    }
}

/// Bulk configuration change from the UI layer.  Field names follow the
/// wire names the configuration form submits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    #[serde(rename = "soilDry")]
    pub soil_dry_raw: Option<u16>,
    #[serde(rename = "soilWet")]
    pub soil_wet_raw: Option<u16>,
    #[serde(rename = "soilThreshold")]
    pub moisture_threshold: Option<u8>,
    #[serde(rename = "lightMin")]
    pub light_min_raw: Option<u16>,
    #[serde(rename = "lightMax")]
    pub light_max_raw: Option<u16>,
    #[serde(rename = "lightLow")]
    pub light_threshold_low: Option<u8>,
    #[serde(rename = "lightHigh")]
    pub light_threshold_high: Option<u8>,
    #[serde(rename = "tankEmpty")]
    pub tank_empty_cm: Option<f32>,
    #[serde(rename = "tankFull")]
    pub tank_full_cm: Option<f32>,
    #[serde(rename = "tankCritical")]
    pub tank_critical_level: Option<u8>,
    #[serde(rename = "pumpMaxRunMs")]
    pub pump_max_run_ms: Option<u64>,
    #[serde(rename = "dataSendInterval")]
    pub measurement_interval_min: Option<u32>,
    #[serde(rename = "serverPollingInterval")]
    pub server_polling_interval_sec: Option<u32>,
    #[serde(rename = "statusPollingInterval")]
    pub status_polling_interval_sec: Option<u32>,
}

/// Echo of the operator-tunable fields, as the configuration form reads
/// them back.
impl From<&SystemConfig> for ConfigUpdate {
    fn from(c: &SystemConfig) -> Self {
        Self {
            soil_dry_raw: Some(c.soil_dry_raw),
            soil_wet_raw: Some(c.soil_wet_raw),
            moisture_threshold: Some(c.moisture_threshold),
            light_min_raw: Some(c.light_min_raw),
            light_max_raw: Some(c.light_max_raw),
            light_threshold_low: Some(c.light_threshold_low),
            light_threshold_high: Some(c.light_threshold_high),
            tank_empty_cm: Some(c.tank_empty_cm),
            tank_full_cm: Some(c.tank_full_cm),
            tank_critical_level: Some(c.tank_critical_level),
            pump_max_run_ms: Some(c.pump_max_run_ms),
            measurement_interval_min: Some(c.measurement_interval_min),
            server_polling_interval_sec: Some(c.server_polling_interval_sec),
            status_polling_interval_sec: Some(c.status_polling_interval_sec),
        }
    }
}
