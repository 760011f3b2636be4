//! Simulated garden for host runs.
//!
//! Models a small enclosure closely enough to exercise the automation:
//! - Soil slowly dries; the irrigation pump wets it and drains the reservoir
//! - The fill pump raises the reservoir
//! - Light follows a compressed day/night cycle
//! - Every raw read carries noise, with occasional spikes and dropped reads
//! - Motion arrives at random and is latched the way the PIR interrupt would
//!
//! Raw values are produced in the same units the real drivers report, so
//! the sensor suite's filtering and calibration run unchanged.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::app::ports::{ActuatorPort, Output, RawSensorPort};
use crate::sensors::Quantity;
use crate::sensors::motion::MotionLatch;
use crate::sensors::ultrasonic::STANDARD_CM_PER_US;

/// Approximate a sample from N(0,1): sum of 12 uniforms minus 6.
fn std_normal() -> f32 {
    (0..12).map(|_| fastrand::f32()).sum::<f32>() - 6.0
}

fn gaussian(mean: f32, sigma: f32) -> f32 {
    mean + sigma * std_normal()
}

/// Simulation profile, selectable by name on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Moderate noise, reservoir half full, soil drifting dry.
    Nominal,
    /// High noise, frequent spikes and dropped reads.
    Flaky,
    /// Reservoir starts just above critical.
    LowReservoir,
}

impl Scenario {
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "flaky" => Self::Flaky,
            "low" | "low-reservoir" => Self::LowReservoir,
            _ => Self::Nominal,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal => write!(f, "nominal"),
            Self::Flaky => write!(f, "flaky"),
            Self::LowReservoir => write!(f, "low-reservoir"),
        }
    }
}

/// Rates per simulated second.
const SOIL_DRY_RATE: f32 = 0.4;
const SOIL_WET_RATE: f32 = 12.0;
const DRAIN_CM_PER_S: f32 = 0.02;
const FILL_CM_PER_S: f32 = 0.05;
/// Container geometry the simulated echo is bounded by (cm).
const TANK_EMPTY_CM: f32 = 15.0;
const TANK_FULL_CM: f32 = 8.6;
const SOIL_RAW_DRY: f32 = 2500.0;
const SOIL_RAW_WET: f32 = 1000.0;

/// Simulated sensors and actuators behind the hardware ports.
pub struct SimHardware {
    scenario: Scenario,
    motion: Arc<MotionLatch>,
    /// Simulated time (ms).
    now_ms: u64,
    /// Length of one simulated day (ms).
    day_ms: u64,

    ambient_c: f32,
    humidity: f32,
    soil_c: f32,
    soil_raw: f32,
    tank_cm: f32,
    pir_until_ms: u64,

    spike_prob: f32,
    dropout_prob: f32,
    noise: f32,

    outputs: [bool; 4],
    tone: bool,
}

impl SimHardware {
    /// `day_ms` compresses the diurnal cycle; use 86 400 000 for real time.
    pub fn new(scenario: Scenario, motion: Arc<MotionLatch>, day_ms: u64) -> Self {
        let (spike_prob, dropout_prob, noise, tank_cm) = match scenario {
            Scenario::Nominal => (0.02, 0.01, 1.0, 11.8),
            Scenario::Flaky => (0.10, 0.08, 3.0, 11.8),
            Scenario::LowReservoir => (0.02, 0.01, 1.0, 13.5),
        };
        Self {
            scenario,
            motion,
            now_ms: 0,
            day_ms: day_ms.max(1),
            ambient_c: 22.0,
            humidity: 55.0,
            soil_c: 18.0,
            soil_raw: 1900.0,
            tank_cm,
            pir_until_ms: 0,
            spike_prob,
            dropout_prob,
            noise,
            outputs: [false; 4],
            tone: false,
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn output(&self, output: Output) -> bool {
        self.outputs[output as usize]
    }

    pub fn alarm_tone(&self) -> bool {
        self.tone
    }

    /// Advance the environment by `dt_ms`.
    pub fn step(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
        let dt = dt_ms as f32 / 1000.0;

        self.soil_raw += SOIL_DRY_RATE * dt;
        if self.output(Output::IrrigationPump) {
            self.soil_raw -= SOIL_WET_RATE * dt;
            self.tank_cm += DRAIN_CM_PER_S * dt;
        }
        if self.output(Output::FillPump) {
            self.tank_cm -= FILL_CM_PER_S * dt;
        }
        self.soil_raw = self.soil_raw.clamp(SOIL_RAW_WET - 100.0, SOIL_RAW_DRY + 100.0);
        self.tank_cm = self.tank_cm.clamp(TANK_FULL_CM - 1.0, TANK_EMPTY_CM + 1.0);

        let day = self.daylight();
        self.ambient_c = 18.0 + 8.0 * day + gaussian(0.0, 0.05);
        self.humidity = (70.0 - 20.0 * day + gaussian(0.0, 0.2)).clamp(0.0, 100.0);
        self.soil_c = 16.0 + 4.0 * day;

        // Roughly one visitor per simulated hour.
        let p_motion = dt / 3600.0;
        if fastrand::f32() < p_motion {
            debug!("sim: motion");
            self.pir_until_ms = self.now_ms + 3_000;
            self.motion.signal();
        }
    }

    /// 0 at midnight, 1 at noon.
    fn daylight(&self) -> f32 {
        let phase = (self.now_ms % self.day_ms) as f32 / self.day_ms as f32;
        let s = (std::f32::consts::TAU * (phase - 0.25)).sin();
        (s + 1.0) / 2.0
    }

    fn light_raw(&self) -> f32 {
        200.0 + 3300.0 * self.daylight()
    }

    /// Echo round trip for the current surface distance at standard conditions.
    fn echo_us(&self) -> f32 {
        2.0 * self.tank_cm / STANDARD_CM_PER_US
    }

    fn noisy(&self, truth: f32, sigma: f32, spike_sigma: f32) -> Option<f32> {
        if fastrand::f32() < self.dropout_prob {
            return None;
        }
        let mut v = gaussian(truth, sigma * self.noise);
        if fastrand::f32() < self.spike_prob {
            v += gaussian(0.0, spike_sigma);
        }
        Some(v)
    }
}

impl RawSensorPort for SimHardware {
    fn read_raw(&mut self, quantity: Quantity) -> Option<f32> {
        match quantity {
            Quantity::AmbientTemperature => self.noisy(self.ambient_c, 0.2, 10.0),
            Quantity::AmbientHumidity => self.noisy(self.humidity, 0.8, 25.0),
            Quantity::SoilTemperature => self.noisy(self.soil_c, 0.1, 8.0),
            Quantity::SoilMoisture => self
                .noisy(self.soil_raw, 15.0, 600.0)
                .map(|v| v.clamp(0.0, 4095.0)),
            Quantity::Light => self
                .noisy(self.light_raw(), 25.0, 900.0)
                .map(|v| v.clamp(0.0, 4095.0)),
            Quantity::EchoRoundTrip => self.noisy(self.echo_us(), 6.0, 400.0),
        }
    }

    fn motion_level(&mut self) -> bool {
        self.now_ms < self.pir_until_ms
    }
}

impl ActuatorPort for SimHardware {
    fn set_output(&mut self, output: Output, on: bool) {
        self.outputs[output as usize] = on;
    }

    fn set_alarm_tone(&mut self, on: bool) {
        self.tone = on;
    }
}
