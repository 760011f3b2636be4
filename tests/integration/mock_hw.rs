//! Mock adapters for integration tests.
//!
//! `MockGarden` answers raw reads from a few settable "true" values and
//! records every actuator call so tests can assert on the full command
//! history without touching real GPIO.

use verdant::app::events::AppEvent;
use verdant::app::ports::{ActuatorPort, ClockPort, EventSink, Output, RawSensorPort};
use verdant::record::Reading;
use verdant::scheduler::TimeOfDay;
use verdant::sensors::Quantity;
use verdant::sensors::ultrasonic::sound_speed_cm_per_us;

use embedded_hal::delay::DelayNs;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Set(Output, bool),
    Tone(bool),
}

// ── MockGarden ────────────────────────────────────────────────

/// Environment seen by the sensors.  `None` makes every read of that
/// quantity fail.
pub struct MockGarden {
    pub ambient_c: Option<f32>,
    pub humidity: Option<f32>,
    pub soil_c: Option<f32>,
    pub soil_raw: Option<f32>,
    pub light_raw: Option<f32>,
    pub tank_cm: Option<f32>,
    pub pir: bool,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockGarden {
    /// Healthy readings: soil 60 %, light 55 %, reservoir 60 %.
    pub fn new() -> Self {
        let mut g = Self {
            ambient_c: Some(21.0),
            humidity: Some(50.0),
            soil_c: Some(18.0),
            soil_raw: None,
            light_raw: None,
            tank_cm: None,
            pir: false,
            calls: Vec::new(),
        };
        g.set_soil_percent(60);
        g.set_light_percent(55);
        g.set_tank_level(60);
        g
    }

    // Targets sit half a percent above the whole value so truncation in
    // the calibration lands on it.  Default calibration assumed.

    pub fn set_soil_percent(&mut self, pct: u8) {
        self.soil_raw = Some(2500.0 - 15.0 * (f32::from(pct) + 0.5));
    }

    pub fn set_light_percent(&mut self, pct: u8) {
        self.light_raw = Some(200.0 + 33.0 * (f32::from(pct) + 0.5));
    }

    pub fn set_tank_level(&mut self, pct: u8) {
        self.tank_cm = Some(15.0 - 0.064 * (f32::from(pct) + 0.5));
    }

    /// Last commanded state of `output` (off if never driven).
    pub fn is_on(&self, output: Output) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Set(o, on) if *o == output => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn tone_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Tone(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Number of times `output` was driven to `on`.
    pub fn count(&self, output: Output, on: bool) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::Set(output, on))
            .count()
    }
}

impl Default for MockGarden {
    fn default() -> Self {
        Self::new()
    }
}

impl RawSensorPort for MockGarden {
    fn read_raw(&mut self, quantity: Quantity) -> Option<f32> {
        match quantity {
            Quantity::AmbientTemperature => self.ambient_c,
            Quantity::AmbientHumidity => self.humidity,
            Quantity::SoilTemperature => self.soil_c,
            Quantity::SoilMoisture => self.soil_raw,
            Quantity::Light => self.light_raw,
            Quantity::EchoRoundTrip => {
                let v = sound_speed_cm_per_us(
                    Reading::from(self.ambient_c),
                    Reading::from(self.humidity),
                );
                self.tank_cm.map(|d| 2.0 * d / v)
            }
        }
    }

    fn motion_level(&mut self) -> bool {
        self.pir
    }
}

impl ActuatorPort for MockGarden {
    fn set_output(&mut self, output: Output, on: bool) {
        self.calls.push(ActuatorCall::Set(output, on));
    }

    fn set_alarm_tone(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Tone(on));
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock the test advances by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    pub now_ms: u64,
    pub time_of_day: Option<TimeOfDay>,
    /// Number of wall-clock queries made.
    pub tod_queries: usize,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn set_time(&mut self, hhmm: &str) {
        self.time_of_day = hhmm.parse().ok();
    }
}

impl ClockPort for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms
    }

    fn time_of_day(&mut self, _timeout_ms: u32) -> Option<TimeOfDay> {
        self.tod_queries += 1;
        self.time_of_day
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Inter-read delays are irrelevant on the host.
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
