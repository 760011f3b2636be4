//! Sensor subsystem: burst filtering, calibration, ranging and the
//! aggregating [`SensorSuite`].
//!
//! The suite runs one full measurement pass in a fixed order and returns a
//! [`MeasurementRecord`].  Individual failures never abort the pass; a
//! quantity that could not be trusted is simply recorded as `Invalid`.

pub mod calibration;
pub mod filter;
pub mod motion;
pub mod ultrasonic;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::ports::RawSensorPort;
use crate::config::SystemConfig;
use crate::record::{ActuatorFlags, MeasurementRecord, Reading};
use calibration::Calibration;
use filter::{round_tenth, sample_burst};
use motion::MotionLatch;
use ultrasonic::{TankGeometry, echo_distance_cm, sound_speed_cm_per_us};

/// Physical quantity a raw read refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Ambient air temperature (°C).
    AmbientTemperature,
    /// Ambient relative humidity (%).
    AmbientHumidity,
    /// Soil probe temperature (°C).
    SoilTemperature,
    /// Capacitive soil probe, raw ADC counts.
    SoilMoisture,
    /// Light sensor, raw ADC counts.
    Light,
    /// Ultrasonic echo round-trip time (µs).
    EchoRoundTrip,
}

/// Owns the inter-read delay provider and produces measurement records.
pub struct SensorSuite<D> {
    delay: D,
}

impl<D: DelayNs> SensorSuite<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// One complete measurement pass.
    ///
    /// Order is fixed: ambient temperature and humidity first (the echo
    /// conversion needs both), then soil, light, motion and finally the
    /// reservoir.  `actuators` is stamped into the record as-is; the
    /// caller sets `status` once automation has run.
    pub fn measure<S: RawSensorPort + ?Sized>(
        &mut self,
        hw: &mut S,
        config: &SystemConfig,
        motion: &MotionLatch,
        actuators: ActuatorFlags,
        now_ms: u64,
    ) -> MeasurementRecord {
        let delay = &mut self.delay;

        // Ambient air.
        let ambient_temp = sample_burst(&config.ambient_temp_plan, delay, || {
            hw.read_raw(Quantity::AmbientTemperature)
        })
        .map(round_tenth);
        let ambient_humidity = sample_burst(&config.ambient_humidity_plan, delay, || {
            hw.read_raw(Quantity::AmbientHumidity)
        })
        .map(round_tenth);

        // Soil.
        let soil_temp = sample_burst(&config.soil_temp_plan, delay, || {
            hw.read_raw(Quantity::SoilTemperature)
        });
        let soil_floor = f32::from(config.soil_min_raw);
        let soil_filtered = sample_burst(&config.soil_moisture_plan, delay, || {
            hw.read_raw(Quantity::SoilMoisture)
                .filter(|raw| *raw >= soil_floor)
        });
        let soil_cal = Calibration::new(config.soil_dry_raw, config.soil_wet_raw, config.soil_min_raw);
        let soil_moisture = soil_filtered.and_then(|raw| soil_cal.percent(raw));
        let soil_raw = soil_filtered.map(to_counts);

        settle(delay, config.rail_settle_ms);

        // Light.
        let light_filtered =
            sample_burst(&config.light_plan, delay, || hw.read_raw(Quantity::Light));
        let light_cal = Calibration::new(
            config.light_min_raw,
            config.light_max_raw,
            config.light_floor_raw,
        );
        let light_level = light_filtered.and_then(|raw| light_cal.percent(raw));
        let light_raw = light_filtered.map(to_counts);

        settle(delay, config.rail_settle_ms);

        // Presence: a latched edge or the live pin level.
        let motion_detected = motion.is_pending() || hw.motion_level();

        // Reservoir.
        let cm_per_us = sound_speed_cm_per_us(ambient_temp, ambient_humidity);
        let tank_distance_cm = sample_burst(&config.echo_plan, delay, || {
            hw.read_raw(Quantity::EchoRoundTrip)
                .and_then(|us| echo_distance_cm(us, cm_per_us))
        });
        let geometry = TankGeometry {
            empty_cm: config.tank_empty_cm,
            full_cm: config.tank_full_cm,
        };
        let tank_level = tank_distance_cm.map(|d| geometry.level_percent(d));

        if !tank_level.is_valid() {
            warn!("reservoir level unavailable this pass");
        }
        debug!(
            "pass @{now_ms}ms: T={ambient_temp:?} RH={ambient_humidity:?} soil={soil_moisture:?} \
             light={light_level:?} tank={tank_level:?} motion={motion_detected}"
        );

        MeasurementRecord {
            ambient_temp,
            ambient_humidity,
            soil_temp,
            soil_moisture,
            soil_raw,
            tank_level,
            tank_distance_cm,
            light_level,
            light_raw,
            motion_detected,
            actuators,
            status: Default::default(),
            last_measurement_ms: Some(now_ms),
            captured_at_ms: now_ms,
        }
    }
}

fn settle<D: DelayNs>(delay: &mut D, ms: u32) {
    if ms > 0 {
        delay.delay_ms(ms);
    }
}

fn to_counts(raw: f32) -> u16 {
    raw.round().clamp(0.0, f32::from(u16::MAX)) as u16
}
