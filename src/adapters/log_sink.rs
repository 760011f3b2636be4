//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (serial console on the controller, stderr on a host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | automation running"),
            AppEvent::MeasurementTaken(r) => {
                info!(
                    "MEAS  | T={:?}\u{00b0}C RH={:?}% | soil={:?}% ({:?}) Ts={:?}\u{00b0}C | \
                     tank={:?}% ({:?}cm) | light={:?}% | motion={} | status={:?}",
                    r.ambient_temp,
                    r.ambient_humidity,
                    r.soil_moisture,
                    r.soil_raw,
                    r.soil_temp,
                    r.tank_level,
                    r.tank_distance_cm,
                    r.light_level,
                    r.motion_detected,
                    r.status,
                );
            }
            AppEvent::StatusChanged { from, to } => info!("STATUS | {:?} -> {:?}", from, to),
            AppEvent::AlarmTriggered => warn!("ALARM | motion while armed"),
            AppEvent::AlarmCleared => info!("ALARM | cleared"),
            AppEvent::OutputChanged { output, on } => {
                info!("OUT   | {:?} {}", output, if *on { "ON" } else { "OFF" });
            }
            AppEvent::FaultDetected(flags) => warn!("FAULT | detected, flags=0b{:08b}", flags),
            AppEvent::FaultCleared => info!("FAULT | all cleared"),
        }
    }
}
