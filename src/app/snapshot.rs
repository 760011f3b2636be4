//! Read-only views handed to the serving layer.
//!
//! Everything here is an owned copy assembled in one go from the service
//! state, so a reader never sees a half-updated record.  Field names are
//! the wire names the web UI expects; invalid readings serialise as
//! `null`.

use serde::Serialize;

use crate::automation::AutomationContext;
use crate::config::ConfigUpdate;
use crate::history::HistoryLog;
use crate::record::{MeasurementRecord, Reading, SystemStatus};
use crate::scheduler::{SecurityWindow, TimeOfDay};

/// Current measurement plus every automation flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub temp: Reading<f32>,
    pub humidity: Reading<f32>,
    pub soil_temp: Reading<f32>,
    pub soil_moisture: Reading<u8>,
    pub soil_raw: Reading<u16>,
    pub tank_level: Reading<u8>,
    pub tank_distance: Reading<f32>,
    pub light: Reading<u8>,
    pub light_raw: Reading<u16>,
    pub motion: bool,
    #[serde(flatten)]
    pub status: StatusView,
    pub last_measurement_time: Option<u64>,
    pub config: ConfigUpdate,
}

/// The lightweight subset polled at a higher rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub pump: bool,
    pub tank_pump: bool,
    pub luminary: bool,
    pub security: bool,
    pub alarm: bool,
    pub irrigation_auto: bool,
    pub tank_auto: bool,
    pub security_auto: bool,
    pub luminary_auto: bool,
    pub security_start: TimeOfDay,
    pub security_end: TimeOfDay,
    pub status: SystemStatus,
}

/// One history chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub temp: Reading<f32>,
    pub humidity: Reading<f32>,
    pub soil: Reading<u8>,
    pub tank: Reading<u8>,
    pub light: Reading<u8>,
    pub timestamp: u64,
}

/// Snapshot and history together, as served on the data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataReport {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub history: Vec<HistoryPoint>,
}

impl StatusView {
    pub fn from_context(ctx: &AutomationContext) -> Self {
        let window = ctx.security.window.unwrap_or(SecurityWindow::DISPLAY_DEFAULT);
        Self {
            pump: ctx.outputs.irrigation_pump,
            tank_pump: ctx.outputs.fill_pump,
            luminary: ctx.outputs.lighting,
            security: ctx.security.armed,
            alarm: ctx.security.alarm_latched,
            irrigation_auto: ctx.irrigation.mode.auto,
            tank_auto: ctx.fill.auto,
            security_auto: ctx.security.auto,
            luminary_auto: ctx.lighting.auto,
            security_start: window.start,
            security_end: window.end,
            status: ctx.status,
        }
    }
}

impl Snapshot {
    pub fn from_context(ctx: &AutomationContext) -> Self {
        let r = &ctx.record;
        Self {
            temp: r.ambient_temp,
            humidity: r.ambient_humidity,
            soil_temp: r.soil_temp,
            soil_moisture: r.soil_moisture,
            soil_raw: r.soil_raw,
            tank_level: r.tank_level,
            tank_distance: r.tank_distance_cm,
            light: r.light_level,
            light_raw: r.light_raw,
            motion: r.motion_detected,
            status: StatusView::from_context(ctx),
            last_measurement_time: r.last_measurement_ms,
            config: ConfigUpdate::from(&ctx.config),
        }
    }
}

impl From<&MeasurementRecord> for HistoryPoint {
    fn from(r: &MeasurementRecord) -> Self {
        Self {
            temp: r.ambient_temp,
            humidity: r.ambient_humidity,
            soil: r.soil_moisture,
            tank: r.tank_level,
            light: r.light_level,
            timestamp: r.captured_at_ms,
        }
    }
}

impl DataReport {
    pub fn new(ctx: &AutomationContext, history: &HistoryLog) -> Self {
        Self {
            snapshot: Snapshot::from_context(ctx),
            history: history.iter().map(HistoryPoint::from).collect(),
        }
    }
}
