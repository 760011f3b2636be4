//! Shared mutable context threaded through every automation step.
//!
//! `AutomationContext` is the single struct the automation tick and the
//! operator overrides read from and write to.  It holds the latest
//! measurement record, the per-subsystem control blocks, the actuator
//! command outputs, configuration and the safety supervisor.  Nothing
//! outside the automation module mutates it directly.

use log::info;

use crate::config::SystemConfig;
use crate::error::SafetyFault;
use crate::record::{ActuatorFlags, MeasurementRecord, SystemStatus};
use crate::safety::SafetySupervisor;
use crate::scheduler::SecurityWindow;

// ---------------------------------------------------------------------------
// Control blocks
// ---------------------------------------------------------------------------

/// Auto / manual-force flags for one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsystemControl {
    /// Automatic control enabled.
    pub auto: bool,
    /// Operator override in effect.
    pub forced: bool,
}

impl SubsystemControl {
    pub const fn automatic() -> Self {
        Self {
            auto: true,
            forced: false,
        }
    }

    /// Automatic control may act this tick.
    pub fn auto_active(&self) -> bool {
        self.auto && !self.forced
    }
}

/// Irrigation adds a run timer on top of the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrrigationControl {
    pub mode: SubsystemControl,
    /// Uptime the pump last started at, `None` while it is off.
    pub started_at_ms: Option<u64>,
    /// Ceiling for the current run.
    pub max_run_ms: u64,
}

/// Manual arm/disarm suspends the window until its next edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleHold {
    #[default]
    Off,
    /// Set by a manual action; the first evaluation records which side
    /// of the window we are on.
    Pending,
    /// Holding while the window stays on this side (`true` = inside).
    Holding(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityControl {
    pub armed: bool,
    /// Window evaluation enabled.
    pub auto: bool,
    pub window: Option<SecurityWindow>,
    pub hold: ScheduleHold,
    pub alarm_latched: bool,
    /// `true` = tone phase, `false` = indicator phase.
    pub pulse_phase: bool,
    pub last_toggle_ms: u64,
}

impl Default for SecurityControl {
    fn default() -> Self {
        Self {
            armed: false,
            auto: false,
            window: None,
            hold: ScheduleHold::Off,
            alarm_latched: false,
            pulse_phase: false,
            last_toggle_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by automation; applied by the service)
// ---------------------------------------------------------------------------

/// Desired state of every output.  The service diffs successive values
/// and only drives the outputs that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputCommands {
    pub irrigation_pump: bool,
    pub fill_pump: bool,
    pub lighting: bool,
    pub security_indicator: bool,
    pub alarm_tone: bool,
}

impl OutputCommands {
    /// All outputs off.
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> ActuatorFlags {
        ActuatorFlags {
            irrigation: self.irrigation_pump,
            fill: self.fill_pump,
            lighting: self.lighting,
        }
    }
}

// ---------------------------------------------------------------------------
// AutomationContext
// ---------------------------------------------------------------------------

pub struct AutomationContext {
    // -- Configuration --
    pub config: SystemConfig,

    // -- Sensor data --
    /// Latest measurement.  Stale between scheduler passes.
    pub record: MeasurementRecord,

    // -- Control blocks --
    pub irrigation: IrrigationControl,
    pub fill: SubsystemControl,
    pub lighting: SubsystemControl,
    pub security: SecurityControl,

    // -- Outputs --
    pub outputs: OutputCommands,

    // -- Safety --
    pub safety: SafetySupervisor,
    pub status: SystemStatus,
}

impl AutomationContext {
    /// Irrigation, fill and lighting in automatic mode, security schedule
    /// off, everything off.
    pub fn new(config: SystemConfig) -> Self {
        let max_run_ms = config.pump_max_run_ms;
        Self {
            config,
            record: MeasurementRecord::default(),
            irrigation: IrrigationControl {
                mode: SubsystemControl::automatic(),
                started_at_ms: None,
                max_run_ms,
            },
            fill: SubsystemControl::automatic(),
            lighting: SubsystemControl::automatic(),
            security: SecurityControl::default(),
            outputs: OutputCommands::all_off(),
            safety: SafetySupervisor::new(),
            status: SystemStatus::Normal,
        }
    }

    /// Replace the working record with a fresh measurement.
    pub fn observe(&mut self, record: MeasurementRecord) {
        self.record = record;
    }

    // ── Pump primitives ───────────────────────────────────────────
    //
    // Irrigation and fill share the water line: starting either one
    // stops the other first and drops its override.

    pub(crate) fn start_irrigation(&mut self, now_ms: u64, max_run_ms: u64, reason: &str) {
        if self.outputs.fill_pump {
            self.fill.forced = false;
            self.stop_fill("irrigation takes the line");
        }
        if !self.outputs.irrigation_pump {
            info!("irrigation pump ON ({reason}), limit {max_run_ms} ms");
        }
        self.outputs.irrigation_pump = true;
        self.irrigation.started_at_ms = Some(now_ms);
        self.irrigation.max_run_ms = max_run_ms;
    }

    pub(crate) fn stop_irrigation(&mut self, reason: &str) {
        if self.outputs.irrigation_pump {
            info!("irrigation pump OFF ({reason})");
        }
        self.outputs.irrigation_pump = false;
        self.irrigation.started_at_ms = None;
    }

    pub(crate) fn start_fill(&mut self, reason: &str) {
        if self.outputs.irrigation_pump {
            self.irrigation.mode.forced = false;
            self.stop_irrigation("fill takes the line");
        }
        if !self.outputs.fill_pump {
            info!("fill pump ON ({reason})");
        }
        self.outputs.fill_pump = true;
    }

    pub(crate) fn stop_fill(&mut self, reason: &str) {
        if self.outputs.fill_pump {
            info!("fill pump OFF ({reason})");
        }
        self.outputs.fill_pump = false;
    }

    pub(crate) fn set_lighting(&mut self, on: bool, reason: &str) {
        if self.outputs.lighting != on {
            info!("lighting {} ({reason})", if on { "ON" } else { "OFF" });
        }
        self.outputs.lighting = on;
    }

    /// How long irrigation has been running, `None` while off.
    pub fn irrigation_run_ms(&self, now_ms: u64) -> Option<u64> {
        self.irrigation
            .started_at_ms
            .filter(|_| self.outputs.irrigation_pump)
            .map(|start| now_ms.saturating_sub(start))
    }

    // ── Status ────────────────────────────────────────────────────

    /// Derive the status from the alarm latch and the active faults.
    pub(crate) fn refresh_status(&mut self) {
        self.status = if self.security.alarm_latched {
            SystemStatus::Alarm
        } else {
            let mut status = SystemStatus::Normal;
            if self.safety.has_fault(SafetyFault::ReservoirLow) {
                status = status.merge(SystemStatus::Warning);
            }
            if self.safety.has_fault(SafetyFault::SensorUnavailable) {
                status = status.merge(SystemStatus::SensorError);
            }
            status
        };
    }

    pub fn has_faults(&self) -> bool {
        self.safety.has_faults()
    }
}
