//! Safety supervisor.
//!
//! The supervisor is consulted by the automation tick at fixed points and
//! accumulates a fault bitmask.  Each check returns a verdict the caller
//! acts on (stop a pump, clear a force flag); the bitmask itself only
//! feeds the status computation and the fault events.
//!
//! ## Fault lifecycle
//!
//! 1. A condition triggers a fault (reservoir low, pump ran too long).
//! 2. The supervisor sets the corresponding bit and logs the edge.
//! 3. The automation tick forces the affected actuator off.
//! 4. Every later check re-evaluates.  When the condition clears, the
//!    bit is unset and the clearing edge is logged.
//!
//! The reservoir-low bit is latched with hysteresis: it sets below the
//! critical level and only clears once the level has climbed
//! `tank_hysteresis` points above it.  Several faults may be active at
//! once.

use crate::config::SystemConfig;
use crate::error::SafetyFault;
use crate::record::{MeasurementRecord, Reading};
use log::{error, info, warn};

/// What the reservoir reading allows irrigation to do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservoirVerdict {
    /// Level valid and not below critical.
    Safe,
    /// Level valid and below critical.
    Low,
    /// No trustworthy level this pass.
    Unknown,
}

/// Safety supervisor.
#[derive(Debug, Clone, Default)]
pub struct SafetySupervisor {
    /// Latched fault bitmask.
    faults: u8,
}

impl SafetySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reservoir check: latches [`SafetyFault::ReservoirLow`] below the
    /// critical level and releases it at the recovery level.
    pub fn check_reservoir(&mut self, level: Reading<u8>, config: &SystemConfig) -> ReservoirVerdict {
        let Reading::Valid(level) = level else {
            return ReservoirVerdict::Unknown;
        };
        if level < config.tank_critical_level {
            self.eval_fault(SafetyFault::ReservoirLow, true);
            ReservoirVerdict::Low
        } else {
            if u16::from(level) >= config.tank_recovery_level() {
                self.eval_fault(SafetyFault::ReservoirLow, false);
            }
            ReservoirVerdict::Safe
        }
    }

    /// Irrigation runtime ceiling.  `run_ms` is how long the pump has
    /// been running, `None` when it is off.  Returns `true` when the pump
    /// must stop.
    pub fn check_pump_runtime(&mut self, run_ms: Option<u64>, max_run_ms: u64) -> bool {
        let exceeded = run_ms.is_some_and(|ms| ms > max_run_ms);
        if exceeded {
            warn!("irrigation ran {} ms, ceiling is {max_run_ms} ms", run_ms.unwrap_or_default());
        }
        self.eval_fault(SafetyFault::PumpRuntimeExceeded, exceeded);
        exceeded
    }

    /// Overflow ceiling for the fill pump.  Returns `true` when a running
    /// fill pump must stop.
    pub fn check_overflow(&mut self, level: Reading<u8>, fill_running: bool, config: &SystemConfig) -> bool {
        let full = matches!(level, Reading::Valid(l) if l >= config.tank_max_level);
        let overflow = fill_running && full;
        self.eval_fault(SafetyFault::ReservoirFull, overflow);
        overflow
    }

    /// Flags quantities the status and the reservoir logic depend on.
    pub fn check_sensors(&mut self, record: &MeasurementRecord) {
        let missing = !record.ambient_temp.is_valid()
            || !record.ambient_humidity.is_valid()
            || !record.tank_level.is_valid();
        self.eval_fault(SafetyFault::SensorUnavailable, missing);
    }

    /// Current fault bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// True if **any** fault is active.
    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    /// Check if a specific fault is active.
    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.faults & fault.mask() != 0
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Set or clear a fault bit based on a boolean condition.
    fn eval_fault(&mut self, fault: SafetyFault, condition: bool) {
        if condition {
            if self.faults & fault.mask() == 0 {
                error!("SAFETY FAULT SET: {fault}");
            }
            self.faults |= fault.mask();
        } else {
            if self.faults & fault.mask() != 0 {
                info!("SAFETY FAULT CLEARED: {fault}");
            }
            self.faults &= !fault.mask();
        }
    }
}
