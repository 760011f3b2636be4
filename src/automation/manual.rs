//! Operator overrides.
//!
//! One rule for irrigation, fill and lighting: a manual action turns the
//! subsystem's auto flag off, and it stays off until the operator turns
//! it back on.  Manual irrigation is still gated by the reservoir check,
//! and the two pumps keep excluding each other.
//!
//! Security is different.  A manual arm or disarm leaves the schedule
//! flag alone and puts the window on hold until its next edge.

use log::{info, warn};

use super::context::{AutomationContext, ScheduleHold};
use crate::config::ConfigUpdate;
use crate::error::Result;
use crate::record::Reading;
use crate::scheduler::SecurityWindow;

impl AutomationContext {
    // ── Irrigation ────────────────────────────────────────────────

    /// Enable or disable automatic irrigation.  Either way, a pump that
    /// is running under automatic control stops; auto picks it up again
    /// on the next tick if the soil is still dry.
    pub fn set_irrigation_auto(&mut self, enabled: bool) {
        self.irrigation.mode.auto = enabled;
        if self.outputs.irrigation_pump && !self.irrigation.mode.forced {
            self.stop_irrigation("auto mode changed");
        }
        info!("irrigation auto: {}", on_off(enabled));
    }

    /// Manual irrigation: auto off, then force.
    pub fn set_irrigation_manual(&mut self, enable: bool, duration_min: Option<u32>, now_ms: u64) {
        self.irrigation.mode.auto = false;
        self.force_irrigation(enable, duration_min, now_ms);
    }

    /// Force the irrigation pump.  `duration_min` of `None` or `0` uses
    /// the configured ceiling.  Starting is refused (and the force
    /// dropped) unless the reservoir is known to be above critical; a
    /// refused start leaves a running fill alone.
    pub fn force_irrigation(&mut self, enable: bool, duration_min: Option<u32>, now_ms: u64) {
        if !enable {
            self.irrigation.mode.forced = false;
            self.stop_irrigation("manual off");
            return;
        }

        let max_run_ms = match duration_min {
            Some(min) if min > 0 => u64::from(min) * 60_000,
            _ => self.config.pump_max_run_ms,
        };
        match self.record.tank_level {
            Reading::Valid(level) if level > self.config.tank_critical_level => {
                self.irrigation.mode.forced = true;
                self.start_irrigation(now_ms, max_run_ms, "manual");
            }
            level => {
                warn!("manual irrigation refused: reservoir {level:?} not above critical");
                self.irrigation.mode.forced = false;
            }
        }
    }

    // ── Reservoir fill ────────────────────────────────────────────

    pub fn set_fill_auto(&mut self, enabled: bool) {
        self.fill.auto = enabled;
        info!("fill auto: {}", on_off(enabled));
    }

    /// Manual fill: auto off, then force.
    pub fn set_fill_manual(&mut self, enable: bool) {
        self.fill.auto = false;
        self.force_fill(enable);
    }

    /// Force the fill pump on or off.  Starting stops irrigation and
    /// drops its override.
    pub fn force_fill(&mut self, enable: bool) {
        self.fill.forced = enable;
        if enable {
            self.start_fill("manual");
        } else {
            self.stop_fill("manual off");
        }
    }

    // ── Lighting ──────────────────────────────────────────────────

    /// Re-enabling auto drops the manual override.
    pub fn set_lighting_auto(&mut self, enabled: bool) {
        self.lighting.auto = enabled;
        if enabled {
            self.lighting.forced = false;
        }
        info!("lighting auto: {}", on_off(enabled));
    }

    /// Any manual lighting action is sticky until auto is re-enabled.
    pub fn set_lighting_manual(&mut self, on: bool) {
        self.lighting.auto = false;
        self.lighting.forced = true;
        self.set_lighting(on, "manual");
    }

    // ── Security ──────────────────────────────────────────────────

    /// Enable or disable window evaluation.  Disabling while armed
    /// disarms; enabling releases any manual hold.
    pub fn set_security_auto(&mut self, enabled: bool) {
        self.security.auto = enabled;
        self.security.hold = ScheduleHold::Off;
        if !enabled && self.security.armed {
            self.set_armed(false, "schedule disabled");
        }
        self.refresh_status();
        info!("security auto: {}", on_off(enabled));
    }

    /// Manual arm / disarm.  The schedule flag is untouched; the window
    /// is held until its next edge.
    pub fn set_security_manual(&mut self, armed: bool) {
        self.set_armed(armed, "manual");
        if self.security.auto && self.security.window.is_some() {
            self.security.hold = ScheduleHold::Pending;
        }
        self.refresh_status();
    }

    /// Install a window from two `"HH:MM"` strings.  A malformed string
    /// leaves the current window in place.
    pub fn set_security_schedule(&mut self, start: &str, end: &str) -> Result<()> {
        let window = SecurityWindow::parse(start, end)?;
        info!("security window set: {window}");
        self.security.window = Some(window);
        Ok(())
    }

    // ── Configuration ─────────────────────────────────────────────

    /// Bulk configuration update; takes effect on the next tick.
    pub fn update_config(&mut self, update: &ConfigUpdate) {
        self.config.apply(update);
        info!("configuration updated");
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "OFF" }
}
