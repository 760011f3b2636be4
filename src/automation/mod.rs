//! Automation state machine.
//!
//! Converts the latest measurement and operator intent into actuator
//! commands.  [`AutomationContext::tick`] runs every controller tick,
//! fresh measurement or not, in a fixed six-step order; each step sees
//! the outputs of the steps before it.
//!
//! ```text
//!  1. security     window → arm/disarm, alarm pulse or trigger
//!  2. reservoir    below critical → WARNING, irrigation off
//!  3. irrigation   auto start / stop on soil moisture
//!  4. timeout      irrigation runtime ceiling
//!  5. lighting     auto on / off with hysteresis
//!  6. fill         auto start / stop on reservoir level
//! ```

pub mod alarm;
pub mod context;
pub mod manual;

pub use context::{
    AutomationContext, IrrigationControl, OutputCommands, ScheduleHold, SecurityControl,
    SubsystemControl,
};

use log::{debug, warn};

use crate::record::Reading;
use crate::safety::ReservoirVerdict;
use crate::scheduler::TimeOfDay;

impl AutomationContext {
    /// One automation tick.
    ///
    /// `motion` is the consumed motion latch, `time_of_day` the wall
    /// clock if it answered in time.  Nothing happens until the first
    /// measurement pass has completed.
    pub fn tick(&mut self, now_ms: u64, motion: bool, time_of_day: Option<TimeOfDay>) {
        if self.record.is_initial() {
            debug!("no measurement yet, automation idle");
            return;
        }

        // ── 1. Security / alarm ───────────────────────────────────
        self.run_security(now_ms, motion, time_of_day);

        // ── 2. Reservoir safety ───────────────────────────────────
        self.safety.check_sensors(&self.record);
        let reservoir = self.safety.check_reservoir(self.record.tank_level, &self.config);
        if reservoir != ReservoirVerdict::Safe && self.outputs.irrigation_pump {
            warn!("reservoir {reservoir:?}: stopping irrigation");
            self.irrigation.mode.forced = false;
            self.stop_irrigation("reservoir safety");
        }

        // ── 3. Irrigation automatic control ───────────────────────
        self.run_irrigation_auto(now_ms);

        // ── 4. Irrigation safety timeout ──────────────────────────
        let run_ms = self.irrigation_run_ms(now_ms);
        if self.safety.check_pump_runtime(run_ms, self.irrigation.max_run_ms) {
            self.irrigation.mode.forced = false;
            self.stop_irrigation("runtime ceiling");
        }

        // ── 5. Lighting automatic control ─────────────────────────
        self.run_lighting_auto();

        // ── 6. Reservoir fill ─────────────────────────────────────
        self.run_fill_auto();
        if self
            .safety
            .check_overflow(self.record.tank_level, self.outputs.fill_pump, &self.config)
        {
            self.fill.forced = false;
            self.stop_fill("overflow ceiling");
        }

        self.refresh_status();
    }

    fn run_irrigation_auto(&mut self, now_ms: u64) {
        let mode = self.irrigation.mode;
        let line_free = !self.fill.forced && !self.outputs.fill_pump;

        if mode.auto_active() && line_free {
            let level_ok = matches!(
                self.record.tank_level,
                Reading::Valid(l) if l > self.config.tank_critical_level
            );
            match self.record.soil_moisture {
                Reading::Valid(m)
                    if m < self.config.moisture_threshold
                        && level_ok
                        && !self.outputs.irrigation_pump =>
                {
                    let max_run = self.config.pump_max_run_ms;
                    self.start_irrigation(now_ms, max_run, "soil dry");
                }
                Reading::Valid(m) if m >= self.config.moisture_stop && self.outputs.irrigation_pump => {
                    self.stop_irrigation("soil wet");
                }
                _ => {}
            }
        } else if !mode.auto && !mode.forced && self.outputs.irrigation_pump {
            self.stop_irrigation("auto disabled");
        }
    }

    fn run_lighting_auto(&mut self) {
        if !self.lighting.auto_active() {
            return;
        }
        let Reading::Valid(light) = self.record.light_level else {
            return;
        };
        if light < self.config.light_threshold_low {
            self.set_lighting(true, "dark");
        } else if light > self.config.light_threshold_high {
            self.set_lighting(false, "bright");
        }
    }

    fn run_fill_auto(&mut self) {
        if !self.fill.auto_active() {
            return;
        }
        let Reading::Valid(level) = self.record.tank_level else {
            return;
        };
        if level < self.config.tank_critical_level && !self.outputs.fill_pump {
            self.start_fill("reservoir low");
        } else if level >= self.config.tank_max_level && self.outputs.fill_pump {
            self.stop_fill("reservoir full");
        }
    }
}
