//! Security subsystem: arm / disarm, the motion alarm latch, the tone
//! pulse and day/night window evaluation.
//!
//! Once latched the alarm stays latched until an operator clears it or
//! disarms.  The window never disarms over a latched alarm; it waits
//! until the alarm has been cleared.

use log::{debug, info, warn};

use super::context::{AutomationContext, ScheduleHold};
use crate::scheduler::TimeOfDay;

impl AutomationContext {
    /// Arm or disarm.  Disarming also clears a latched alarm.
    pub(crate) fn set_armed(&mut self, armed: bool, reason: &str) {
        if self.security.armed != armed {
            info!("security {} ({reason})", if armed { "ARMED" } else { "DISARMED" });
        }
        self.security.armed = armed;
        if !armed && self.security.alarm_latched {
            self.security.alarm_latched = false;
            self.security.pulse_phase = false;
            info!("alarm cleared by disarm");
        }
        // Re-arming over a latched alarm leaves the pulse running.
        if armed && self.security.alarm_latched {
            return;
        }
        self.outputs.alarm_tone = false;
        self.outputs.security_indicator = armed;
    }

    /// Latch the alarm and start the pulse in its tone phase.
    pub(crate) fn trigger_alarm(&mut self, now_ms: u64) {
        warn!("motion while armed: ALARM latched");
        self.security.alarm_latched = true;
        self.security.pulse_phase = true;
        self.security.last_toggle_ms = now_ms;
        self.outputs.alarm_tone = true;
        self.outputs.security_indicator = false;
    }

    /// Advance the alarm pulse.  Tone and indicator alternate once per
    /// `alarm_pulse_ms`, whatever the tick rate.
    pub(crate) fn pulse_alarm(&mut self, now_ms: u64) {
        let period = self.config.alarm_pulse_ms;
        if now_ms.saturating_sub(self.security.last_toggle_ms) < period {
            return;
        }
        self.security.pulse_phase = !self.security.pulse_phase;
        self.security.last_toggle_ms = now_ms;
        self.outputs.alarm_tone = self.security.pulse_phase;
        self.outputs.security_indicator = !self.security.pulse_phase;
    }

    /// Operator acknowledgement.  Returns `false` (and changes nothing)
    /// when no alarm is latched.
    pub fn clear_alarm(&mut self) -> bool {
        if !self.security.alarm_latched {
            debug!("clear_alarm: no alarm latched");
            return false;
        }
        info!("alarm cleared by operator");
        self.security.alarm_latched = false;
        self.security.pulse_phase = false;
        self.outputs.alarm_tone = false;
        self.outputs.security_indicator = self.security.armed;
        self.refresh_status();
        true
    }

    /// Window evaluation.  `now` is `None` when the wall clock did not
    /// answer in time; evaluation is skipped for this tick.
    pub(crate) fn evaluate_window(&mut self, now: Option<TimeOfDay>) {
        if !self.security.auto {
            return;
        }
        let Some(window) = self.security.window else {
            return;
        };
        let Some(now) = now else {
            debug!("wall clock unavailable, security window skipped");
            return;
        };
        let inside = window.contains(now);

        match self.security.hold {
            ScheduleHold::Pending => {
                self.security.hold = ScheduleHold::Holding(inside);
                return;
            }
            ScheduleHold::Holding(side) if side == inside => return,
            ScheduleHold::Holding(_) => {
                info!("security window edge at {now}, schedule resumes");
                self.security.hold = ScheduleHold::Off;
            }
            ScheduleHold::Off => {}
        }

        if inside && !self.security.armed {
            self.set_armed(true, "window opened");
        } else if !inside && self.security.armed {
            if self.security.alarm_latched {
                debug!("window closed with alarm latched, disarm deferred");
            } else {
                self.set_armed(false, "window closed");
            }
        }
    }

    /// Step 1 of the tick: schedule, then pulse or trigger.
    pub(crate) fn run_security(&mut self, now_ms: u64, motion: bool, tod: Option<TimeOfDay>) {
        self.evaluate_window(tod);

        if !self.security.armed {
            return;
        }
        if self.security.alarm_latched {
            self.pulse_alarm(now_ms);
        } else if motion {
            self.trigger_alarm(now_ms);
        }
    }
}
