//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the automation context, measurement scheduler,
//! history log and sensor suite.  It exposes a clean, hardware-agnostic
//! API.  All I/O flows through port traits injected at call sites, making
//! the entire service testable with mock adapters.
//!
//! ```text
//!  RawSensorPort ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!  ClockPort     ──▶ │        AppService         │
//!  ActuatorPort  ◀── │ Scheduler · Sensors · Auto│
//!                    └───────────────────────────┘
//! ```

use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::automation::{AutomationContext, OutputCommands};
use crate::config::SystemConfig;
use crate::error::Result;
use crate::history::HistoryLog;
use crate::record::{MeasurementRecord, SystemStatus};
use crate::scheduler::MeasurementScheduler;
use crate::sensors::SensorSuite;
use crate::sensors::motion::MotionLatch;

use super::action::ActionRequest;
use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, EventSink, Output, RawSensorPort};
use super::snapshot::{DataReport, Snapshot, StatusView};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<D> {
    ctx: AutomationContext,
    scheduler: MeasurementScheduler,
    history: HistoryLog,
    sensors: SensorSuite<D>,
    motion: Arc<MotionLatch>,
    /// Outputs as last driven through the actuator port; `None` until
    /// the first apply, which drives every output.
    applied: Option<OutputCommands>,
    last_status: SystemStatus,
    last_faults: u8,
    tick_count: u64,
}

impl<D: DelayNs> AppService<D> {
    /// Construct the service.  `delay` paces the reads inside each burst.
    ///
    /// Does **not** drive any output: call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, delay: D) -> Self {
        Self {
            ctx: AutomationContext::new(config),
            scheduler: MeasurementScheduler::new(),
            history: HistoryLog::new(),
            sensors: SensorSuite::new(delay),
            motion: Arc::new(MotionLatch::new()),
            applied: None,
            last_status: SystemStatus::Normal,
            last_faults: 0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its initial (off) state and announce start.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.applied = None;
        self.apply_actuators(hw, sink);
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started, measuring every {} min",
            self.ctx.config.measurement_interval_min
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: measure if due → automation → actuators.
    ///
    /// The `hw` parameter satisfies **both** [`RawSensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    ///
    /// Returns `true` when a fresh measurement was taken this tick.
    pub fn tick(
        &mut self,
        hw: &mut (impl RawSensorPort + ActuatorPort),
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> bool {
        self.tick_count += 1;
        let now = clock.uptime_ms();
        let alarm_before = self.ctx.security.alarm_latched;

        // 1. Measurement pass, if due
        let interval = self.ctx.config.measurement_interval_ms();
        let actuators = self.ctx.outputs.flags();
        let sensors = &mut self.sensors;
        let config = &self.ctx.config;
        let motion = &self.motion;
        let fresh = self.scheduler.poll(now, interval, || {
            sensors.measure(hw, config, motion, actuators, now)
        });
        if let Some(record) = fresh {
            self.ctx.observe(record);
        }

        // 2. Motion is the consumed edge or the live PIR level; ask the
        //    wall clock only when a window will actually be evaluated
        let motion = self.motion.take() || hw.motion_level();
        let schedule_active = self.ctx.security.auto && self.ctx.security.window.is_some();
        let time_of_day = if schedule_active {
            clock.time_of_day(self.ctx.config.clock_timeout_ms)
        } else {
            None
        };

        // 3. Automation
        self.ctx.tick(now, motion, time_of_day);

        // A fresh record carries the status its own readings produced.
        if fresh.is_some() {
            self.ctx.record.status = self.ctx.status;
            let record = self.ctx.record;
            self.history.push(record);
            sink.emit(&AppEvent::MeasurementTaken(record));
        }

        // 4. Apply actuator commands via ActuatorPort, then report
        self.apply_actuators(hw, sink);
        self.emit_transitions(alarm_before, sink);

        fresh.is_some()
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an operator command.  Only a malformed security schedule
    /// can fail; the current window is then left unchanged.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let now = clock.uptime_ms();
        let alarm_before = self.ctx.security.alarm_latched;

        let result = match cmd {
            AppCommand::SetIrrigationAuto(on) => {
                self.ctx.set_irrigation_auto(on);
                Ok(())
            }
            AppCommand::ForceIrrigation { on, duration_min } => {
                self.ctx.set_irrigation_manual(on, duration_min, now);
                Ok(())
            }
            AppCommand::SetFillAuto(on) => {
                self.ctx.set_fill_auto(on);
                Ok(())
            }
            AppCommand::ForceFill(on) => {
                self.ctx.set_fill_manual(on);
                Ok(())
            }
            AppCommand::SetSecurityAuto(on) => {
                self.ctx.set_security_auto(on);
                Ok(())
            }
            AppCommand::SetSecurity(on) => {
                self.ctx.set_security_manual(on);
                Ok(())
            }
            AppCommand::SetSecuritySchedule { start, end } => {
                self.ctx.set_security_schedule(&start, &end)
            }
            AppCommand::ClearAlarm => {
                self.ctx.clear_alarm();
                Ok(())
            }
            AppCommand::SetLightingAuto(on) => {
                self.ctx.set_lighting_auto(on);
                Ok(())
            }
            AppCommand::ForceLighting(on) => {
                self.ctx.set_lighting_manual(on);
                Ok(())
            }
            AppCommand::UpdateConfig(update) => {
                self.ctx.update_config(&update);
                Ok(())
            }
        };

        self.apply_actuators(hw, sink);
        self.emit_transitions(alarm_before, sink);
        result
    }

    /// Parse a JSON action body and run every command in it.  All
    /// commands are attempted; the first failure is returned.
    pub fn handle_action(
        &mut self,
        body: &str,
        hw: &mut impl ActuatorPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let mut first_err = None;
        for cmd in ActionRequest::from_json(body)?.into_commands() {
            if let Err(e) = self.handle_command(cmd, hw, clock, sink) {
                warn!("action rejected: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current record with live actuator flags and status.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_context(&self.ctx)
    }

    pub fn status_view(&self) -> StatusView {
        StatusView::from_context(&self.ctx)
    }

    /// Snapshot plus chart history.
    pub fn data_report(&self) -> DataReport {
        DataReport::new(&self.ctx, &self.history)
    }

    /// History, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &MeasurementRecord> + '_ {
        self.history.iter()
    }

    pub fn status(&self) -> SystemStatus {
        self.ctx.status
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }

    /// Handle for the PIR interrupt to signal motion edges into.
    pub fn motion_latch(&self) -> Arc<MotionLatch> {
        Arc::clone(&self.motion)
    }

    pub fn outputs(&self) -> OutputCommands {
        self.ctx.outputs
    }

    /// Current active fault bitmask (0 = no faults).
    pub fn fault_flags(&self) -> u8 {
        self.ctx.safety.faults()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Read access to the automation state.
    pub fn context(&self) -> &AutomationContext {
        &self.ctx
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drive the outputs that changed since the last apply.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let want = self.ctx.outputs;
        let prev = self.applied;

        let switched = [
            (Output::IrrigationPump, want.irrigation_pump, prev.map(|p| p.irrigation_pump)),
            (Output::FillPump, want.fill_pump, prev.map(|p| p.fill_pump)),
            (Output::Lighting, want.lighting, prev.map(|p| p.lighting)),
        ];
        for (output, on, before) in switched {
            if before != Some(on) {
                hw.set_output(output, on);
                if before.is_some() {
                    sink.emit(&AppEvent::OutputChanged { output, on });
                }
            }
        }

        // Indicator and tone pulse at alarm rate; drive them silently.
        if prev.map(|p| p.security_indicator) != Some(want.security_indicator) {
            hw.set_output(Output::SecurityIndicator, want.security_indicator);
        }
        if prev.map(|p| p.alarm_tone) != Some(want.alarm_tone) {
            hw.set_alarm_tone(want.alarm_tone);
        }

        self.applied = Some(want);
    }

    fn emit_transitions(&mut self, alarm_before: bool, sink: &mut impl EventSink) {
        let alarm_now = self.ctx.security.alarm_latched;
        if alarm_now && !alarm_before {
            sink.emit(&AppEvent::AlarmTriggered);
        } else if alarm_before && !alarm_now {
            sink.emit(&AppEvent::AlarmCleared);
        }

        let status = self.ctx.status;
        if status != self.last_status {
            info!("status {:?} -> {:?}", self.last_status, status);
            sink.emit(&AppEvent::StatusChanged {
                from: self.last_status,
                to: status,
            });
            self.last_status = status;
        }

        let faults = self.ctx.safety.faults();
        if faults != self.last_faults {
            if faults != 0 {
                warn!("Safety faults: flags=0b{faults:08b}");
                sink.emit(&AppEvent::FaultDetected(faults));
            } else {
                sink.emit(&AppEvent::FaultCleared);
            }
            self.last_faults = faults;
        }
    }
}
