//! Measurement and security scheduling.
//!
//! Both schedulers are decision engines only: the measurement scheduler
//! decides *when* a full pass runs and records it, the security window
//! decides *whether* now is inside the armed period.  Neither touches
//! hardware directly.
//!
//! ```text
//!                     AppService.tick()
//!                            │
//!          ┌─────────────────┴─────────────────┐
//!          ▼                                   ▼
//!  MeasurementScheduler                  SecurityWindow
//!  (uptime, interval)                    (wall clock, HH:MM)
//!          │ pass due                          │ inside?
//!          ▼                                   ▼
//!  SensorSuite.measure()               automation arm / disarm
//!          │
//!          ▼
//!  automation tick → HistoryLog.push()
//! ```

pub mod security;

use log::info;

use crate::record::MeasurementRecord;

pub use security::{SecurityWindow, TimeOfDay};

/// Decides on each tick whether a new full-environment pass is due.
#[derive(Debug, Clone, Default)]
pub struct MeasurementScheduler {
    /// Uptime of the last completed pass; `None` before the first one.
    last_measurement_ms: Option<u64>,
}

impl MeasurementScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pass is due when none has run yet, or when strictly more than
    /// `interval_ms` has elapsed since the last one.
    pub fn is_due(&self, now_ms: u64, interval_ms: u64) -> bool {
        match self.last_measurement_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > interval_ms,
        }
    }

    /// Run `pass` if due and return its record.
    ///
    /// Returns `None` when no measurement was taken this tick.  The caller
    /// appends the record to the history once the tick's status is known.
    pub fn poll<F>(&mut self, now_ms: u64, interval_ms: u64, pass: F) -> Option<MeasurementRecord>
    where
        F: FnOnce() -> MeasurementRecord,
    {
        if !self.is_due(now_ms, interval_ms) {
            return None;
        }
        let record = pass();
        self.last_measurement_ms = Some(now_ms);
        info!("measurement pass complete, next in {} s", interval_ms / 1000);
        Some(record)
    }

    pub fn last_measurement_ms(&self) -> Option<u64> {
        self.last_measurement_ms
    }
}
