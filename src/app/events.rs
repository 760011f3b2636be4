//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, push to the web UI,
//! record in a test.

use crate::record::{MeasurementRecord, SystemStatus};

use super::ports::Output;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// A full measurement pass completed and was appended to history.
    MeasurementTaken(MeasurementRecord),

    /// Overall status moved.
    StatusChanged { from: SystemStatus, to: SystemStatus },

    /// Motion while armed latched the alarm.
    AlarmTriggered,

    /// The latched alarm was cleared (acknowledged or disarmed).
    AlarmCleared,

    /// An output was switched.
    OutputChanged { output: Output, on: bool },

    /// The safety fault mask changed and is non-zero.
    FaultDetected(u8),

    /// All safety faults have been cleared.
    FaultCleared,
}
