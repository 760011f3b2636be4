//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor drivers, actuator drivers, clocks, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! Every port call is fire-and-forget or returns `Option`: a driver that
//! cannot answer says so, it never blocks the control loop.

use crate::scheduler::TimeOfDay;
use crate::sensors::Quantity;

// ───────────────────────────────────────────────────────────────
// Raw sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one physical sample per call, no retries, no filtering.
pub trait RawSensorPort {
    /// One raw reading in the quantity's native unit (°C, %RH, ADC
    /// counts, echo µs).  `None` when the driver could not complete the
    /// read.
    fn read_raw(&mut self, quantity: Quantity) -> Option<f32>;

    /// Current level of the PIR output pin.
    fn motion_level(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Switched outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    IrrigationPump,
    FillPump,
    Lighting,
    SecurityIndicator,
}

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Switch one output on or off.
    fn set_output(&mut self, output: Output, on: bool);

    /// Drive the alarm sounder.
    fn set_alarm_tone(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Monotonic milliseconds since boot.
    fn uptime_ms(&self) -> u64;

    /// Local wall-clock time, waiting at most `timeout_ms`.  `None` while
    /// the clock is not synchronised.
    fn time_of_day(&mut self, timeout_ms: u32) -> Option<TimeOfDay>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, web
/// push, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
