//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                     |
//! |------------|----------------|---------------------------------|
//! | `log_sink` | EventSink      | `log` facade                    |
//! | `time`     | ClockPort      | `std::time` (uptime, wall clock)|
//! |            | DelayNs        | `std::thread::sleep`            |
//! | `sim`      | RawSensorPort  | Simulated garden (`sim` feature)|
//! |            | ActuatorPort   |                                 |

pub mod log_sink;
#[cfg(feature = "sim")]
pub mod sim;
pub mod time;
