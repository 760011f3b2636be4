//! Host time adapters.
//!
//! - [`HostClock`] implements [`ClockPort`]: monotonic uptime from
//!   `std::time::Instant`, wall-clock time of day from the system clock
//!   shifted by a fixed UTC offset.
//! - [`ThreadDelay`] implements `embedded_hal::delay::DelayNs` by
//!   sleeping the calling thread.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;
use crate::scheduler::TimeOfDay;

/// Anything earlier than 2020-01-01 means the wall clock was never set.
const EPOCH_2020: u64 = 1_577_836_800;

/// Clock backed by the host operating system.
pub struct HostClock {
    start: Instant,
    utc_offset_min: i32,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HostClock {
    /// `utc_offset_min` is added to UTC to get local time.
    pub fn new(utc_offset_min: i32) -> Self {
        Self {
            start: Instant::now(),
            utc_offset_min,
        }
    }
}

impl ClockPort for HostClock {
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// The system clock answers immediately, so the timeout is unused.
    fn time_of_day(&mut self, _timeout_ms: u32) -> Option<TimeOfDay> {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        if secs < EPOCH_2020 {
            return None;
        }
        local_time_of_day(secs, self.utc_offset_min)
    }
}

/// Time of day for a Unix timestamp shifted by `offset_min`.
fn local_time_of_day(unix_secs: u64, offset_min: i32) -> Option<TimeOfDay> {
    let minute_of_day = (unix_secs / 60) as i64 % 1440 + i64::from(offset_min);
    let m = minute_of_day.rem_euclid(1440);
    TimeOfDay::new((m / 60) as u8, (m % 60) as u8)
}

/// Blocking delay for host builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
