//! Fuzz target: `AppService::handle_action`
//!
//! Feeds arbitrary bodies to the operator action path after one healthy
//! measurement pass.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - The irrigation and fill pumps are never commanded on together
//! - A body that fails to parse leaves every output untouched
//!
//! cargo fuzz run fuzz_action_request

#![no_main]

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use verdant::app::events::AppEvent;
use verdant::app::ports::{ActuatorPort, ClockPort, EventSink, Output, RawSensorPort};
use verdant::app::service::AppService;
use verdant::config::SystemConfig;
use verdant::error::Error;
use verdant::scheduler::TimeOfDay;
use verdant::sensors::Quantity;

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Default)]
struct Garden {
    pumps: [bool; 2],
}

impl RawSensorPort for Garden {
    fn read_raw(&mut self, quantity: Quantity) -> Option<f32> {
        Some(match quantity {
            Quantity::AmbientTemperature => 21.0,
            Quantity::AmbientHumidity => 50.0,
            Quantity::SoilTemperature => 18.0,
            Quantity::SoilMoisture => 1750.0,
            Quantity::Light => 1850.0,
            Quantity::EchoRoundTrip => 650.0,
        })
    }

    fn motion_level(&mut self) -> bool {
        false
    }
}

impl ActuatorPort for Garden {
    fn set_output(&mut self, output: Output, on: bool) {
        match output {
            Output::IrrigationPump => self.pumps[0] = on,
            Output::FillPump => self.pumps[1] = on,
            _ => {}
        }
        assert!(!(self.pumps[0] && self.pumps[1]), "both pumps on");
    }

    fn set_alarm_tone(&mut self, _on: bool) {}
}

struct Clock;

impl ClockPort for Clock {
    fn uptime_ms(&self) -> u64 {
        1_000
    }

    fn time_of_day(&mut self, _timeout_ms: u32) -> Option<TimeOfDay> {
        TimeOfDay::new(23, 0)
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(body) = core::str::from_utf8(data) else {
        return;
    };

    let mut app = AppService::new(SystemConfig::default(), NoDelay);
    let mut hw = Garden::default();
    app.start(&mut hw, &mut Discard);
    app.tick(&mut hw, &mut Clock, &mut Discard);

    let before = app.outputs();
    if let Err(Error::Request(_)) = app.handle_action(body, &mut hw, &mut Clock, &mut Discard) {
        assert_eq!(app.outputs(), before);
    }
    app.tick(&mut hw, &mut Clock, &mut Discard);
});
