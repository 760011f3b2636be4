//! Multi-pass scenarios: the reservoir draining below critical, refilling
//! and recovering, with irrigation and fill never running together.

use crate::mock_hw::{ManualClock, MockGarden, NoDelay, RecordingSink};

use verdant::app::events::AppEvent;
use verdant::app::ports::Output;
use verdant::app::service::AppService;
use verdant::config::SystemConfig;
use verdant::error::SafetyFault;
use verdant::record::{Reading, SystemStatus};

struct Rig {
    app: AppService<NoDelay>,
    hw: MockGarden,
    clock: ManualClock,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let config = SystemConfig {
            measurement_interval_min: 1,
            ..SystemConfig::default()
        };
        let mut app = AppService::new(config, NoDelay);
        let mut hw = MockGarden::new();
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            clock: ManualClock::new(),
            sink,
        }
    }

    /// Advance past the interval and run the tick that measures.
    fn next_pass(&mut self) {
        self.clock.advance(60_001);
        assert!(self.app.tick(&mut self.hw, &mut self.clock, &mut self.sink));
        self.assert_pumps_exclusive();
    }

    fn tick(&mut self) {
        self.clock.advance(100);
        self.app.tick(&mut self.hw, &mut self.clock, &mut self.sink);
        self.assert_pumps_exclusive();
    }

    fn assert_pumps_exclusive(&self) {
        assert!(
            !(self.hw.is_on(Output::IrrigationPump) && self.hw.is_on(Output::FillPump)),
            "both pumps on"
        );
    }
}

#[test]
fn reservoir_drains_refills_and_recovers() {
    let mut rig = Rig::new();
    rig.hw.set_soil_percent(30);
    rig.hw.set_tank_level(25);

    // 25 %: above critical, dry soil → irrigate.
    rig.clock.advance(1);
    rig.app.tick(&mut rig.hw, &mut rig.clock, &mut rig.sink);
    assert!(rig.hw.is_on(Output::IrrigationPump));
    assert_eq!(rig.app.status(), SystemStatus::Normal);

    // 18 %: below critical → irrigation off, fill on, warning.
    rig.hw.set_tank_level(18);
    rig.next_pass();
    assert!(!rig.hw.is_on(Output::IrrigationPump));
    assert!(rig.hw.is_on(Output::FillPump));
    assert_eq!(rig.app.status(), SystemStatus::Warning);
    assert!(rig.sink.contains(&AppEvent::StatusChanged {
        from: SystemStatus::Normal,
        to: SystemStatus::Warning,
    }));
    assert!(rig.sink.contains(&AppEvent::FaultDetected(SafetyFault::ReservoirLow.mask())));

    // 14 %: still low; manual irrigation is refused.
    rig.hw.set_tank_level(14);
    rig.next_pass();
    rig.app
        .handle_action(r#"{"forceIrrigation": true}"#, &mut rig.hw, &mut rig.clock, &mut rig.sink)
        .unwrap();
    assert!(!rig.hw.is_on(Output::IrrigationPump));
    assert!(!rig.app.context().irrigation.mode.forced);
    rig.app
        .handle_action(r#"{"irrigationAuto": true}"#, &mut rig.hw, &mut rig.clock, &mut rig.sink)
        .unwrap();

    // 22 %: above critical but inside the hysteresis band → still warning.
    rig.hw.set_tank_level(22);
    rig.next_pass();
    assert_eq!(rig.app.status(), SystemStatus::Warning);
    assert!(rig.hw.is_on(Output::FillPump));
    assert!(!rig.hw.is_on(Output::IrrigationPump), "line busy while filling");

    // 26 %: warning clears, filling continues up to the maximum.
    rig.hw.set_tank_level(26);
    rig.next_pass();
    assert_eq!(rig.app.status(), SystemStatus::Normal);
    assert!(rig.sink.contains(&AppEvent::FaultCleared));
    assert!(rig.hw.is_on(Output::FillPump));

    // 100 %: fill stops; irrigation resumes on the following tick.
    rig.hw.set_tank_level(100);
    rig.next_pass();
    assert!(!rig.hw.is_on(Output::FillPump));
    rig.tick();
    assert!(rig.hw.is_on(Output::IrrigationPump));
}

#[test]
fn lost_echo_stops_irrigation_without_warning() {
    let mut rig = Rig::new();
    rig.hw.set_soil_percent(30);
    rig.clock.advance(1);
    rig.app.tick(&mut rig.hw, &mut rig.clock, &mut rig.sink);
    assert!(rig.hw.is_on(Output::IrrigationPump));

    rig.hw.tank_cm = None;
    rig.next_pass();
    assert_eq!(rig.app.snapshot().tank_level, Reading::Invalid);
    assert!(!rig.hw.is_on(Output::IrrigationPump));
    assert!(!rig.hw.is_on(Output::FillPump));
    assert_eq!(rig.app.status(), SystemStatus::SensorError);

    rig.hw.set_tank_level(60);
    rig.next_pass();
    assert_eq!(rig.app.status(), SystemStatus::Normal);
    assert!(rig.hw.is_on(Output::IrrigationPump));
}

#[test]
fn alarm_outranks_reservoir_warning() {
    let mut rig = Rig::new();
    rig.hw.set_tank_level(10);
    rig.clock.advance(1);
    rig.app.tick(&mut rig.hw, &mut rig.clock, &mut rig.sink);
    assert_eq!(rig.app.status(), SystemStatus::Warning);

    rig.app
        .handle_action(r#"{"security": true}"#, &mut rig.hw, &mut rig.clock, &mut rig.sink)
        .unwrap();
    rig.hw.pir = true;
    rig.app.motion_latch().signal();
    rig.tick();
    assert_eq!(rig.app.status(), SystemStatus::Alarm);

    // Reservoir recovers while the alarm is latched: status stays Alarm.
    rig.hw.set_tank_level(40);
    rig.next_pass();
    assert_eq!(rig.app.status(), SystemStatus::Alarm);
    assert_eq!(rig.app.fault_flags() & SafetyFault::ReservoirLow.mask(), 0);

    rig.app
        .handle_action(r#"{"security": false}"#, &mut rig.hw, &mut rig.clock, &mut rig.sink)
        .unwrap();
    assert_eq!(rig.app.status(), SystemStatus::Normal);
    assert!(!rig.hw.is_on(Output::SecurityIndicator));
    assert!(!rig.hw.tone_on());
}
