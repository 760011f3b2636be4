//! Integration tests for the AppService → automation → actuators pipeline.
//!
//! These run on the host and drive the full chain, from raw sensor reads
//! and operator action bodies down to actuator calls, against the mock
//! adapters.

use crate::mock_hw::{ManualClock, MockGarden, NoDelay, RecordingSink};

use verdant::app::commands::AppCommand;
use verdant::app::events::AppEvent;
use verdant::app::ports::Output;
use verdant::app::service::AppService;
use verdant::config::SystemConfig;
use verdant::error::{Error, SafetyFault, ScheduleError};
use verdant::record::{Reading, SystemStatus};

const INTERVAL_MS: u64 = 60_000;

fn make_app() -> (AppService<NoDelay>, MockGarden, ManualClock, RecordingSink) {
    let config = SystemConfig {
        measurement_interval_min: 1,
        ..SystemConfig::default()
    };
    let mut app = AppService::new(config, NoDelay);
    let mut hw = MockGarden::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, ManualClock::new(), sink)
}

// ── Measurement cadence ───────────────────────────────────────

#[test]
fn first_tick_measures_immediately() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    assert!(app.snapshot().last_measurement_time.is_none());

    clock.advance(5);
    assert!(app.tick(&mut hw, &mut clock, &mut sink));

    let snap = app.snapshot();
    assert_eq!(snap.last_measurement_time, Some(5));
    assert_eq!(snap.temp, Reading::Valid(21.0));
    assert_eq!(snap.soil_moisture, Reading::Valid(60));
    assert_eq!(snap.tank_level, Reading::Valid(60));
    assert_eq!(snap.light, Reading::Valid(55));
    assert_eq!(app.history().count(), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::MeasurementTaken(_))), 1);
    assert_eq!(app.status(), SystemStatus::Normal);
}

#[test]
fn measurements_follow_the_interval() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    assert!(app.tick(&mut hw, &mut clock, &mut sink));

    clock.advance(INTERVAL_MS);
    assert!(!app.tick(&mut hw, &mut clock, &mut sink), "exactly one interval is not yet due");

    clock.advance(1);
    assert!(app.tick(&mut hw, &mut clock, &mut sink));
    assert_eq!(app.history().count(), 2);
    assert_eq!(app.tick_count(), 3);
}

#[test]
fn history_records_carry_previous_actuator_state() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.set_soil_percent(30);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.is_on(Output::IrrigationPump));

    clock.advance(INTERVAL_MS + 1);
    app.tick(&mut hw, &mut clock, &mut sink);

    let flags: Vec<bool> = app.history().map(|r| r.actuators.irrigation).collect();
    assert_eq!(flags, vec![false, true]);
}

#[test]
fn history_record_status_reflects_its_own_readings() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.humidity = None;
    app.tick(&mut hw, &mut clock, &mut sink);

    let statuses: Vec<SystemStatus> = app.history().map(|r| r.status).collect();
    assert_eq!(statuses, vec![SystemStatus::SensorError]);
    assert!(sink.contains(&AppEvent::MeasurementTaken(app.context().record)));

    hw.humidity = Some(50.0);
    clock.advance(INTERVAL_MS + 1);
    app.tick(&mut hw, &mut clock, &mut sink);
    let statuses: Vec<SystemStatus> = app.history().map(|r| r.status).collect();
    assert_eq!(statuses, vec![SystemStatus::SensorError, SystemStatus::Normal]);
}

// ── Automation through the service ────────────────────────────

#[test]
fn dry_soil_switches_the_pump_once() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.set_soil_percent(30);

    app.tick(&mut hw, &mut clock, &mut sink);
    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);

    assert!(hw.is_on(Output::IrrigationPump));
    assert_eq!(hw.count(Output::IrrigationPump, true), 1, "no redundant writes");
    assert_eq!(
        sink.count(|e| *e == AppEvent::OutputChanged {
            output: Output::IrrigationPump,
            on: true
        }),
        1
    );
    assert!(app.status_view().pump);
}

#[test]
fn forced_irrigation_honours_duration_then_clears_fault() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);

    app.handle_action(
        r#"{"forceIrrigation": true, "duration": 1}"#,
        &mut hw,
        &mut clock,
        &mut sink,
    )
    .unwrap();
    assert!(hw.is_on(Output::IrrigationPump));
    assert!(!app.status_view().irrigation_auto);

    clock.advance(60_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.is_on(Output::IrrigationPump), "ceiling is exclusive");

    clock.advance(1);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(!hw.is_on(Output::IrrigationPump));
    assert!(sink.contains(&AppEvent::FaultDetected(SafetyFault::PumpRuntimeExceeded.mask())));

    clock.advance(100);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert_eq!(app.fault_flags(), 0);
    assert!(sink.contains(&AppEvent::FaultCleared));
    assert!(!hw.is_on(Output::IrrigationPump), "manual mode does not restart");
}

#[test]
fn manual_lighting_overrides_auto() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.set_light_percent(10);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.is_on(Output::Lighting));

    app.handle_command(AppCommand::ForceLighting(false), &mut hw, &mut clock, &mut sink)
        .unwrap();
    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(!hw.is_on(Output::Lighting));
    assert!(!app.status_view().luminary_auto);

    app.handle_command(AppCommand::SetLightingAuto(true), &mut hw, &mut clock, &mut sink)
        .unwrap();
    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.is_on(Output::Lighting));
}

#[test]
fn config_update_takes_effect_on_next_tick() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.set_soil_percent(45);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(!hw.is_on(Output::IrrigationPump));

    app.handle_action(r#"{"config": {"soilThreshold": 50}}"#, &mut hw, &mut clock, &mut sink)
        .unwrap();
    assert_eq!(app.current_config().moisture_threshold, 50);
    assert_eq!(app.snapshot().config.moisture_threshold, Some(50));

    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.is_on(Output::IrrigationPump));
}

// ── Security ──────────────────────────────────────────────────

#[test]
fn motion_while_armed_latches_until_cleared() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);
    app.handle_action(r#"{"security": true}"#, &mut hw, &mut clock, &mut sink)
        .unwrap();
    assert!(hw.is_on(Output::SecurityIndicator));

    app.motion_latch().signal();
    clock.advance(100);
    app.tick(&mut hw, &mut clock, &mut sink);

    assert!(sink.contains(&AppEvent::AlarmTriggered));
    assert_eq!(app.status(), SystemStatus::Alarm);
    assert!(hw.tone_on());
    assert!(app.status_view().alarm);

    // The latch was consumed; the alarm keeps pulsing without new motion.
    clock.advance(600);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert_eq!(app.status(), SystemStatus::Alarm);
    assert!(!hw.tone_on());
    assert!(hw.is_on(Output::SecurityIndicator));

    app.handle_action(r#"{"clearAlarm": true}"#, &mut hw, &mut clock, &mut sink)
        .unwrap();
    assert!(sink.contains(&AppEvent::AlarmCleared));
    assert_eq!(app.status(), SystemStatus::Normal);
    assert!(app.status_view().security, "still armed after acknowledgement");
    assert!(!hw.tone_on());
}

#[test]
fn presence_held_at_arming_raises_the_alarm() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.pir = true;
    app.motion_latch().signal();
    app.tick(&mut hw, &mut clock, &mut sink);
    assert_eq!(app.status(), SystemStatus::Normal, "disarmed ignores presence");
    assert!(app.snapshot().motion);

    app.handle_action(r#"{"security": true}"#, &mut hw, &mut clock, &mut sink)
        .unwrap();
    clock.advance(100);
    app.tick(&mut hw, &mut clock, &mut sink);

    assert_eq!(app.status(), SystemStatus::Alarm);
    assert!(sink.contains(&AppEvent::AlarmTriggered));
    assert!(hw.tone_on());
}

#[test]
fn rearming_during_alarm_keeps_the_tone_pulsing() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);
    app.handle_action(r#"{"security": true}"#, &mut hw, &mut clock, &mut sink)
        .unwrap();
    app.motion_latch().signal();
    clock.advance(100);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.tone_on());

    app.handle_action(r#"{"security": true}"#, &mut hw, &mut clock, &mut sink)
        .unwrap();
    assert_eq!(app.status(), SystemStatus::Alarm);
    assert!(hw.tone_on());
    clock.advance(100);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(hw.tone_on(), "still inside the tone phase");
}

#[test]
fn window_arms_and_disarms_from_the_wall_clock() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);
    assert_eq!(clock.tod_queries, 0, "no window, no clock query");

    app.handle_action(
        r#"{"securityAuto": true, "securityStart": "22:00", "securityEnd": "06:00"}"#,
        &mut hw,
        &mut clock,
        &mut sink,
    )
    .unwrap();

    clock.set_time("23:15");
    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(app.status_view().security);
    assert_eq!(app.status_view().security_start.to_string(), "22:00");

    clock.set_time("07:00");
    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(!app.status_view().security);
    assert!(clock.tod_queries >= 2);
}

#[test]
fn unsynchronised_clock_leaves_security_alone() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);
    app.handle_action(
        r#"{"securityAuto": true, "securityStart": "00:00", "securityEnd": "23:59"}"#,
        &mut hw,
        &mut clock,
        &mut sink,
    )
    .unwrap();

    clock.advance(1_000);
    app.tick(&mut hw, &mut clock, &mut sink);
    assert!(!app.status_view().security);
}

// ── Action bodies ─────────────────────────────────────────────

#[test]
fn bad_schedule_is_reported_but_other_actions_apply() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);

    let err = app
        .handle_action(
            r#"{"securityStart": "25:00", "securityEnd": "06:00", "forceLuminary": true}"#,
            &mut hw,
            &mut clock,
            &mut sink,
        )
        .unwrap_err();
    assert_eq!(err, Error::Schedule(ScheduleError::HourOutOfRange(25)));
    assert!(app.context().security.window.is_none());
    assert!(hw.is_on(Output::Lighting));
}

#[test]
fn malformed_body_changes_nothing() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    app.tick(&mut hw, &mut clock, &mut sink);
    let before = app.outputs();
    let calls = hw.calls.len();

    let err = app
        .handle_action(r#"{"forceTank": tru"#, &mut hw, &mut clock, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Request(_)));
    assert_eq!(app.outputs(), before);
    assert_eq!(hw.calls.len(), calls);
}

#[test]
fn data_report_serialises_for_the_ui() {
    let (mut app, mut hw, mut clock, mut sink) = make_app();
    hw.humidity = None;
    app.tick(&mut hw, &mut clock, &mut sink);

    let json = serde_json::to_value(app.data_report()).unwrap();
    assert!(json["humidity"].is_null());
    assert_eq!(json["soilMoisture"], 60);
    assert_eq!(json["status"], SystemStatus::SensorError.code());
    assert_eq!(json["history"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["history"][0]["soil"], 60);
}
