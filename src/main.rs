//! Verdant controller, host build.
//!
//! Runs the automation core against the simulated garden.  Operator
//! actions are read from stdin, one JSON object per line (the same body
//! the web UI posts); `status` and `data` print the current views.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  SimHardware            LogEventSink   HostClock         │
//! │  (RawSensor+Actuator)   (EventSink)    (ClockPort)       │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)             │      │
//! │  │  Scheduler · Sensors · Automation · Safety     │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Environment:
//! - `VERDANT_CONFIG`: path to a JSON [`SystemConfig`] (the first CLI
//!   argument takes precedence)
//! - `SIM_SCENARIO`: `nominal` (default), `flaky` or `low`
//! - `SIM_DAY_MIN`: length of a simulated day in minutes (default 60)
//! - `VERDANT_UTC_OFFSET_MIN`: local time offset for the security window

use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use verdant::adapters::log_sink::LogEventSink;
use verdant::adapters::sim::{Scenario, SimHardware};
use verdant::adapters::time::{HostClock, ThreadDelay};
use verdant::app::ports::ClockPort;
use verdant::app::service::AppService;
use verdant::config::SystemConfig;

const TICK: Duration = Duration::from_millis(100);

fn load_config() -> Result<SystemConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VERDANT_CONFIG").ok());
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return Ok(SystemConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
    let cfg = serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?;
    info!("Config loaded from {}", path);
    Ok(cfg)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Forward stdin lines to the control loop.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  Verdant v{:<27}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;

    // ── 3. Adapters ───────────────────────────────────────────
    let scenario = Scenario::from_str_lossy(&std::env::var("SIM_SCENARIO").unwrap_or_default());
    let day_min: u64 = env_or("SIM_DAY_MIN", 60);
    let mut clock = HostClock::new(env_or("VERDANT_UTC_OFFSET_MIN", 0));
    let mut sink = LogEventSink::new();

    let mut app = AppService::new(config, ThreadDelay);
    let mut hw = SimHardware::new(scenario, app.motion_latch(), day_min.max(1).saturating_mul(60_000));
    info!("Simulation scenario: {}, day length {} min", scenario, day_min);

    // ── 4. Start ──────────────────────────────────────────────
    app.start(&mut hw, &mut sink);
    let actions = spawn_stdin_reader();

    // ── 5. Control loop ───────────────────────────────────────
    let mut last_ms = clock.uptime_ms();
    loop {
        let now = clock.uptime_ms();
        hw.step(now.saturating_sub(last_ms));
        last_ms = now;

        while let Ok(line) = actions.try_recv() {
            match line.trim() {
                "" => {}
                "status" => println!("{}", serde_json::to_string(&app.status_view())?),
                "data" => println!("{}", serde_json::to_string_pretty(&app.data_report())?),
                body => {
                    if let Err(e) = app.handle_action(body, &mut hw, &mut clock, &mut sink) {
                        warn!("Action failed: {}", e);
                    }
                }
            }
        }

        app.tick(&mut hw, &mut clock, &mut sink);
        std::thread::sleep(TICK);
    }
}
