//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (web UI,
//! serial console) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::config::ConfigUpdate;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Enable / disable automatic irrigation.
    SetIrrigationAuto(bool),

    /// Manual irrigation (turns irrigation auto off).  `duration_min`
    /// overrides the runtime ceiling for this run.
    ForceIrrigation { on: bool, duration_min: Option<u32> },

    /// Enable / disable automatic reservoir fill.
    SetFillAuto(bool),

    /// Manual fill (turns fill auto off).
    ForceFill(bool),

    /// Enable / disable the security window.
    SetSecurityAuto(bool),

    /// Manual arm / disarm.
    SetSecurity(bool),

    /// Install a security window from two `"HH:MM"` strings.
    SetSecuritySchedule { start: String, end: String },

    /// Acknowledge a latched alarm.
    ClearAlarm,

    /// Enable / disable automatic lighting.
    SetLightingAuto(bool),

    /// Manual lighting (turns lighting auto off).
    ForceLighting(bool),

    /// Hot-apply a partial configuration.
    UpdateConfig(ConfigUpdate),
}
