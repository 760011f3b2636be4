//! Operator action requests.
//!
//! The web UI posts a JSON object whose keys are individual actions; any
//! combination may be present.  [`ActionRequest::into_commands`] turns it
//! into an ordered command list: irrigation, configuration, fill,
//! security, lighting.

use serde::Deserialize;

use crate::config::ConfigUpdate;
use crate::error::Result;

use super::commands::AppCommand;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionRequest {
    pub irrigation_auto: Option<bool>,
    pub force_irrigation: Option<bool>,
    /// Minutes; only read together with `forceIrrigation`.
    pub duration: Option<u32>,
    pub config: Option<ConfigUpdate>,
    pub tank_auto: Option<bool>,
    pub force_tank: Option<bool>,
    pub security_auto: Option<bool>,
    pub security: Option<bool>,
    pub security_start: Option<String>,
    pub security_end: Option<String>,
    /// Presence is what counts; the value is ignored.
    #[serde(deserialize_with = "present")]
    pub clear_alarm: bool,
    pub luminary_auto: Option<bool>,
    pub force_luminary: Option<bool>,
}

/// Any value, including `null` or `false`, marks the key as present.
fn present<'de, D: serde::Deserializer<'de>>(d: D) -> core::result::Result<bool, D::Error> {
    serde::de::IgnoredAny::deserialize(d).map(|_| true)
}

impl ActionRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn into_commands(self) -> Vec<AppCommand> {
        let mut out = Vec::new();

        if let Some(v) = self.irrigation_auto {
            out.push(AppCommand::SetIrrigationAuto(v));
        }
        if let Some(on) = self.force_irrigation {
            out.push(AppCommand::ForceIrrigation {
                on,
                duration_min: self.duration,
            });
        }
        if let Some(update) = self.config {
            out.push(AppCommand::UpdateConfig(update));
        }
        if let Some(v) = self.tank_auto {
            out.push(AppCommand::SetFillAuto(v));
        }
        if let Some(v) = self.force_tank {
            out.push(AppCommand::ForceFill(v));
        }
        if let Some(v) = self.security_auto {
            out.push(AppCommand::SetSecurityAuto(v));
        }
        if let Some(v) = self.security {
            out.push(AppCommand::SetSecurity(v));
        }
        if let (Some(start), Some(end)) = (self.security_start, self.security_end) {
            out.push(AppCommand::SetSecuritySchedule { start, end });
        }
        if self.clear_alarm {
            out.push(AppCommand::ClearAlarm);
        }
        if let Some(v) = self.luminary_auto {
            out.push(AppCommand::SetLightingAuto(v));
        }
        if let Some(v) = self.force_luminary {
            out.push(AppCommand::ForceLighting(v));
        }
        out
    }
}
