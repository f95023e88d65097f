//! Wire types of the device control API.
//!
//! Field names and the capability identifiers are fixed by the provider and
//! must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scene::Scene;

pub const CONTROL_PATH: &str = "/router/api/v1/device/control";
pub const API_KEY_HEADER: &str = "Govee-API-Key";

/// Response code signalling that the device accepted a command.
pub const SUCCESS_CODE: i64 = 200;

pub const POWER_CAPABILITY: &str = "devices.capabilities.on_off";
pub const POWER_INSTANCE: &str = "powerSwitch";
pub const COLOR_CAPABILITY: &str = "devices.capabilities.color_setting";
pub const COLOR_INSTANCE: &str = "colorRgb";
pub const BRIGHTNESS_CAPABILITY: &str = "devices.capabilities.range";
pub const BRIGHTNESS_INSTANCE: &str = "brightness";

/// One imperative instruction for the device. Each command sets absolute
/// state, so re-sending it is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCommand {
    pub capability_type: &'static str,
    pub instance: &'static str,
    pub value: u32,
}

impl DeviceCommand {
    pub fn power_on() -> Self {
        Self {
            capability_type: POWER_CAPABILITY,
            instance: POWER_INSTANCE,
            value: 1,
        }
    }

    pub fn color(packed_rgb: u32) -> Self {
        Self {
            capability_type: COLOR_CAPABILITY,
            instance: COLOR_INSTANCE,
            value: packed_rgb,
        }
    }

    pub fn brightness(percent: u8) -> Self {
        Self {
            capability_type: BRIGHTNESS_CAPABILITY,
            instance: BRIGHTNESS_INSTANCE,
            value: percent as u32,
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.instance, self.value)
    }
}

/// The commands realizing `scene`, in the order they must be sent.
///
/// The device ignores color and brightness while it is off, so power comes
/// first. The scene effect has no device command.
pub fn scene_commands(scene: &Scene) -> [DeviceCommand; 3] {
    [
        DeviceCommand::power_on(),
        DeviceCommand::color(scene.color.pack()),
        DeviceCommand::brightness(scene.brightness),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    pub request_id: String,
    pub payload: ControlPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPayload {
    pub sku: String,
    pub device: String,
    pub capability: ControlCapability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCapability {
    #[serde(rename = "type")]
    pub capability_type: String,
    pub instance: String,
    pub value: u32,
}

impl ControlRequest {
    /// Wraps `command` in an envelope with a fresh request id.
    pub fn new(sku: &str, device: &str, command: &DeviceCommand) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            payload: ControlPayload {
                sku: sku.to_string(),
                device: device.to_string(),
                capability: ControlCapability {
                    capability_type: command.capability_type.to_string(),
                    instance: command.instance.to_string(),
                    value: command.value,
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    /// Missing codes read as 0, which is not a success.
    #[serde(default)]
    pub code: i64,
    #[serde(default, alias = "msg")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ControlResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
