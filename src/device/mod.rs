//! Light device control.

mod controller;
mod protocol;
mod transport;

pub use controller::{
    ApplyReport, DeviceError, GoveeLightController, LightController, LoggingLightController,
    StepOutcome, StepReport,
};
pub use protocol::{
    scene_commands, ControlCapability, ControlPayload, ControlRequest, ControlResponse,
    DeviceCommand, API_KEY_HEADER, CONTROL_PATH, SUCCESS_CODE,
};
pub use transport::{DeviceTransport, GoveeHttpTransport, TransportError, DEFAULT_GOVEE_BASE_URL};
