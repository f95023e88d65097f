use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::protocol::{scene_commands, ControlRequest, DeviceCommand};
use super::transport::{DeviceTransport, TransportError};
use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum DeviceError {
    /// The exchange for `command` failed. The first `completed` commands
    /// were delivered and may have taken effect.
    #[error("Failed to send {command} for scene {scene:?} ({completed} step(s) already applied): {source}")]
    Transport {
        scene: String,
        command: DeviceCommand,
        completed: usize,
        source: TransportError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    /// The device answered with a non-success code. Not fatal.
    Rejected { code: i64, message: String },
    /// Nothing was sent.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub command: DeviceCommand,
    pub outcome: StepOutcome,
}

/// What happened to each command of a scene application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub scene: String,
    pub steps: Vec<StepReport>,
}

impl ApplyReport {
    fn new(scene: &Scene) -> Self {
        Self {
            scene: scene.name.clone(),
            steps: Vec::with_capacity(3),
        }
    }

    pub fn soft_failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Rejected { .. }))
            .count()
    }
}

/// Realizes scenes on a light.
#[async_trait]
pub trait LightController: Send + Sync {
    fn name(&self) -> &str;

    async fn apply_scene(&self, scene: &Scene) -> Result<ApplyReport, DeviceError>;
}

/// Drives one device through the provider's control API.
///
/// Commands are sent strictly in order: power, color, brightness. A
/// transport failure stops the sequence; already delivered commands are
/// not rolled back. A non-success response code is logged and the sequence
/// goes on. Nothing is retried.
pub struct GoveeLightController {
    transport: Arc<dyn DeviceTransport>,
    sku: String,
    device_id: String,
}

impl GoveeLightController {
    pub fn new(
        transport: Arc<dyn DeviceTransport>,
        sku: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            sku: sku.into(),
            device_id: device_id.into(),
        }
    }
}

#[async_trait]
impl LightController for GoveeLightController {
    fn name(&self) -> &str {
        "govee"
    }

    async fn apply_scene(&self, scene: &Scene) -> Result<ApplyReport, DeviceError> {
        info!(scene = %scene.name, device = %self.device_id, "Applying scene");

        let mut report = ApplyReport::new(scene);

        for (completed, command) in scene_commands(scene).into_iter().enumerate() {
            let request = ControlRequest::new(&self.sku, &self.device_id, &command);
            info!(
                request_id = %request.request_id,
                command = %command,
                "Sending device command"
            );

            let response = match self.transport.send(&request).await {
                Ok(response) => response,
                Err(source) => {
                    error!(
                        scene = %scene.name,
                        command = %command,
                        completed,
                        error = %source,
                        "Device command failed, aborting scene"
                    );
                    return Err(DeviceError::Transport {
                        scene: scene.name.clone(),
                        command,
                        completed,
                        source,
                    });
                }
            };

            let outcome = if response.is_success() {
                debug!(command = %command, "Device command applied");
                StepOutcome::Applied
            } else {
                warn!(
                    command = %command,
                    code = response.code,
                    message = %response.message,
                    "Device returned non-success code, continuing"
                );
                StepOutcome::Rejected {
                    code: response.code,
                    message: response.message,
                }
            };
            report.steps.push(StepReport { command, outcome });
        }

        info!(
            scene = %scene.name,
            soft_failures = report.soft_failures(),
            "Scene applied"
        );
        Ok(report)
    }
}

/// Controller that only logs the scene. Used when no device is configured.
#[derive(Debug, Default)]
pub struct LoggingLightController;

#[async_trait]
impl LightController for LoggingLightController {
    fn name(&self) -> &str {
        "dry_run"
    }

    async fn apply_scene(&self, scene: &Scene) -> Result<ApplyReport, DeviceError> {
        info!(
            scene = %scene.name,
            emotion = %scene.emotion,
            color = %scene.color,
            brightness = scene.brightness,
            effect = %scene.effect,
            "Dry run, scene not sent to any device"
        );

        let mut report = ApplyReport::new(scene);
        report.steps = scene_commands(scene)
            .into_iter()
            .map(|command| StepReport {
                command,
                outcome: StepOutcome::DryRun,
            })
            .collect();
        Ok(report)
    }
}
