//! Installation-level errors.

use super::ActuatorId;
use crate::builder::BuildError;
use crate::engine::TriggerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallationError {
    #[error("Actuator {id} is not part of this installation")]
    UnknownActuator { id: ActuatorId },

    #[error("Actuator {id}: {source}")]
    Actuator {
        id: ActuatorId,
        source: TriggerError,
    },

    #[error("Reading {value} for actuator {id} is not a finite distance")]
    InvalidReading { id: ActuatorId, value: f32 },

    #[error(transparent)]
    Build(#[from] BuildError),
}
