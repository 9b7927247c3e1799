//! Errors surfaced by `trigger`.

use crate::core::{CallbackError, GuardEvaluationError};
use thiserror::Error;

/// Errors that can occur while processing a trigger.
///
/// None of these are swallowed by the engine. Every variant leaves the
/// machine in its previous state, except a `CallbackFailed` raised by an
/// exit, enter or after callback: those run once the state has advanced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriggerError {
    #[error("Trigger '{trigger}' cannot fire from state '{state}'")]
    InvalidTransition { trigger: String, state: String },

    #[error("Trigger '{trigger}' is not registered")]
    UnknownTrigger { trigger: String },

    #[error(transparent)]
    GuardEvaluation(#[from] GuardEvaluationError),

    #[error("Callback '{callback}' failed: {source}")]
    CallbackFailed {
        callback: String,
        source: CallbackError,
    },
}
