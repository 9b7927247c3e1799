//! Core state machine types.
//!
//! This module contains the building blocks every machine shares:
//! - State alphabets via the `State` trait
//! - The `Model` capability trait and its named `Bindings`
//! - Guard predicates and callbacks
//! - The bounded transition history

mod guard;
mod history;
mod model;
mod state;

pub use guard::{Bindings, Callback, CallbackError, Guard, GuardEvaluationError};
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use model::Model;
pub use state::State;
