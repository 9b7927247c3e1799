//! Build errors for machine and transition builders.

use crate::validation::Violation;
use thiserror::Error;

/// Errors that can occur when building machines and transition rules.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition trigger not specified. Use TransitionBuilder::on(trigger)")]
    MissingTrigger,

    #[error("Transition source not specified. Call .from(state), .from_any_of(states) or .from_any()")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition table is inconsistent ({} violation(s)): {}", .0.len(), summarize(.0))]
    InvalidTable(Vec<Violation>),
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
