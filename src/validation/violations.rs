//! Problems a transition table can have against its model's bindings.

use thiserror::Error;

/// A single consistency problem found in a transition table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("Rule #{rule} ('{trigger}') uses unregistered guard '{guard}'")]
    UnresolvedGuard {
        rule: usize,
        trigger: String,
        guard: String,
    },

    #[error("Rule #{rule} ('{trigger}') uses unregistered callback '{callback}'")]
    UnresolvedCallback {
        rule: usize,
        trigger: String,
        callback: String,
    },

    #[error("Hook on state '{state}' uses unregistered callback '{callback}'")]
    UnresolvedHook { state: String, callback: String },

    #[error("Rule #{rule} ('{trigger}') can never fire: unguarded rule #{shadowed_by} always matches first")]
    ShadowedRule {
        rule: usize,
        trigger: String,
        shadowed_by: usize,
    },
}
