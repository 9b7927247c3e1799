//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders, shorthand rule constructors and the
//! `state_enum!` macro for declaring alphabets with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::State;
use crate::table::{Source, TransitionRule};

/// Create an unguarded rule with no callbacks.
///
/// # Example
///
/// ```
/// use maestro::builder::simple_transition;
/// use maestro::state_enum;
///
/// state_enum! {
///     enum Hatch {
///         Shut,
///         Open,
///     }
/// }
///
/// let rule = simple_transition("open", Hatch::Shut, Hatch::Open);
/// assert!(rule.applies("open", &Hatch::Shut));
/// ```
pub fn simple_transition<S: State>(trigger: &str, from: S, to: S) -> TransitionRule<S> {
    TransitionRule::new(trigger, Source::One(from), to)
}

/// Create a rule gated by a single named guard.
///
/// # Example
///
/// ```
/// use maestro::builder::guarded_transition;
/// use maestro::state_enum;
///
/// state_enum! {
///     enum Hatch {
///         Shut,
///         Open,
///     }
/// }
///
/// let rule = guarded_transition("open", Hatch::Shut, Hatch::Open, "unlocked");
/// assert_eq!(rule.conditions, vec!["unlocked".to_string()]);
/// ```
pub fn guarded_transition<S: State>(trigger: &str, from: S, to: S, guard: &str) -> TransitionRule<S> {
    let mut rule = simple_transition(trigger, from, to);
    rule.conditions.push(guard.to_string());
    rule
}

/// Create a rule that fires only while the named guard is false.
pub fn unless_transition<S: State>(trigger: &str, from: S, to: S, guard: &str) -> TransitionRule<S> {
    let mut rule = simple_transition(trigger, from, to);
    rule.unless.push(guard.to_string());
    rule
}
