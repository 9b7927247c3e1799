//! Core State trait for machine alphabets.
//!
//! Every machine in the crate runs over a fixed, finite alphabet expressed
//! as a Rust enum implementing this trait. Membership in the alphabet is
//! therefore guaranteed by the type system.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure. States are small values describing the current
/// position of one machine instance.
///
/// # Required Traits
///
/// - `Clone`: states are copied into the transition history
/// - `PartialEq`: source matching and reflexive detection compare states
/// - `Debug`: states appear in diagnostics
/// - `Serialize` + `Deserialize`: states are reported to presentation layers
///
/// # Example
///
/// ```rust
/// use maestro::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Jammed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Jammed => "Jammed",
///         }
///     }
///
///     fn all() -> Vec<Self> {
///         vec![Self::Open, Self::Closed, Self::Jammed]
///     }
///
///     fn is_holding(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
///
/// assert_eq!(Door::from_name("Closed"), Some(Door::Closed));
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display, logging and `is_state` queries.
    fn name(&self) -> &str;

    /// Every member of the alphabet, in declaration order.
    fn all() -> Vec<Self>
    where
        Self: Sized;

    /// Check if this is a holding state.
    ///
    /// Holding states are recoverable parking positions (fault, intervention)
    /// that are only left through their guarded exits.
    ///
    /// Default implementation returns `false`.
    fn is_holding(&self) -> bool {
        false
    }

    /// Look a state up by its name.
    fn from_name(name: &str) -> Option<Self>
    where
        Self: Sized,
    {
        Self::all().into_iter().find(|s| s.name() == name)
    }
}
