//! The capability set a machine's model exposes to the engine.

use super::guard::Bindings;
use super::state::State;
use std::fmt::Debug;

/// A model owns the data a machine's guards read and its callbacks mutate.
///
/// Instead of decorating an object with methods at runtime, a model declares
/// its named guards and callbacks once in [`Model::bindings`]. Transition
/// tables refer to those names; the engine resolves them per trigger, and
/// the builder checks every name a table uses against the declared set.
///
/// # Example
///
/// ```rust
/// use maestro::core::{Bindings, Model, State};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp { Off, On }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
///     fn all() -> Vec<Self> { vec![Self::Off, Self::On] }
/// }
///
/// struct Switchboard { powered: bool, flips: u32 }
///
/// impl Model for Switchboard {
///     type State = Lamp;
///     type Payload = ();
///
///     fn bindings() -> Bindings<Self> {
///         Bindings::new()
///             .guard("powered", |m: &Self, _, _| m.powered)
///             .callback("count_flip", |m: &mut Self, _| {
///                 m.flips += 1;
///                 Ok(())
///             })
///     }
/// }
///
/// let bindings = Switchboard::bindings();
/// assert!(bindings.has_guard("powered"));
/// assert!(bindings.has_callback("count_flip"));
/// ```
pub trait Model: Send + Sync + Sized + 'static {
    /// The machine's alphabet.
    type State: State + 'static;

    /// Data carried alongside a trigger name (e.g. an actuator id).
    type Payload: Clone + Debug + Default + Send + Sync + 'static;

    /// Named guards and callbacks this model provides.
    fn bindings() -> Bindings<Self>;
}
