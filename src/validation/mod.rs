//! Consistency checks for transition tables.
//!
//! Rules refer to guards and callbacks by name, and names are resolved
//! against the model's bindings when a trigger fires. This module checks
//! the same resolution ahead of time, using Stillwater's `Validation` to
//! accumulate every violation rather than stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use maestro::core::{Bindings, Model, State};
//! use maestro::table::{Source, TransitionRule, TransitionTable};
//! use maestro::validation::{check, Violation};
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! # enum Gate { Shut, Open }
//! # impl State for Gate {
//! #     fn name(&self) -> &str { match self { Self::Shut => "Shut", Self::Open => "Open" } }
//! #     fn all() -> Vec<Self> { vec![Self::Shut, Self::Open] }
//! # }
//! # struct Keeper;
//! # impl Model for Keeper {
//! #     type State = Gate;
//! #     type Payload = ();
//! #     fn bindings() -> Bindings<Self> { Bindings::new() }
//! # }
//!
//! let mut table = TransitionTable::new();
//! let mut open = TransitionRule::new("open", Source::One(Gate::Shut), Gate::Open);
//! open.conditions.push("has_key".to_string());
//! table.add(open);
//!
//! let violations = check(&table, &Keeper::bindings()).unwrap_err();
//! assert!(matches!(violations[0], Violation::UnresolvedGuard { .. }));
//! ```

pub mod rules;
pub mod violations;

pub use rules::{check, validate};
pub use violations::Violation;
