//! Maestro: guarded state machines for supervising kinetic installations
//!
//! Maestro separates the static definition of a machine from the data it
//! drives. A transition table lists rules by trigger name and refers to
//! guards and callbacks by name. A [`Model`](core::Model) declares the
//! implementations of those names through its [`Bindings`](core::Bindings).
//! Tables are checked against bindings when a machine is built, and names
//! are resolved again on every trigger so late registrations take effect.
//!
//! # Core Concepts
//!
//! - **State**: a finite alphabet implementing [`State`], usually generated
//!   with [`state_enum!`]
//! - **Rules**: ordered `(trigger, source, dest)` entries with conditions,
//!   unless-guards and before/after callbacks
//! - **Machines**: a [`StateMachine`] runs triggers against one model
//! - **Installation**: a supervisor machine whose model owns one box
//!   sub-machine per actuator
//!
//! # Example
//!
//! ```rust
//! use maestro::builder::{MachineBuilder, TransitionBuilder};
//! use maestro::core::{Bindings, Model};
//! use maestro::state_enum;
//!
//! state_enum! {
//!     enum Door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Porter {
//!     key: bool,
//!     openings: u32,
//! }
//!
//! impl Model for Porter {
//!     type State = Door;
//!     type Payload = ();
//!
//!     fn bindings() -> Bindings<Self> {
//!         Bindings::new()
//!             .guard("has_key", |m: &Self, _, _| m.key)
//!             .callback("count", |m: &mut Self, _| {
//!                 m.openings += 1;
//!                 Ok(())
//!             })
//!     }
//! }
//!
//! let mut door = MachineBuilder::new()
//!     .initial(Door::Closed)
//!     .transition(
//!         TransitionBuilder::on("open")
//!             .from(Door::Closed)
//!             .to(Door::Open)
//!             .when("has_key")
//!             .after("count"),
//!     )
//!     .unwrap()
//!     .build("front-door", Porter::default())
//!     .unwrap();
//!
//! assert!(door.fire("open").is_err());
//! door.model_mut().key = true;
//! door.fire("open").unwrap();
//! assert_eq!(door.current_state(), &Door::Open);
//! assert_eq!(door.model().openings, 1);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod installation;
pub mod logging;
pub mod script;
pub mod table;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use core::{Bindings, CallbackError, GuardEvaluationError, Model, State, StateHistory};
pub use engine::{MachineDefinition, StateMachine, TriggerError};
pub use table::{Source, TransitionRule, TransitionTable};
