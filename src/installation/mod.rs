//! The kinetic installation: a supervisor machine over a set of actuator
//! box sub-machines.
//!
//! The supervisor's model owns every box through a [`SubMachineRegistry`].
//! Supervisor guards read aggregates over the boxes, and fault-locked
//! actuators are excluded from those aggregates for good.
//!
//! # Example
//!
//! ```
//! use maestro::core::DEFAULT_HISTORY_CAPACITY;
//! use maestro::installation::{supervisor, triggers, Installation, Lifecycle};
//!
//! let installation = Installation::new(6, 2.0, DEFAULT_HISTORY_CAPACITY).unwrap();
//! let mut machine = supervisor(installation, DEFAULT_HISTORY_CAPACITY).unwrap();
//!
//! machine.fire(triggers::START_INTERACTION).unwrap();
//! machine.fire(triggers::RETURN_TO_ATTRACT).unwrap();
//! assert_eq!(machine.current_state(), &Lifecycle::Attract);
//! ```

pub mod actuator;
pub mod error;
pub mod linear_check;
pub mod locks;
pub mod registry;
pub mod supervisor;

/// Stable identifier of one actuator box.
pub type ActuatorId = u32;

pub use actuator::{box_definition, Alignment, BoxMachine, BoxModel};
pub use error::InstallationError;
pub use linear_check::{LinearCheck, DEFAULT_VARIANCE_TOLERANCE_MM};
pub use locks::FaultLockRegistry;
pub use registry::SubMachineRegistry;
pub use supervisor::{
    callbacks, guards, supervisor, supervisor_definition, supervisor_from_config,
    supervisor_rules, triggers, Installation, Lifecycle, Supervisor,
};
