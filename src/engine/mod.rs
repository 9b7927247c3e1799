//! Machine execution.
//!
//! A [`StateMachine`] holds one instance's current state and runs triggers
//! against its transition table:
//!
//! - candidate rules are tried in registration order
//! - conditions and unless-guards are evaluated in listed order
//! - before callbacks run before the state changes, after callbacks after
//! - exit and enter hooks run only for non-reflexive transitions
//!
//! Every failure is returned to the caller as a [`TriggerError`].

mod definition;
mod error;
mod machine;

pub use definition::MachineDefinition;
pub use error::TriggerError;
pub use machine::StateMachine;
