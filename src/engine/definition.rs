//! Shared machine definitions.

use crate::core::{Bindings, Model, StateHistory};
use crate::engine::machine::StateMachine;
use crate::table::TransitionTable;
use std::sync::Arc;

/// A validated table and binding set from which any number of machines can
/// be instantiated. Instances share the table and bindings.
pub struct MachineDefinition<M: Model> {
    pub(crate) initial: M::State,
    pub(crate) table: Arc<TransitionTable<M::State>>,
    pub(crate) bindings: Arc<Bindings<M>>,
    pub(crate) history_capacity: usize,
}

impl<M: Model> MachineDefinition<M> {
    pub fn initial_state(&self) -> &M::State {
        &self.initial
    }

    pub fn table(&self) -> &TransitionTable<M::State> {
        &self.table
    }

    /// Create a new machine in the initial state.
    pub fn instantiate(&self, name: impl Into<String>, model: M) -> StateMachine<M> {
        StateMachine::from_parts(
            name,
            self.initial.clone(),
            Arc::clone(&self.table),
            Arc::clone(&self.bindings),
            model,
            StateHistory::with_capacity(self.history_capacity),
        )
    }
}

impl<M: Model> Clone for MachineDefinition<M> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            table: Arc::clone(&self.table),
            bindings: Arc::clone(&self.bindings),
            history_capacity: self.history_capacity,
        }
    }
}
