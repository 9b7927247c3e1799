//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Bindings, CallbackError, Model, DEFAULT_HISTORY_CAPACITY};
use crate::engine::{MachineDefinition, StateMachine};
use crate::table::{TransitionRule, TransitionTable};
use crate::validation;
use std::sync::Arc;

/// Builder for constructing machines with a fluent API.
///
/// The builder starts from the model's declared bindings; extra guards and
/// callbacks may be added on top. `build` validates the table against the
/// bindings and rejects it if any name is unresolved or any rule is
/// unreachable.
pub struct MachineBuilder<M: Model> {
    initial: Option<M::State>,
    table: TransitionTable<M::State>,
    bindings: Bindings<M>,
    history_capacity: usize,
}

impl<M: Model> MachineBuilder<M> {
    pub fn new() -> Self {
        Self {
            initial: None,
            table: TransitionTable::new(),
            bindings: M::bindings(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: M::State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<M::State>) -> Result<Self, BuildError> {
        let rule = builder.build()?;
        self.table.add(rule);
        Ok(self)
    }

    /// Add a pre-built rule.
    pub fn add_transition(mut self, rule: TransitionRule<M::State>) -> Self {
        self.table.add(rule);
        self
    }

    /// Add multiple rules at once, keeping their order.
    pub fn transitions(mut self, rules: Vec<TransitionRule<M::State>>) -> Self {
        for rule in rules {
            self.table.add(rule);
        }
        self
    }

    /// Run `callback` whenever `state` is entered.
    pub fn on_enter(mut self, state: M::State, callback: impl Into<String>) -> Self {
        self.table.on_enter(state, callback);
        self
    }

    /// Run `callback` whenever `state` is left.
    pub fn on_exit(mut self, state: M::State, callback: impl Into<String>) -> Self {
        self.table.on_exit(state, callback);
        self
    }

    /// Register an extra guard beyond the model's own.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&M, &M::State, &M::Payload) -> bool + Send + Sync + 'static,
    {
        self.bindings.insert_guard(name, predicate);
        self
    }

    /// Register an extra callback beyond the model's own.
    pub fn callback<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut M, &M::Payload) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.bindings.insert_callback(name, action);
        self
    }

    /// Bound the per-instance transition history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Validate and freeze the table into a reusable definition.
    pub fn build_definition(self) -> Result<MachineDefinition<M>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.table.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        validation::check(&self.table, &self.bindings).map_err(BuildError::InvalidTable)?;

        Ok(MachineDefinition {
            initial,
            table: Arc::new(self.table),
            bindings: Arc::new(self.bindings),
            history_capacity: self.history_capacity,
        })
    }

    /// Build a single machine around `model`.
    pub fn build(self, name: impl Into<String>, model: M) -> Result<StateMachine<M>, BuildError> {
        Ok(self.build_definition()?.instantiate(name, model))
    }
}

impl<M: Model> Default for MachineBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
