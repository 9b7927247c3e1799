//! Named guard predicates and callbacks.
//!
//! Guards are pure boolean functions that decide whether a transition rule
//! may fire. Callbacks are the actions a rule (or a state hook) runs on the
//! model. Both are registered under a name in a [`Bindings`] set and looked
//! up by that name when a trigger is processed.

use super::model::Model;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

type Predicate<M> =
    dyn Fn(&M, &<M as Model>::State, &<M as Model>::Payload) -> bool + Send + Sync;

type Action<M> =
    dyn Fn(&mut M, &<M as Model>::Payload) -> Result<(), CallbackError> + Send + Sync;

/// A name could not be resolved against a model's bindings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardEvaluationError {
    #[error("Guard '{name}' is not registered on the model")]
    UnknownGuard { name: String },

    #[error("Callback '{name}' is not registered on the model")]
    UnknownCallback { name: String },
}

/// Failure reported by a callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CallbackError {
    message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Pure predicate over a model, its machine's current state and the
/// trigger payload.
///
/// Guards must be deterministic and free of side effects: they only ever
/// receive shared references.
pub struct Guard<M: Model> {
    predicate: Arc<Predicate<M>>,
}

impl<M: Model> Guard<M> {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&M, &M::State, &M::Payload) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self, model: &M, state: &M::State, payload: &M::Payload) -> bool {
        (self.predicate)(model, state, payload)
    }
}

impl<M: Model> Clone for Guard<M> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

/// Action run on the model during a transition.
pub struct Callback<M: Model> {
    action: Arc<Action<M>>,
}

impl<M: Model> Callback<M> {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&mut M, &M::Payload) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Callback {
            action: Arc::new(action),
        }
    }

    pub fn run(&self, model: &mut M, payload: &M::Payload) -> Result<(), CallbackError> {
        (self.action)(model, payload)
    }
}

impl<M: Model> Clone for Callback<M> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
        }
    }
}

/// Named guards and callbacks of one model type.
///
/// This is the guard evaluator: [`Bindings::evaluate`] resolves a predicate
/// by name and runs it without side effects.
pub struct Bindings<M: Model> {
    guards: BTreeMap<String, Guard<M>>,
    callbacks: BTreeMap<String, Callback<M>>,
}

impl<M: Model> Bindings<M> {
    pub fn new() -> Self {
        Self {
            guards: BTreeMap::new(),
            callbacks: BTreeMap::new(),
        }
    }

    /// Add a named guard, fluent style.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&M, &M::State, &M::Payload) -> bool + Send + Sync + 'static,
    {
        self.insert_guard(name, predicate);
        self
    }

    /// Add a named callback, fluent style.
    pub fn callback<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut M, &M::Payload) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.insert_callback(name, action);
        self
    }

    /// Register (or replace) a guard.
    pub fn insert_guard<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&M, &M::State, &M::Payload) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
    }

    /// Register (or replace) a callback.
    pub fn insert_callback<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut M, &M::Payload) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Callback::new(action));
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Resolve and evaluate a named predicate.
    pub fn evaluate(
        &self,
        name: &str,
        model: &M,
        state: &M::State,
        payload: &M::Payload,
    ) -> Result<bool, GuardEvaluationError> {
        self.guards
            .get(name)
            .map(|guard| guard.check(model, state, payload))
            .ok_or_else(|| GuardEvaluationError::UnknownGuard {
                name: name.to_string(),
            })
    }

    /// Resolve a named callback.
    pub fn resolve_callback(&self, name: &str) -> Result<&Callback<M>, GuardEvaluationError> {
        self.callbacks
            .get(name)
            .ok_or_else(|| GuardEvaluationError::UnknownCallback {
                name: name.to_string(),
            })
    }

    pub fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.guards.keys().map(String::as_str)
    }

    pub fn callback_names(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }
}

impl<M: Model> Default for Bindings<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for Bindings<M> {
    fn clone(&self) -> Self {
        Self {
            guards: self.guards.clone(),
            callbacks: self.callbacks.clone(),
        }
    }
}

impl<M: Model> fmt::Debug for Bindings<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("guards", &self.guards.keys().collect::<Vec<_>>())
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}
