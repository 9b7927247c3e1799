//! The trigger engine.

use crate::core::{
    Bindings, Callback, GuardEvaluationError, Model, State, StateHistory, StateTransition,
};
use crate::engine::error::TriggerError;
use crate::table::{TransitionRule, TransitionTable};
use crate::validation::{self, Violation};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, info, warn};
use uuid::Uuid;

/// One running machine: current state, shared table and bindings, and the
/// model its guards read and its callbacks mutate.
///
/// `trigger` takes `&mut self`, so calls on one instance are serialized by
/// the borrow checker. Hosts sharing an instance across tasks wrap it in a
/// mutex.
pub struct StateMachine<M: Model> {
    id: Uuid,
    name: String,
    initial: M::State,
    current: M::State,
    table: Arc<TransitionTable<M::State>>,
    bindings: Arc<Bindings<M>>,
    model: M,
    history: StateHistory<M::State>,
}

impl<M: Model> StateMachine<M> {
    /// Create a machine using the model's declared bindings.
    pub fn new(
        name: impl Into<String>,
        initial: M::State,
        table: TransitionTable<M::State>,
        model: M,
    ) -> Self {
        Self::from_parts(
            name,
            initial,
            Arc::new(table),
            Arc::new(M::bindings()),
            model,
            StateHistory::new(),
        )
    }

    pub(crate) fn from_parts(
        name: impl Into<String>,
        initial: M::State,
        table: Arc<TransitionTable<M::State>>,
        bindings: Arc<Bindings<M>>,
        model: M,
        history: StateHistory<M::State>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            current: initial.clone(),
            initial,
            table,
            bindings,
            model,
            history,
        }
    }

    /// Instance id, unique per machine and carried on every trigger span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Human-readable machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state the machine is in now.
    pub fn current_state(&self) -> &M::State {
        &self.current
    }

    /// The state the machine was created in.
    pub fn initial_state(&self) -> &M::State {
        &self.initial
    }

    /// Whether the current state is named `name`.
    pub fn is_state(&self, name: &str) -> bool {
        self.current.name() == name
    }

    /// Shared access to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model for the host's sensor layer.
    ///
    /// The model is never observable mid-transition: `trigger` holds the
    /// only mutable borrow while it runs.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// The rules and hooks this machine runs.
    pub fn table(&self) -> &TransitionTable<M::State> {
        &self.table
    }

    /// The guards and callbacks names resolve against.
    pub fn bindings(&self) -> &Bindings<M> {
        &self.bindings
    }

    /// Committed transitions, oldest first.
    pub fn history(&self) -> &StateHistory<M::State> {
        &self.history
    }

    /// Append a rule. Legal at any time; it takes part in the next trigger.
    ///
    /// Machines built from one definition share their table until one of
    /// them adds a rule, at which point that machine gets its own copy.
    pub fn add_transition(&mut self, rule: TransitionRule<M::State>) {
        Arc::make_mut(&mut self.table).add(rule);
    }

    /// Register (or replace) a named guard after construction.
    pub fn register_guard<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&M, &M::State, &M::Payload) -> bool + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.bindings).insert_guard(name, predicate);
    }

    /// Register (or replace) a named callback after construction.
    pub fn register_callback<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut M, &M::Payload) -> Result<(), crate::core::CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Arc::make_mut(&mut self.bindings).insert_callback(name, action);
    }

    /// Check every name the table uses against the current bindings.
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        validation::check(&self.table, &self.bindings)
    }

    /// Evaluate a named guard against the current state.
    pub fn evaluate(&self, guard: &str, payload: &M::Payload) -> Result<bool, GuardEvaluationError> {
        self.bindings
            .evaluate(guard, &self.model, &self.current, payload)
    }

    /// Whether `trigger` would commit a transition right now.
    ///
    /// Runs guard selection only; no callback is invoked and nothing changes.
    pub fn can_trigger(&self, trigger: &str, payload: &M::Payload) -> Result<bool, TriggerError> {
        select(
            &self.table,
            &self.bindings,
            &self.model,
            &self.current,
            trigger,
            payload,
        )
        .map(|rule| rule.is_some())
    }

    /// [`trigger`](Self::trigger) with the default payload.
    pub fn fire(&mut self, trigger: &str) -> Result<(), TriggerError> {
        self.trigger(trigger, M::Payload::default())
    }

    /// Process one trigger.
    ///
    /// Candidates are the rules for `trigger` whose source matches the
    /// current state, in registration order; the first whose conditions all
    /// hold and whose unless-guards all fail is committed. Committing runs
    /// the rule's before callbacks, moves to the destination, runs the old
    /// state's exit hooks and the new state's enter hooks (skipped when the
    /// destination equals the current state), then the after callbacks.
    ///
    /// Every callback the commit needs is resolved before the first one
    /// runs, and a failing before callback aborts with the state unchanged.
    pub fn trigger(&mut self, trigger: &str, payload: M::Payload) -> Result<(), TriggerError> {
        let table = Arc::clone(&self.table);
        let bindings = Arc::clone(&self.bindings);
        let _span = debug_span!("trigger", machine = %self.name, id = %self.id, trigger).entered();

        let rule = select(
            &table,
            &bindings,
            &self.model,
            &self.current,
            trigger,
            &payload,
        )?
        .ok_or_else(|| {
            warn!(state = self.current.name(), "No transition matched");
            TriggerError::InvalidTransition {
                trigger: trigger.to_string(),
                state: self.current.name().to_string(),
            }
        })?;

        let reflexive = rule.dest == self.current;
        let before = resolve(&bindings, rule.before.iter().map(String::as_str))?;
        let (exit, enter) = if reflexive {
            (Vec::new(), Vec::new())
        } else {
            (
                resolve(&bindings, table.exit_callbacks(&self.current).into_iter())?,
                resolve(&bindings, table.enter_callbacks(&rule.dest).into_iter())?,
            )
        };
        let after = resolve(&bindings, rule.after.iter().map(String::as_str))?;

        run(&before, &mut self.model, &payload)?;

        let from = std::mem::replace(&mut self.current, rule.dest.clone());
        self.history.record(StateTransition {
            trigger: trigger.to_string(),
            from: from.clone(),
            to: self.current.clone(),
            timestamp: Utc::now(),
        });
        info!(
            from = from.name(),
            to = self.current.name(),
            reflexive,
            "Transition committed"
        );

        run(&exit, &mut self.model, &payload)?;
        run(&enter, &mut self.model, &payload)?;
        run(&after, &mut self.model, &payload)
    }
}

/// Pick the first candidate rule whose guards pass.
fn select<'t, M: Model>(
    table: &'t TransitionTable<M::State>,
    bindings: &Bindings<M>,
    model: &M,
    state: &M::State,
    trigger: &str,
    payload: &M::Payload,
) -> Result<Option<&'t TransitionRule<M::State>>, TriggerError> {
    if !table.has_trigger(trigger) {
        return Err(TriggerError::UnknownTrigger {
            trigger: trigger.to_string(),
        });
    }

    for rule in table.candidates(trigger, state) {
        if guards_pass(rule, bindings, model, state, payload)? {
            return Ok(Some(rule));
        }
        debug!(dest = rule.dest.name(), "Candidate rejected by guards");
    }
    Ok(None)
}

fn guards_pass<M: Model>(
    rule: &TransitionRule<M::State>,
    bindings: &Bindings<M>,
    model: &M,
    state: &M::State,
    payload: &M::Payload,
) -> Result<bool, GuardEvaluationError> {
    for condition in &rule.conditions {
        if !bindings.evaluate(condition, model, state, payload)? {
            return Ok(false);
        }
    }
    for unless in &rule.unless {
        if bindings.evaluate(unless, model, state, payload)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn resolve<'a, 'b, M: Model>(
    bindings: &'b Bindings<M>,
    names: impl Iterator<Item = &'a str>,
) -> Result<Vec<(&'a str, &'b Callback<M>)>, GuardEvaluationError> {
    names
        .map(|name| Ok((name, bindings.resolve_callback(name)?)))
        .collect()
}

fn run<M: Model>(
    callbacks: &[(&str, &Callback<M>)],
    model: &mut M,
    payload: &M::Payload,
) -> Result<(), TriggerError> {
    for (name, callback) in callbacks {
        callback
            .run(model, payload)
            .map_err(|source| {
                warn!(callback = *name, error = %source, "Callback failed");
                TriggerError::CallbackFailed {
                    callback: name.to_string(),
                    source,
                }
            })?;
    }
    Ok(())
}

impl<M: Model> fmt::Debug for StateMachine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("current", &self.current)
            .field("rules", &self.table.len())
            .finish()
    }
}
