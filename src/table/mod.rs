//! Ordered transition tables.
//!
//! A table is the static definition of a machine: its rules in registration
//! order plus the enter/exit hooks attached to individual states. Rule order
//! is significant. When several rules share a trigger and source, the first
//! whose guards pass is the one that fires.

mod rule;

pub use rule::{Source, TransitionRule};

use crate::core::State;
use serde::{Deserialize, Serialize};

/// Callback names attached to entering or leaving one state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHook<S: State> {
    pub state: S,
    pub callback: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionTable<S: State> {
    rules: Vec<TransitionRule<S>>,
    #[serde(default)]
    on_enter: Vec<StateHook<S>>,
    #[serde(default)]
    on_exit: Vec<StateHook<S>>,
}

impl<S: State> TransitionTable<S> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            on_enter: Vec::new(),
            on_exit: Vec::new(),
        }
    }

    /// Append a rule after every rule already registered.
    pub fn add(&mut self, rule: TransitionRule<S>) {
        self.rules.push(rule);
    }

    /// Attach a callback run whenever `state` is entered by a non-reflexive
    /// transition.
    pub fn on_enter(&mut self, state: S, callback: impl Into<String>) {
        self.on_enter.push(StateHook {
            state,
            callback: callback.into(),
        });
    }

    /// Attach a callback run whenever `state` is left by a non-reflexive
    /// transition.
    pub fn on_exit(&mut self, state: S, callback: impl Into<String>) {
        self.on_exit.push(StateHook {
            state,
            callback: callback.into(),
        });
    }

    pub fn rules(&self) -> &[TransitionRule<S>] {
        &self.rules
    }

    /// Rules for `trigger` whose source matches `state`, in registration order.
    pub fn candidates<'a, 'q>(
        &'a self,
        trigger: &'q str,
        state: &'q S,
    ) -> impl Iterator<Item = &'a TransitionRule<S>> + 'q
    where
        'a: 'q,
    {
        self.rules.iter().filter(move |r| r.applies(trigger, state))
    }

    /// Whether any rule is registered under `trigger`.
    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.rules.iter().any(|r| r.trigger == trigger)
    }

    /// Distinct trigger names in first-registration order.
    pub fn triggers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.trigger.as_str()) {
                names.push(&rule.trigger);
            }
        }
        names
    }

    /// Callbacks run when `state` is entered, in registration order.
    pub fn enter_callbacks(&self, state: &S) -> Vec<&str> {
        hooks_for(&self.on_enter, state)
    }

    /// Callbacks run when `state` is left, in registration order.
    pub fn exit_callbacks(&self, state: &S) -> Vec<&str> {
        hooks_for(&self.on_exit, state)
    }

    /// Every state hook, enter hooks first.
    pub fn hook_callbacks(&self) -> impl Iterator<Item = &StateHook<S>> {
        self.on_enter.iter().chain(self.on_exit.iter())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: State> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn hooks_for<'a, S: State>(hooks: &'a [StateHook<S>], state: &S) -> Vec<&'a str> {
    hooks
        .iter()
        .filter(|h| &h.state == state)
        .map(|h| h.callback.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Active,
        Parked,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Active => "Active",
                Self::Parked => "Parked",
            }
        }

        fn all() -> Vec<Self> {
            vec![Self::Idle, Self::Active, Self::Parked]
        }
    }

    fn table() -> TransitionTable<TestState> {
        let mut table = TransitionTable::new();
        let mut ok = TransitionRule::new("stop", Source::One(TestState::Active), TestState::Idle);
        ok.conditions.push("ready".into());
        let mut park =
            TransitionRule::new("stop", Source::One(TestState::Active), TestState::Parked);
        park.unless.push("ready".into());
        table.add(TransitionRule::new(
            "start",
            Source::Many(vec![TestState::Idle, TestState::Active]),
            TestState::Active,
        ));
        table.add(ok);
        table.add(park);
        table
    }

    #[test]
    fn candidates_preserve_registration_order() {
        let table = table();
        let dests: Vec<_> = table
            .candidates("stop", &TestState::Active)
            .map(|r| r.dest.clone())
            .collect();

        assert_eq!(dests, vec![TestState::Idle, TestState::Parked]);
        assert_eq!(table.candidates("stop", &TestState::Idle).count(), 0);
    }

    #[test]
    fn triggers_are_distinct_and_ordered() {
        let table = table();
        assert_eq!(table.triggers(), vec!["start", "stop"]);
        assert!(table.has_trigger("start"));
        assert!(!table.has_trigger("explode"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn hooks_are_looked_up_per_state() {
        let mut table = table();
        table.on_enter(TestState::Active, "spin_up");
        table.on_enter(TestState::Active, "light_on");
        table.on_exit(TestState::Active, "spin_down");

        assert_eq!(
            table.enter_callbacks(&TestState::Active),
            vec!["spin_up", "light_on"]
        );
        assert_eq!(
            table.exit_callbacks(&TestState::Active),
            vec!["spin_down"]
        );
        assert!(table.enter_callbacks(&TestState::Idle).is_empty());
        assert_eq!(table.hook_callbacks().count(), 3);
    }
}
