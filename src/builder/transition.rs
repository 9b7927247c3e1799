//! Builder for constructing transition rules.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::table::{Source, TransitionRule};

/// Builder for constructing transition rules with a fluent API.
///
/// Guard and callback names are kept in the order they are added, which is
/// the order they are evaluated and run in.
#[derive(Clone, Debug)]
pub struct TransitionBuilder<S: State> {
    trigger: Option<String>,
    source: Option<Source<S>>,
    dest: Option<S>,
    conditions: Vec<String>,
    unless: Vec<String>,
    before: Vec<String>,
    after: Vec<String>,
}

impl<S: State> TransitionBuilder<S> {
    /// Create an empty builder. Prefer [`TransitionBuilder::on`].
    pub fn new() -> Self {
        Self {
            trigger: None,
            source: None,
            dest: None,
            conditions: Vec::new(),
            unless: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Start a rule fired by `trigger`.
    pub fn on(trigger: impl Into<String>) -> Self {
        Self::new().trigger(trigger)
    }

    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Set a single source state.
    pub fn from(mut self, state: S) -> Self {
        self.source = Some(Source::One(state));
        self
    }

    /// Allow the rule to fire from any of `states`.
    pub fn from_any_of(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.source = Some(Source::Many(states.into_iter().collect()));
        self
    }

    /// Allow the rule to fire from every state.
    pub fn from_any(mut self) -> Self {
        self.source = Some(Source::Any);
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: S) -> Self {
        self.dest = Some(state);
        self
    }

    /// Require the named guard to be true.
    pub fn when(mut self, guard: impl Into<String>) -> Self {
        self.conditions.push(guard.into());
        self
    }

    /// Require the named guard to be false.
    pub fn unless(mut self, guard: impl Into<String>) -> Self {
        self.unless.push(guard.into());
        self
    }

    /// Run the named callback before the state changes.
    pub fn before(mut self, callback: impl Into<String>) -> Self {
        self.before.push(callback.into());
        self
    }

    /// Run the named callback after the state has changed.
    pub fn after(mut self, callback: impl Into<String>) -> Self {
        self.after.push(callback.into());
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<TransitionRule<S>, BuildError> {
        let trigger = self.trigger.ok_or(BuildError::MissingTrigger)?;
        let source = self.source.ok_or(BuildError::MissingFromState)?;
        let dest = self.dest.ok_or(BuildError::MissingToState)?;

        Ok(TransitionRule {
            trigger,
            source,
            dest,
            conditions: self.conditions,
            unless: self.unless,
            before: self.before,
            after: self.after,
        })
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Busy,
        Parked,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Busy => "Busy",
                Self::Parked => "Parked",
            }
        }

        fn all() -> Vec<Self> {
            vec![Self::Idle, Self::Busy, Self::Parked]
        }
    }

    #[test]
    fn builder_validates_required_fields() {
        let missing_trigger = TransitionBuilder::<TestState>::new()
            .from(TestState::Idle)
            .to(TestState::Busy)
            .build();
        assert!(matches!(missing_trigger, Err(BuildError::MissingTrigger)));

        let missing_from = TransitionBuilder::<TestState>::on("go")
            .to(TestState::Busy)
            .build();
        assert!(matches!(missing_from, Err(BuildError::MissingFromState)));

        let missing_to = TransitionBuilder::<TestState>::on("go")
            .from(TestState::Idle)
            .build();
        assert!(matches!(missing_to, Err(BuildError::MissingToState)));
    }

    #[test]
    fn fluent_api_keeps_guard_and_callback_order() {
        let rule = TransitionBuilder::on("go")
            .from_any_of([TestState::Idle, TestState::Busy])
            .to(TestState::Busy)
            .when("first")
            .when("second")
            .unless("blocked")
            .before("prepare")
            .after("report")
            .after("tidy")
            .build()
            .unwrap();

        assert_eq!(rule.trigger, "go");
        assert_eq!(
            rule.source,
            Source::Many(vec![TestState::Idle, TestState::Busy])
        );
        assert_eq!(rule.conditions, vec!["first", "second"]);
        assert_eq!(rule.unless, vec!["blocked"]);
        assert_eq!(rule.before, vec!["prepare"]);
        assert_eq!(rule.after, vec!["report", "tidy"]);
    }

    #[test]
    fn from_any_matches_every_state() {
        let rule = TransitionBuilder::on("halt")
            .from_any()
            .to(TestState::Parked)
            .build()
            .unwrap();

        for state in TestState::all() {
            assert!(rule.applies("halt", &state));
        }
    }
}
