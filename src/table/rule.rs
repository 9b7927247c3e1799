//! A single transition rule.

use crate::core::State;
use serde::{Deserialize, Serialize};

/// The set of states a rule may fire from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Source<S: State> {
    /// Any state of the alphabet
    Any,
    /// Exactly one state
    One(S),
    /// Any of the listed states
    Many(Vec<S>),
}

impl<S: State> Source<S> {
    pub fn matches(&self, state: &S) -> bool {
        match self {
            Self::Any => true,
            Self::One(s) => s == state,
            Self::Many(states) => states.contains(state),
        }
    }

    /// Whether some state is matched by both sources.
    pub fn overlaps(&self, other: &Source<S>) -> bool {
        match (self, other) {
            (Self::Any, _) | (_, Self::Any) => true,
            (Self::One(s), other) | (other, Self::One(s)) => other.matches(s),
            (Self::Many(a), Self::Many(b)) => a.iter().any(|s| b.contains(s)),
        }
    }

    /// The concrete states this source covers.
    pub fn states(&self) -> Vec<S> {
        match self {
            Self::Any => S::all(),
            Self::One(s) => vec![s.clone()],
            Self::Many(states) => states.clone(),
        }
    }
}

impl<S: State> std::fmt::Display for Source<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::One(s) => write!(f, "{}", s.name()),
            Self::Many(states) => {
                let names: Vec<&str> = states.iter().map(State::name).collect();
                write!(f, "{}", names.join("|"))
            }
        }
    }
}

/// Rule mapping `(trigger, source)` to a destination, gated by named guards
/// and accompanied by named callbacks.
///
/// `conditions` must all evaluate to true and `unless` must all evaluate to
/// false, both in listed order. `before` callbacks run before the state
/// changes and `after` callbacks once it has.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRule<S: State> {
    pub trigger: String,
    pub source: Source<S>,
    pub dest: S,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub unless: Vec<String>,
    #[serde(default)]
    pub before: Vec<String>,
    #[serde(default)]
    pub after: Vec<String>,
}

impl<S: State> TransitionRule<S> {
    /// Unguarded rule with no callbacks.
    pub fn new(trigger: impl Into<String>, source: Source<S>, dest: S) -> Self {
        Self {
            trigger: trigger.into(),
            source,
            dest,
            conditions: Vec::new(),
            unless: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Whether this rule is a candidate for `trigger` fired in `state`.
    pub fn applies(&self, trigger: &str, state: &S) -> bool {
        self.trigger == trigger && self.source.matches(state)
    }

    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty() && self.unless.is_empty()
    }

    /// Guard names in evaluation order.
    pub fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.conditions
            .iter()
            .chain(self.unless.iter())
            .map(String::as_str)
    }

    /// Callback names in execution order.
    pub fn callback_names(&self) -> impl Iterator<Item = &str> {
        self.before.iter().chain(self.after.iter()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        A,
        B,
        C,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
            }
        }

        fn all() -> Vec<Self> {
            vec![Self::A, Self::B, Self::C]
        }
    }

    #[test]
    fn source_matching() {
        assert!(Source::Any.matches(&TestState::C));
        assert!(Source::One(TestState::A).matches(&TestState::A));
        assert!(!Source::One(TestState::A).matches(&TestState::B));

        let many = Source::Many(vec![TestState::A, TestState::B]);
        assert!(many.matches(&TestState::B));
        assert!(!many.matches(&TestState::C));
    }

    #[test]
    fn source_overlap() {
        let a = Source::One(TestState::A);
        let ab = Source::Many(vec![TestState::A, TestState::B]);
        let c = Source::One(TestState::C);

        assert!(a.overlaps(&ab));
        assert!(ab.overlaps(&a));
        assert!(!ab.overlaps(&c));
        assert!(c.overlaps(&Source::Any));
        assert!(!Source::Many(vec![TestState::A]).overlaps(&Source::Many(vec![TestState::B])));
    }

    #[test]
    fn source_display() {
        assert_eq!(Source::<TestState>::Any.to_string(), "*");
        assert_eq!(
            Source::Many(vec![TestState::A, TestState::C]).to_string(),
            "A|C"
        );
        assert_eq!(Source::<TestState>::Any.states(), TestState::all());
    }

    #[test]
    fn rule_applies_on_trigger_and_source() {
        let rule = TransitionRule::new("go", Source::One(TestState::A), TestState::B);

        assert!(rule.applies("go", &TestState::A));
        assert!(!rule.applies("go", &TestState::B));
        assert!(!rule.applies("stop", &TestState::A));
        assert!(rule.is_unconditional());
    }

    #[test]
    fn guard_names_list_conditions_then_unless() {
        let mut rule = TransitionRule::new("go", Source::Any, TestState::C);
        rule.conditions.push("ready".to_string());
        rule.unless.push("blocked".to_string());

        assert_eq!(rule.guard_names().collect::<Vec<_>>(), vec!["ready", "blocked"]);
        assert!(!rule.is_unconditional());
    }
}
