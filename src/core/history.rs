//! In-memory transition journal.
//!
//! Each machine keeps the most recent committed transitions so operators and
//! presentation layers can see how it reached its current state. The journal
//! is bounded and lives only as long as the machine.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions a history retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use maestro::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Valve { Shut, Open }
///
/// impl State for Valve {
///     fn name(&self) -> &str {
///         match self {
///             Self::Shut => "Shut",
///             Self::Open => "Open",
///         }
///     }
///     fn all() -> Vec<Self> { vec![Self::Shut, Self::Open] }
/// }
///
/// let transition = StateTransition {
///     trigger: "open".to_string(),
///     from: Valve::Shut,
///     to: Valve::Open,
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_reflexive());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The trigger that fired
    pub trigger: String,
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    pub fn is_reflexive(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered, bounded history of committed transitions.
///
/// When the capacity is reached the oldest entry is dropped.
///
/// # Example
///
/// ```rust
/// use maestro::core::{State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phase { One, Two, Three }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::One => "One",
///             Self::Two => "Two",
///             Self::Three => "Three",
///         }
///     }
///     fn all() -> Vec<Self> { vec![Self::One, Self::Two, Self::Three] }
/// }
///
/// let mut history = StateHistory::new();
/// history.record(StateTransition {
///     trigger: "advance".into(),
///     from: Phase::One,
///     to: Phase::Two,
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     trigger: "advance".into(),
///     from: Phase::Two,
///     to: Phase::Three,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history retaining at most `capacity` transitions.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        // A deserialized history may carry a zero capacity or excess entries.
        while self.transitions.len() >= self.capacity.max(1) {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed by the retained transitions: the `from` of the
    /// oldest entry followed by the `to` of every entry.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Elapsed time between the oldest and newest retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
