//! Table checks using Validation to report every problem at once.

use crate::core::{Bindings, Model, State};
use crate::table::TransitionTable;
use crate::validation::violations::Violation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<Violation>>;

fn require(ok: bool, violation: impl FnOnce() -> Violation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Check a table against the bindings it will run with.
///
/// Unlike a fail-fast check this keeps going after the first problem, so
/// a table author sees every unresolved name and every unreachable rule in
/// a single pass.
pub fn validate<M: Model>(
    table: &TransitionTable<M::State>,
    bindings: &Bindings<M>,
) -> Validation<(), NonEmptyVec<Violation>> {
    let mut checks: Vec<Check> = Vec::new();

    for (index, rule) in table.rules().iter().enumerate() {
        for guard in rule.guard_names() {
            checks.push(require(bindings.has_guard(guard), || {
                Violation::UnresolvedGuard {
                    rule: index,
                    trigger: rule.trigger.clone(),
                    guard: guard.to_string(),
                }
            }));
        }

        for callback in rule.callback_names() {
            checks.push(require(bindings.has_callback(callback), || {
                Violation::UnresolvedCallback {
                    rule: index,
                    trigger: rule.trigger.clone(),
                    callback: callback.to_string(),
                }
            }));
        }

        // An earlier unguarded rule whose sources cover this rule's always wins.
        let shadow = table.rules()[..index].iter().position(|earlier| {
            earlier.trigger == rule.trigger
                && earlier.is_unconditional()
                && covers(&earlier.source.states(), &rule.source.states())
        });
        checks.push(require(shadow.is_none(), || Violation::ShadowedRule {
            rule: index,
            trigger: rule.trigger.clone(),
            shadowed_by: shadow.unwrap_or_default(),
        }));
    }

    for hook in table.hook_callbacks() {
        checks.push(require(bindings.has_callback(&hook.callback), || {
            Violation::UnresolvedHook {
                state: hook.state.name().to_string(),
                callback: hook.callback.clone(),
            }
        }));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// [`validate`] with the violations collected into a plain `Vec`.
pub fn check<M: Model>(
    table: &TransitionTable<M::State>,
    bindings: &Bindings<M>,
) -> Result<(), Vec<Violation>> {
    match validate(table, bindings) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(violations) => Err(violations.iter().cloned().collect()),
    }
}

/// Whether every state in `later` is also in `earlier`.
fn covers<S: State>(earlier: &[S], later: &[S]) -> bool {
    later.iter().all(|s| earlier.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CallbackError;
    use crate::table::{Source, TransitionRule};
    use serde::{Deserialize, Serialize};

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

    struct Rig;

    impl Model for Rig {
        type State = TestState;
        type Payload = ();

        fn bindings() -> Bindings<Self> {
            Bindings::new()
                .guard("ready", |_, _, _| true)
                .callback("note", |_, _| Ok(()))
                .callback("refuse", |_, _| Err(CallbackError::new("no")))
        }
    }

    fn rule(trigger: &str, from: TestState, to: TestState) -> TransitionRule<TestState> {
        TransitionRule::new(trigger, Source::One(from), to)
    }

    #[test]
    fn consistent_table_passes() {
        let mut table = TransitionTable::new();
        let mut go = rule("go", TestState::Idle, TestState::Active);
        go.conditions.push("ready".into());
        go.before.push("note".into());
        let mut park = rule("go", TestState::Idle, TestState::Parked);
        park.unless.push("ready".into());
        table.add(go);
        table.add(park);
        table.on_enter(TestState::Active, "note");

        assert!(validate(&table, &Rig::bindings()).is_success());
        assert_eq!(check(&table, &Rig::bindings()), Ok(()));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let mut table = TransitionTable::new();
        let mut go = rule("go", TestState::Idle, TestState::Active);
        go.conditions.push("missing_guard".into());
        go.after.push("missing_callback".into());
        table.add(go);
        table.on_exit(TestState::Idle, "missing_hook");

        let violations = check(&table, &Rig::bindings()).unwrap_err();

        assert_eq!(violations.len(), 3);
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::UnresolvedGuard { guard, .. } if guard == "missing_guard")));
        assert!(violations.iter().any(
            |v| matches!(v, Violation::UnresolvedCallback { callback, .. } if callback == "missing_callback")
        ));
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::UnresolvedHook { state, .. } if state == "Idle")));
    }

    #[test]
    fn unguarded_rule_shadows_later_rule() {
        let mut table = TransitionTable::new();
        table.add(TransitionRule::new("go", Source::Any, TestState::Active));
        table.add(rule("go", TestState::Parked, TestState::Idle));

        let violations = check(&table, &Rig::bindings()).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::ShadowedRule {
                rule: 1,
                trigger: "go".to_string(),
                shadowed_by: 0,
            }]
        );
    }

    #[test]
    fn partial_overlap_is_not_shadowing() {
        let mut table = TransitionTable::new();
        table.add(rule("start", TestState::Idle, TestState::Active));
        table.add(TransitionRule::new(
            "start",
            Source::Many(vec![TestState::Idle, TestState::Active]),
            TestState::Active,
        ));

        assert!(check(&table, &Rig::bindings()).is_ok());
    }
}
