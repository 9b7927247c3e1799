//! Per-actuator alignment sub-machines.

use super::ActuatorId;
use crate::builder::{simple_transition, BuildError, MachineBuilder};
use crate::core::{Bindings, Model};
use crate::engine::{MachineDefinition, StateMachine};
use crate::state_enum;

pub const PROVOKE_MISALIGNMENT: &str = "provoke_misalignment";
pub const ALIGNMENT_ACHIEVED: &str = "alignment_achieved";

/// Guard true while the box sits in [`Alignment::Aligned`].
pub const IS_ALIGNED: &str = "is_aligned";

state_enum! {
    /// Alignment of one box relative to its neighbours.
    pub enum Alignment {
        Aligned,
        Misaligned,
    }
}

/// The data behind one box's sub-machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxModel {
    id: ActuatorId,
    locked: bool,
}

impl BoxModel {
    pub fn new(id: ActuatorId) -> Self {
        Self { id, locked: false }
    }

    pub fn id(&self) -> ActuatorId {
        self.id
    }

    /// Whether the actuator has been fault-locked. Once set, never cleared.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }
}

impl Model for BoxModel {
    type State = Alignment;
    type Payload = ();

    fn bindings() -> Bindings<Self> {
        Bindings::new().guard(IS_ALIGNED, |_, state: &Alignment, _| {
            *state == Alignment::Aligned
        })
    }
}

pub type BoxMachine = StateMachine<BoxModel>;

/// The shared `Aligned ⇄ Misaligned` definition every box runs.
pub fn box_definition(history_capacity: usize) -> Result<MachineDefinition<BoxModel>, BuildError> {
    MachineBuilder::new()
        .initial(Alignment::Aligned)
        .add_transition(simple_transition(
            PROVOKE_MISALIGNMENT,
            Alignment::Aligned,
            Alignment::Misaligned,
        ))
        .add_transition(simple_transition(
            ALIGNMENT_ACHIEVED,
            Alignment::Misaligned,
            Alignment::Aligned,
        ))
        .history_capacity(history_capacity)
        .build_definition()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_HISTORY_CAPACITY;
    use crate::engine::TriggerError;

    fn machine(id: ActuatorId) -> BoxMachine {
        box_definition(DEFAULT_HISTORY_CAPACITY)
            .unwrap()
            .instantiate(format!("box-{id}"), BoxModel::new(id))
    }

    #[test]
    fn boxes_start_aligned_and_unlocked() {
        let machine = machine(3);
        assert_eq!(machine.current_state(), &Alignment::Aligned);
        assert_eq!(machine.model().id(), 3);
        assert!(!machine.model().is_locked());
        assert_eq!(machine.evaluate(IS_ALIGNED, &()), Ok(true));
    }

    #[test]
    fn alignment_toggles_both_ways() {
        let mut machine = machine(1);
        machine.fire(PROVOKE_MISALIGNMENT).unwrap();
        assert_eq!(machine.current_state(), &Alignment::Misaligned);
        assert_eq!(machine.evaluate(IS_ALIGNED, &()), Ok(false));

        machine.fire(ALIGNMENT_ACHIEVED).unwrap();
        assert_eq!(machine.current_state(), &Alignment::Aligned);
    }

    #[test]
    fn aligning_an_aligned_box_is_invalid() {
        let mut machine = machine(1);
        let err = machine.fire(ALIGNMENT_ACHIEVED).unwrap_err();
        assert!(matches!(err, TriggerError::InvalidTransition { .. }));
        assert_eq!(machine.current_state(), &Alignment::Aligned);
    }

    #[test]
    fn lock_is_monotone() {
        let mut model = BoxModel::new(2);
        model.lock();
        model.lock();
        assert!(model.is_locked());
    }
}
