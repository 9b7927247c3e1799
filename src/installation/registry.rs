//! The arena of box sub-machines and its aggregate predicates.

use super::actuator::{Alignment, BoxMachine, BoxModel};
use super::error::InstallationError;
use super::locks::FaultLockRegistry;
use super::ActuatorId;
use crate::core::GuardEvaluationError;
use crate::engine::MachineDefinition;
use std::collections::BTreeMap;
use tracing::warn;

/// Single owner of every box sub-machine, keyed by actuator id, together
/// with the fault locks that exclude boxes from aggregate checks.
///
/// Aggregates are recomputed from the boxes on every call.
pub struct SubMachineRegistry {
    definition: MachineDefinition<BoxModel>,
    boxes: BTreeMap<ActuatorId, BoxMachine>,
    locks: FaultLockRegistry,
}

impl SubMachineRegistry {
    /// Create one aligned, unlocked box per id.
    pub fn new(
        definition: MachineDefinition<BoxModel>,
        ids: impl IntoIterator<Item = ActuatorId>,
    ) -> Self {
        let boxes = ids
            .into_iter()
            .map(|id| (id, definition.instantiate(format!("box-{id}"), BoxModel::new(id))))
            .collect();
        Self {
            definition,
            boxes,
            locks: FaultLockRegistry::new(),
        }
    }

    /// The sub-machine of one box, if the id belongs to this installation.
    pub fn get(&self, id: ActuatorId) -> Option<&BoxMachine> {
        self.boxes.get(&id)
    }

    /// Current alignment of one box.
    pub fn alignment(&self, id: ActuatorId) -> Option<&Alignment> {
        self.get(id).map(BoxMachine::current_state)
    }

    /// Route a trigger to one box's sub-machine.
    pub fn trigger(&mut self, id: ActuatorId, trigger: &str) -> Result<(), InstallationError> {
        let machine = self
            .boxes
            .get_mut(&id)
            .ok_or(InstallationError::UnknownActuator { id })?;
        machine
            .fire(trigger)
            .map_err(|source| InstallationError::Actuator { id, source })
    }

    /// Fault-lock an actuator. Returns `true` if it was not locked before.
    pub fn lock(&mut self, id: ActuatorId) -> Result<bool, InstallationError> {
        let machine = self
            .boxes
            .get_mut(&id)
            .ok_or(InstallationError::UnknownActuator { id })?;
        machine.model_mut().lock();
        let newly = self.locks.lock(id);
        if newly {
            warn!(actuator = id, "Actuator fault-locked and excluded from aggregate checks");
        }
        Ok(newly)
    }

    /// Whether `id` has been fault-locked.
    pub fn is_locked(&self, id: ActuatorId) -> bool {
        self.locks.is_locked(id)
    }

    /// The fault locks applied so far.
    pub fn locks(&self) -> &FaultLockRegistry {
        &self.locks
    }

    /// Logical AND of the named box guard over every box, skipping locked
    /// boxes when `exclude_locked` is set. An empty set yields `true`.
    pub fn aggregate(
        &self,
        predicate: &str,
        exclude_locked: bool,
    ) -> Result<bool, GuardEvaluationError> {
        if !self.definition.bindings.has_guard(predicate) {
            return Err(GuardEvaluationError::UnknownGuard {
                name: predicate.to_string(),
            });
        }
        for machine in self.effective(exclude_locked) {
            if !machine.evaluate(predicate, &())? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [`aggregate`](Self::aggregate) with a statically resolved predicate.
    pub fn aggregate_with<F>(&self, predicate: F, exclude_locked: bool) -> bool
    where
        F: Fn(&BoxMachine) -> bool,
    {
        self.effective(exclude_locked).all(predicate)
    }

    /// Every box that is not fault-locked is aligned.
    pub fn all_aligned(&self) -> bool {
        self.aggregate_with(|m| *m.current_state() == Alignment::Aligned, true)
    }

    /// Ids of unlocked boxes that are currently misaligned.
    pub fn misaligned(&self) -> Vec<ActuatorId> {
        self.effective(true)
            .filter(|m| *m.current_state() == Alignment::Misaligned)
            .map(|m| m.model().id())
            .collect()
    }

    /// Ids of boxes that are not fault-locked, ascending.
    pub fn active_ids(&self) -> Vec<ActuatorId> {
        self.effective(true).map(|m| m.model().id()).collect()
    }

    /// Every actuator id, locked or not, ascending.
    pub fn ids(&self) -> impl Iterator<Item = ActuatorId> + '_ {
        self.boxes.keys().copied()
    }

    /// Every box sub-machine in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxMachine> {
        self.boxes.values()
    }

    /// Whether `id` belongs to this installation.
    pub fn contains(&self, id: ActuatorId) -> bool {
        self.boxes.contains_key(&id)
    }

    /// Number of boxes, locked ones included.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the installation has no boxes at all.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn effective(&self, exclude_locked: bool) -> impl Iterator<Item = &BoxMachine> {
        self.boxes
            .iter()
            .filter(move |(id, _)| !(exclude_locked && self.locks.is_locked(**id)))
            .map(|(_, machine)| machine)
    }
}
