//! Permanently excluded actuators.

use super::ActuatorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of fault-locked actuator ids.
///
/// Insertion is idempotent and there is no removal: a locked
/// actuator stays excluded from aggregate checks for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultLockRegistry {
    locked: BTreeSet<ActuatorId>,
}

impl FaultLockRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `id`. Returns `true` if it was not locked before.
    pub fn lock(&mut self, id: ActuatorId) -> bool {
        self.locked.insert(id)
    }

    /// Whether `id` is locked.
    pub fn is_locked(&self, id: ActuatorId) -> bool {
        self.locked.contains(&id)
    }

    /// Locked ids in ascending order.
    pub fn locked_ids(&self) -> impl Iterator<Item = ActuatorId> + '_ {
        self.locked.iter().copied()
    }

    /// Number of locked actuators.
    pub fn len(&self) -> usize {
        self.locked.len()
    }

    /// Whether no actuator is locked.
    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_is_idempotent() {
        let mut locks = FaultLockRegistry::new();
        assert!(locks.lock(4));
        assert!(!locks.lock(4));
        assert_eq!(locks.len(), 1);
        assert!(locks.is_locked(4));
        assert!(!locks.is_locked(5));
    }

    #[test]
    fn locked_ids_are_sorted() {
        let mut locks = FaultLockRegistry::new();
        locks.lock(6);
        locks.lock(2);
        locks.lock(4);
        assert_eq!(locks.locked_ids().collect::<Vec<_>>(), vec![2, 4, 6]);
    }
}
