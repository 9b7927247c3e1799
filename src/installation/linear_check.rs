//! Linear travel readings collected during the POST linear check.

use super::ActuatorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_VARIANCE_TOLERANCE_MM: f32 = 2.0;

/// Per-actuator travel readings in millimetres and the tolerance their
/// spread must stay within.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearCheck {
    tolerance_mm: f32,
    readings: BTreeMap<ActuatorId, f32>,
}

impl Default for LinearCheck {
    fn default() -> Self {
        Self::new(DEFAULT_VARIANCE_TOLERANCE_MM)
    }
}

impl LinearCheck {
    pub fn new(tolerance_mm: f32) -> Self {
        Self {
            tolerance_mm,
            readings: BTreeMap::new(),
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance_mm
    }

    /// Store a reading, replacing any earlier one for the same actuator.
    /// Returns `false` and stores nothing if `mm` is not finite.
    pub fn record(&mut self, id: ActuatorId, mm: f32) -> bool {
        if !mm.is_finite() {
            return false;
        }
        self.readings.insert(id, mm);
        true
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    pub fn reading(&self, id: ActuatorId) -> Option<f32> {
        self.readings.get(&id).copied()
    }

    pub fn readings(&self) -> impl Iterator<Item = (ActuatorId, f32)> + '_ {
        self.readings.iter().map(|(id, mm)| (*id, *mm))
    }

    /// Max minus min over the readings of `expected`. `None` until at least
    /// one of them has reported.
    pub fn spread(&self, expected: &[ActuatorId]) -> Option<f32> {
        let values = self.values(expected);
        let max = values.iter().copied().reduce(f32::max)?;
        let min = values.iter().copied().reduce(f32::min)?;
        Some(max - min)
    }

    /// True when every expected actuator has reported and the spread is
    /// within tolerance. Holds vacuously for an empty `expected`.
    pub fn variance_ok(&self, expected: &[ActuatorId]) -> bool {
        if expected.is_empty() {
            return true;
        }
        if self.first_missing(expected).is_some() {
            return false;
        }
        self.spread(expected)
            .is_some_and(|spread| spread <= self.tolerance_mm)
    }

    /// The actuator to blame for a failed check: the lowest id without a
    /// reading, else the one furthest from the median (lowest id on ties).
    pub fn offending(&self, expected: &[ActuatorId]) -> Option<ActuatorId> {
        if let Some(id) = self.first_missing(expected) {
            return Some(id);
        }
        let median = median(self.values(expected))?;

        let mut worst: Option<(ActuatorId, f32)> = None;
        for &id in expected {
            let Some(mm) = self.reading(id) else {
                continue;
            };
            let deviation = (mm - median).abs();
            match worst {
                Some((_, d)) if d >= deviation => {}
                _ => worst = Some((id, deviation)),
            }
        }
        worst.map(|(id, _)| id)
    }

    fn first_missing(&self, expected: &[ActuatorId]) -> Option<ActuatorId> {
        let mut ids = expected.to_vec();
        ids.sort_unstable();
        ids.into_iter().find(|id| !self.readings.contains_key(id))
    }

    fn values(&self, expected: &[ActuatorId]) -> Vec<f32> {
        expected
            .iter()
            .filter_map(|id| self.readings.get(id).copied())
            .collect()
    }
}

fn median(mut values: Vec<f32>) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
