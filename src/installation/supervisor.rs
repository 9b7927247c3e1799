//! The installation supervisor: POST sequence, faults and play lifecycle.

use super::actuator::{box_definition, Alignment};
use super::error::InstallationError;
use super::linear_check;
use super::registry::SubMachineRegistry;
use super::ActuatorId;
use crate::builder::{simple_transition, BuildError, MachineBuilder, TransitionBuilder};
use crate::config::InstallationConfig;
use crate::core::{Bindings, CallbackError, Model};
use crate::engine::{MachineDefinition, StateMachine};
use crate::state_enum;
use crate::table::TransitionRule;
use tracing::{info, warn};

state_enum! {
    /// Lifecycle of the whole installation.
    pub enum Lifecycle {
        Attract,
        WarmUpCycle,
        ExtensionMode,
        RotationCheck,
        LinearCheck,
        InteractiveChecks,
        /// Waiting for a curator after a failed linear check.
        FaultMode,
        /// Waiting for boxes to be realigned after play.
        AttractIntervention,
        GameMode,
    }
    holding: [FaultMode, AttractIntervention]
}

pub mod triggers {
    pub const POWER_ON: &str = "power_on";
    pub const WARMUP_COMPLETE: &str = "warmup_complete";
    pub const EXTENSION_CHECK_COMPLETE: &str = "extension_check_complete";
    pub const ROTATION_CHECK_COMPLETE: &str = "rotation_check_complete";
    pub const LINEAR_CHECK_COMPLETE: &str = "linear_check_complete";
    pub const LINEAR_CHECK_FAILURE: &str = "linear_check_failure";
    pub const INTERACTIVE_CHECKS_COMPLETE: &str = "interactive_checks_complete";
    pub const RESUME_FROM_FAULT: &str = "resume_from_fault";
    pub const START_INTERACTION: &str = "start_interaction";
    pub const RETURN_TO_ATTRACT: &str = "return_to_attract";
    pub const FORCE_SYSTEM_READY: &str = "force_system_ready";
}

pub mod guards {
    pub const MOTOR_VARIANCE_OK: &str = "motor_variance_ok";
    pub const ALL_BOXES_ALIGNED: &str = "all_boxes_aligned";
    /// True unless the payload names an actuator this installation lacks.
    pub const KNOWN_ACTUATOR: &str = "known_actuator";
}

pub mod callbacks {
    pub const LOCK_ACTUATOR: &str = "lock_actuator";
    pub const LOG_INTERACTION_START: &str = "log_interaction_start";
    pub const RECORD_OFFENDING_ACTUATOR: &str = "record_offending_actuator";
    pub const BEGIN_POST: &str = "begin_post";
    pub const ANNOUNCE_GAME_MODE: &str = "announce_game_mode";
}

/// The supervisor's model: every box, the current POST readings and the
/// bookkeeping the curator flow needs.
pub struct Installation {
    boxes: SubMachineRegistry,
    linear_check: linear_check::LinearCheck,
    offending: Option<ActuatorId>,
    interactions: u64,
}

impl Installation {
    /// Boxes numbered `1..=actuator_count`, all aligned and unlocked.
    pub fn new(
        actuator_count: ActuatorId,
        tolerance_mm: f32,
        history_capacity: usize,
    ) -> Result<Self, InstallationError> {
        let definition = box_definition(history_capacity)?;
        Ok(Self {
            boxes: SubMachineRegistry::new(definition, 1..=actuator_count),
            linear_check: linear_check::LinearCheck::new(tolerance_mm),
            offending: None,
            interactions: 0,
        })
    }

    /// [`new`](Self::new) with the counts from a validated config.
    pub fn from_config(config: &InstallationConfig) -> Result<Self, InstallationError> {
        Self::new(
            config.actuator_count,
            config.variance_tolerance_mm,
            config.history_capacity,
        )
    }

    /// The box sub-machines and their fault locks.
    pub fn boxes(&self) -> &SubMachineRegistry {
        &self.boxes
    }

    /// Readings collected since the current POST began.
    pub fn linear_check(&self) -> &linear_check::LinearCheck {
        &self.linear_check
    }

    /// Actuator blamed for the last failed linear check, until a curator
    /// resolves it or a new POST starts.
    pub fn offending_actuator(&self) -> Option<ActuatorId> {
        self.offending
    }

    /// Interactions started since the installation was created.
    pub fn interactions(&self) -> u64 {
        self.interactions
    }

    /// Store a linear travel reading reported by the hardware layer.
    pub fn record_reading(&mut self, id: ActuatorId, mm: f32) -> Result<(), InstallationError> {
        if !self.boxes.contains(id) {
            return Err(InstallationError::UnknownActuator { id });
        }
        if !self.linear_check.record(id, mm) {
            return Err(InstallationError::InvalidReading { id, value: mm });
        }
        Ok(())
    }

    /// Route an alignment trigger to one box.
    pub fn trigger_box(&mut self, id: ActuatorId, trigger: &str) -> Result<(), InstallationError> {
        self.boxes.trigger(id, trigger)
    }

    pub fn alignment(&self, id: ActuatorId) -> Option<&Alignment> {
        self.boxes.alignment(id)
    }

    /// Fault-lock an actuator outside the curator flow.
    pub fn lock_actuator(&mut self, id: ActuatorId) -> Result<bool, InstallationError> {
        self.boxes.lock(id)
    }

    /// Whether `id` has been fault-locked.
    pub fn is_locked(&self, id: ActuatorId) -> bool {
        self.boxes.is_locked(id)
    }

    fn motor_variance_ok(&self) -> bool {
        self.linear_check.variance_ok(&self.boxes.active_ids())
    }
}

impl Model for Installation {
    type State = Lifecycle;
    /// Actuator named by the hardware layer or the curator, if any.
    type Payload = Option<ActuatorId>;

    fn bindings() -> Bindings<Self> {
        Bindings::new()
            .guard(guards::MOTOR_VARIANCE_OK, |m: &Self, _, _| m.motor_variance_ok())
            .guard(guards::ALL_BOXES_ALIGNED, |m: &Self, _, _| m.boxes.all_aligned())
            .guard(guards::KNOWN_ACTUATOR, |m: &Self, _, payload: &Option<ActuatorId>| {
                payload.map_or(true, |id| m.boxes.contains(id))
            })
            .callback(callbacks::BEGIN_POST, |m: &mut Self, _| {
                m.linear_check.clear();
                m.offending = None;
                info!(actuators = m.boxes.len(), "Power-on self test started");
                Ok(())
            })
            .callback(callbacks::RECORD_OFFENDING_ACTUATOR, |m: &mut Self, payload| {
                let active = m.boxes.active_ids();
                m.offending = payload.or_else(|| m.linear_check.offending(&active));
                warn!(
                    actuator = ?m.offending,
                    spread_mm = ?m.linear_check.spread(&active),
                    "Linear check failed"
                );
                Ok(())
            })
            .callback(callbacks::LOCK_ACTUATOR, |m: &mut Self, payload| {
                let id = payload
                    .or(m.offending)
                    .ok_or_else(|| CallbackError::new("no actuator named and none recorded"))?;
                m.boxes
                    .lock(id)
                    .map_err(|e| CallbackError::new(e.to_string()))?;
                m.offending = None;
                Ok(())
            })
            .callback(callbacks::LOG_INTERACTION_START, |m: &mut Self, _| {
                m.interactions += 1;
                info!(interactions = m.interactions, "Interaction started");
                Ok(())
            })
            .callback(callbacks::ANNOUNCE_GAME_MODE, |m: &mut Self, _| {
                info!(locked = m.boxes.locks().len(), "Entering game mode");
                Ok(())
            })
    }
}

pub type Supervisor = StateMachine<Installation>;

/// The supervisor transition table, in evaluation order.
pub fn supervisor_rules() -> Result<Vec<TransitionRule<Lifecycle>>, BuildError> {
    use Lifecycle::*;

    Ok(vec![
        simple_transition(triggers::POWER_ON, Attract, WarmUpCycle),
        simple_transition(triggers::WARMUP_COMPLETE, WarmUpCycle, ExtensionMode),
        simple_transition(triggers::EXTENSION_CHECK_COMPLETE, ExtensionMode, RotationCheck),
        simple_transition(triggers::ROTATION_CHECK_COMPLETE, RotationCheck, LinearCheck),
        TransitionBuilder::on(triggers::LINEAR_CHECK_COMPLETE)
            .from(LinearCheck)
            .to(InteractiveChecks)
            .when(guards::MOTOR_VARIANCE_OK)
            .build()?,
        TransitionBuilder::on(triggers::LINEAR_CHECK_FAILURE)
            .from(LinearCheck)
            .to(FaultMode)
            .when(guards::KNOWN_ACTUATOR)
            .unless(guards::MOTOR_VARIANCE_OK)
            .after(callbacks::RECORD_OFFENDING_ACTUATOR)
            .build()?,
        simple_transition(triggers::INTERACTIVE_CHECKS_COMPLETE, InteractiveChecks, Attract),
        TransitionBuilder::on(triggers::RESUME_FROM_FAULT)
            .from(FaultMode)
            .to(Attract)
            .when(guards::KNOWN_ACTUATOR)
            .before(callbacks::LOCK_ACTUATOR)
            .build()?,
        TransitionBuilder::on(triggers::START_INTERACTION)
            .from_any_of([Attract, GameMode])
            .to(GameMode)
            .before(callbacks::LOG_INTERACTION_START)
            .build()?,
        TransitionBuilder::on(triggers::RETURN_TO_ATTRACT)
            .from(GameMode)
            .to(Attract)
            .when(guards::ALL_BOXES_ALIGNED)
            .build()?,
        TransitionBuilder::on(triggers::RETURN_TO_ATTRACT)
            .from(GameMode)
            .to(AttractIntervention)
            .unless(guards::ALL_BOXES_ALIGNED)
            .build()?,
        TransitionBuilder::on(triggers::FORCE_SYSTEM_READY)
            .from(AttractIntervention)
            .to(Attract)
            .when(guards::ALL_BOXES_ALIGNED)
            .build()?,
    ])
}

pub fn supervisor_definition(
    history_capacity: usize,
) -> Result<MachineDefinition<Installation>, BuildError> {
    MachineBuilder::new()
        .initial(Lifecycle::Attract)
        .transitions(supervisor_rules()?)
        .on_enter(Lifecycle::WarmUpCycle, callbacks::BEGIN_POST)
        .on_enter(Lifecycle::GameMode, callbacks::ANNOUNCE_GAME_MODE)
        .history_capacity(history_capacity)
        .build_definition()
}

/// A supervisor in `Attract` driving `installation`.
pub fn supervisor(
    installation: Installation,
    history_capacity: usize,
) -> Result<Supervisor, BuildError> {
    Ok(supervisor_definition(history_capacity)?.instantiate("supervisor", installation))
}

/// Build the installation and its supervisor from a validated config.
pub fn supervisor_from_config(config: &InstallationConfig) -> Result<Supervisor, InstallationError> {
    let installation = Installation::from_config(config)?;
    Ok(supervisor(installation, config.history_capacity)?)
}
