//! Power-On Self Test
//!
//! Walks the supervisor through two POST runs: one where a single actuator
//! travels short and the curator locks it out, and a second that passes
//! with the locked actuator excluded from the variance check.
//!
//! Run with: cargo run --example post_sequence

use maestro::config::LoggingConfig;
use maestro::core::DEFAULT_HISTORY_CAPACITY;
use maestro::installation::{supervisor, triggers, Installation, Supervisor};
use maestro::logging::init_logging;
use maestro::TriggerError;

fn power_up(machine: &mut Supervisor) -> Result<(), TriggerError> {
    for trigger in [
        triggers::POWER_ON,
        triggers::WARMUP_COMPLETE,
        triggers::EXTENSION_CHECK_COMPLETE,
        triggers::ROTATION_CHECK_COMPLETE,
    ] {
        machine.fire(trigger)?;
        println!("  {trigger:<28} -> {}", machine.current_state());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig {
        filter: "maestro=info".to_string(),
        json: false,
    });
    println!("=== Power-On Self Test ===\n");

    let installation = Installation::new(6, 2.0, DEFAULT_HISTORY_CAPACITY)?;
    let mut machine = supervisor(installation, DEFAULT_HISTORY_CAPACITY)?;

    println!("First run:");
    power_up(&mut machine)?;
    for (id, mm) in [(1, 100.2), (2, 99.9), (3, 100.0), (4, 93.7), (5, 100.4), (6, 100.1)] {
        machine.model_mut().record_reading(id, mm)?;
    }
    let spread = machine
        .model()
        .linear_check()
        .spread(&machine.model().boxes().active_ids());
    println!("  travel spread: {spread:?} mm");

    if machine.can_trigger(triggers::LINEAR_CHECK_COMPLETE, &None)? {
        machine.fire(triggers::LINEAR_CHECK_COMPLETE)?;
    } else {
        machine.fire(triggers::LINEAR_CHECK_FAILURE)?;
    }
    println!(
        "  linear check                 -> {} (offending actuator: {:?})",
        machine.current_state(),
        machine.model().offending_actuator()
    );

    machine.fire(triggers::RESUME_FROM_FAULT)?;
    let locked: Vec<_> = machine.model().boxes().locks().locked_ids().collect();
    println!("  curator resumes              -> {} (locked: {locked:?})\n", machine.current_state());

    println!("Second run:");
    power_up(&mut machine)?;
    let active = machine.model().boxes().active_ids();
    for id in active {
        machine.model_mut().record_reading(id, 100.0)?;
    }
    machine.fire(triggers::LINEAR_CHECK_COMPLETE)?;
    println!("  linear check                 -> {}", machine.current_state());
    machine.fire(triggers::INTERACTIVE_CHECKS_COMPLETE)?;
    println!("  interactive checks           -> {}", machine.current_state());

    println!("\nHistory:");
    for transition in machine.history().transitions() {
        println!(
            "  {:<28} {} -> {}",
            transition.trigger, transition.from, transition.to
        );
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
