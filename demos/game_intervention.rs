//! Play and Intervention
//!
//! Visitors play a round, one box ends up out of line and the installation
//! refuses to return to attract mode until the box is realigned.
//!
//! Run with: cargo run --example game_intervention

use maestro::config::InstallationConfig;
use maestro::installation::actuator::{ALIGNMENT_ACHIEVED, PROVOKE_MISALIGNMENT};
use maestro::installation::{supervisor_from_config, triggers, Lifecycle};
use maestro::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = InstallationConfig::from_json_str(r#"{ "actuator_count": 4 }"#)?;
    init_logging(&config.logging);
    println!("=== Play and Intervention ===\n");

    let mut machine = supervisor_from_config(&config)?;

    machine.fire(triggers::START_INTERACTION)?;
    machine.fire(triggers::START_INTERACTION)?;
    println!(
        "Playing: {} ({} interactions)",
        machine.current_state(),
        machine.model().interactions()
    );

    machine.model_mut().trigger_box(3, PROVOKE_MISALIGNMENT)?;
    println!("Box 3 pushed out of line: misaligned = {:?}", machine.model().boxes().misaligned());

    machine.fire(triggers::RETURN_TO_ATTRACT)?;
    println!("Return to attract -> {}", machine.current_state());
    assert_eq!(machine.current_state(), &Lifecycle::AttractIntervention);

    match machine.fire(triggers::FORCE_SYSTEM_READY) {
        Ok(()) => println!("Forced ready early"),
        Err(e) => println!("Force system ready refused: {e}"),
    }

    machine.model_mut().trigger_box(3, ALIGNMENT_ACHIEVED)?;
    machine.fire(triggers::FORCE_SYSTEM_READY)?;
    println!("Box 3 realigned, force system ready -> {}", machine.current_state());

    println!("\n=== Example Complete ===");
    Ok(())
}
