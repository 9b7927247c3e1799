//! Line-oriented trigger scripts for replaying installation sessions.
//!
//! ```text
//! # comments and blank lines are skipped
//! power_on
//! reading 3 101.5
//! box 6 provoke_misalignment
//! resume_from_fault 4
//! ```

use crate::engine::TriggerError;
use crate::installation::{ActuatorId, InstallationError, Supervisor};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("{message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Trigger(#[from] TriggerError),

    #[error(transparent)]
    Installation(#[from] InstallationError),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Supervisor trigger, optionally naming an actuator as payload.
    Supervisor {
        trigger: String,
        actuator: Option<ActuatorId>,
    },
    /// Alignment trigger routed to one box.
    Box { id: ActuatorId, trigger: String },
    /// Linear travel reading for one actuator.
    Reading { id: ActuatorId, mm: f32 },
}

/// Parse one line. Returns `None` for blank and comment lines.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Step>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fail = |message: String| ScriptError::Parse {
        line: line_no,
        message,
    };
    let words: Vec<&str> = line.split_whitespace().collect();

    let step = match words.as_slice() {
        ["box", id, trigger] => Step::Box {
            id: parse_id(id).map_err(fail)?,
            trigger: trigger.to_string(),
        },
        ["box", ..] => return Err(fail("expected `box <id> <trigger>`".to_string())),
        ["reading", id, mm] => Step::Reading {
            id: parse_id(id).map_err(fail)?,
            mm: mm
                .parse()
                .map_err(|_| fail(format!("`{mm}` is not a distance in mm")))?,
        },
        ["reading", ..] => return Err(fail("expected `reading <id> <mm>`".to_string())),
        [trigger] => Step::Supervisor {
            trigger: trigger.to_string(),
            actuator: None,
        },
        [trigger, id] => Step::Supervisor {
            trigger: trigger.to_string(),
            actuator: Some(parse_id(id).map_err(fail)?),
        },
        _ => return Err(fail(format!("cannot parse `{line}`"))),
    };
    Ok(Some(step))
}

fn parse_id(word: &str) -> Result<ActuatorId, String> {
    word.parse()
        .map_err(|_| format!("`{word}` is not an actuator id"))
}

/// Apply one step to a running supervisor.
pub fn apply(machine: &mut Supervisor, step: &Step) -> Result<(), ScriptError> {
    match step {
        Step::Supervisor { trigger, actuator } => machine.trigger(trigger, *actuator)?,
        Step::Box { id, trigger } => machine.model_mut().trigger_box(*id, trigger)?,
        Step::Reading { id, mm } => machine.model_mut().record_reading(*id, *mm)?,
    }
    Ok(())
}

/// Failure that stops a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script or write output: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Script { line: usize, source: ScriptError },
}

/// What a completed replay did.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Lines that were parsed and applied.
    pub applied: usize,
    /// Lines that failed, with their line numbers.
    pub failed: Vec<(usize, ScriptError)>,
}

/// Replay every line of `script` against `machine`, writing the supervisor
/// state after each applied line to `out`.
///
/// A failing line is reported to `out` and skipped, unless `strict` is set,
/// in which case the replay stops with [`ReplayError::Script`].
pub fn replay<R, W>(
    machine: &mut Supervisor,
    script: R,
    out: &mut W,
    strict: bool,
) -> Result<ReplayReport, ReplayError>
where
    R: BufRead,
    W: Write,
{
    let mut report = ReplayReport::default();

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let outcome = parse_line(line_no, &line).and_then(|step| match step {
            Some(step) => apply(machine, &step).map(|()| true),
            None => Ok(false),
        });

        match outcome {
            Ok(false) => {}
            Ok(true) => {
                report.applied += 1;
                writeln!(out, "{line_no:>4}  {:<40} {}", line.trim(), machine.current_state())?;
            }
            Err(source) if strict => {
                return Err(ReplayError::Script {
                    line: line_no,
                    source,
                })
            }
            Err(e) => {
                writeln!(out, "{line_no:>4}  {:<40} error: {e}", line.trim())?;
                report.failed.push((line_no, e));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_HISTORY_CAPACITY;
    use crate::installation::{supervisor, Installation, Lifecycle};

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(2, "   ").unwrap(), None);
        assert_eq!(parse_line(3, "# power_on").unwrap(), None);
    }

    #[test]
    fn parses_every_step_kind() {
        assert_eq!(
            parse_line(1, "power_on").unwrap(),
            Some(Step::Supervisor {
                trigger: "power_on".into(),
                actuator: None
            })
        );
        assert_eq!(
            parse_line(1, "resume_from_fault 4").unwrap(),
            Some(Step::Supervisor {
                trigger: "resume_from_fault".into(),
                actuator: Some(4)
            })
        );
        assert_eq!(
            parse_line(1, "box 6 provoke_misalignment").unwrap(),
            Some(Step::Box {
                id: 6,
                trigger: "provoke_misalignment".into()
            })
        );
        assert_eq!(
            parse_line(1, "  reading 2 100.25 ").unwrap(),
            Some(Step::Reading { id: 2, mm: 100.25 })
        );
    }

    #[test]
    fn malformed_lines_report_their_number() {
        let err = parse_line(7, "box six align").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 7, .. }));
        assert!(parse_line(8, "reading 1").is_err());
        assert!(parse_line(9, "reading 1 far").is_err());
        assert!(parse_line(10, "power_on now please").is_err());
    }

    #[test]
    fn applies_steps_to_a_supervisor() {
        let installation = Installation::new(2, 2.0, DEFAULT_HISTORY_CAPACITY).unwrap();
        let mut machine = supervisor(installation, DEFAULT_HISTORY_CAPACITY).unwrap();

        let script = "start_interaction\nbox 2 provoke_misalignment\nreturn_to_attract";
        for (n, line) in script.lines().enumerate() {
            let step = parse_line(n + 1, line).unwrap().unwrap();
            apply(&mut machine, &step).unwrap();
        }
        assert_eq!(machine.current_state(), &Lifecycle::AttractIntervention);
    }

    #[test]
    fn apply_surfaces_engine_errors() {
        let installation = Installation::new(2, 2.0, DEFAULT_HISTORY_CAPACITY).unwrap();
        let mut machine = supervisor(installation, DEFAULT_HISTORY_CAPACITY).unwrap();

        let step = parse_line(1, "warp_drive").unwrap().unwrap();
        assert!(matches!(
            apply(&mut machine, &step),
            Err(ScriptError::Trigger(TriggerError::UnknownTrigger { .. }))
        ));
        let step = parse_line(2, "reading 9 1.0").unwrap().unwrap();
        assert!(matches!(
            apply(&mut machine, &step),
            Err(ScriptError::Installation(InstallationError::UnknownActuator { id: 9 }))
        ));
    }

    const FAULTY_SCRIPT: &str = "\
# visitor session
start_interaction
box 9 provoke_misalignment
box 2 provoke_misalignment
return_to_attract
";

    fn two_box_supervisor() -> Supervisor {
        let installation = Installation::new(2, 2.0, DEFAULT_HISTORY_CAPACITY).unwrap();
        supervisor(installation, DEFAULT_HISTORY_CAPACITY).unwrap()
    }

    #[test]
    fn lenient_replay_skips_failing_lines() {
        let mut machine = two_box_supervisor();
        let mut out = Vec::new();

        let report = replay(&mut machine, FAULTY_SCRIPT.as_bytes(), &mut out, false).unwrap();

        assert_eq!(report.applied, 3);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0],
            (3, ScriptError::Installation(InstallationError::UnknownActuator { id: 9 }))
        ));
        assert_eq!(machine.current_state(), &Lifecycle::AttractIntervention);

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 4);
        assert!(printed.contains("error:"));
        assert!(printed.lines().last().unwrap().ends_with("AttractIntervention"));
    }

    #[test]
    fn strict_replay_stops_at_the_first_failure() {
        let mut machine = two_box_supervisor();
        let mut out = Vec::new();

        let err = replay(&mut machine, FAULTY_SCRIPT.as_bytes(), &mut out, true).unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Script {
                line: 3,
                source: ScriptError::Installation(InstallationError::UnknownActuator { id: 9 })
            }
        ));
        assert_eq!(machine.current_state(), &Lifecycle::GameMode);
        assert_eq!(machine.model().boxes().misaligned(), Vec::<ActuatorId>::new());
    }

    #[test]
    fn strict_replay_reports_parse_errors_once() {
        let mut machine = two_box_supervisor();
        let err = replay(&mut machine, "reading 1\n".as_bytes(), &mut io::sink(), true)
            .unwrap_err();

        assert!(matches!(err, ReplayError::Script { line: 1, .. }));
        assert_eq!(err.to_string().matches("line 1").count(), 1);
    }
}
