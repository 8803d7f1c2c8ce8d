// Runtime Locator.
// Asks each candidate for `--version`, in order, and accepts the first one
// whose major version matches the minimum and whose minor version is at least
// the minimum. "Nothing answered" and "something answered but too old" are
// reported as different errors.

use crate::errors::{BootstrapError, Stage};
use crate::libs::process::CommandRunner;
use crate::schemas::runtime::{CommandSpec, RuntimeVersion, SelectedRuntime};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;

/// What one candidate reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Could not be started, or printed no recognizable version.
    Absent,
    Found(RuntimeVersion),
}

/// Runs `<candidate> --version` and extracts `major.minor` from stdout + stderr.
pub fn query_candidate(runner: &mut dyn CommandRunner, candidate: &CommandSpec) -> Detection {
    let mut command = candidate.command();
    command.arg("--version");

    match runner.capture(&mut command) {
        Ok(output) => match RuntimeVersion::find_in(&output.combined()) {
            Some(version) => Detection::Found(version),
            None => {
                log_debug!(
                    "{} '{}' printed no version ({}): {:?}",
                    Stage::Runtime,
                    candidate,
                    output.describe_exit(),
                    output.combined().trim()
                );
                Detection::Absent
            }
        },
        Err(e) => {
            log_debug!("{} '{}' could not be started: {}", Stage::Runtime, candidate, e);
            Detection::Absent
        }
    }
}

/// Selects the first acceptable runtime from `candidates`.
///
/// # Errors
/// * `RuntimeNotFound` when no candidate reported a version at all.
/// * `RuntimeVersionInsufficient` when some did, but none satisfied `minimum`.
pub fn locate_runtime(
    runner: &mut dyn CommandRunner,
    candidates: &[CommandSpec],
    minimum: RuntimeVersion,
) -> Result<SelectedRuntime, BootstrapError> {
    log_info!(
        "{} Looking for Python {} or newer...",
        Stage::Runtime,
        minimum.to_string().cyan()
    );

    let mut insufficient: Vec<(String, RuntimeVersion)> = Vec::new();

    for candidate in candidates {
        match query_candidate(runner, candidate) {
            Detection::Found(version) if version.satisfies(&minimum) => {
                log_info!(
                    "{} Using '{}' (Python {})",
                    Stage::Runtime,
                    candidate.to_string().bold().green(),
                    version.to_string().green()
                );
                return Ok(SelectedRuntime {
                    command: candidate.clone(),
                    version,
                });
            }
            Detection::Found(version) => {
                log_warn!(
                    "{} '{}' is Python {}, which is not supported (need {}.{}+)",
                    Stage::Runtime,
                    candidate.to_string().yellow(),
                    version,
                    minimum.major,
                    minimum.minor
                );
                insufficient.push((candidate.command_line(), version));
            }
            Detection::Absent => {
                log_debug!("{} '{}' not available", Stage::Runtime, candidate);
            }
        }
    }

    if insufficient.is_empty() {
        Err(BootstrapError::RuntimeNotFound {
            tried: candidates.iter().map(CommandSpec::command_line).collect(),
        })
    } else {
        Err(BootstrapError::RuntimeVersionInsufficient {
            found: insufficient,
            required: minimum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::process::testing::{ScriptedRunner, exit, not_found, ok};

    fn specs(names: &[&str]) -> Vec<CommandSpec> {
        names.iter().filter_map(|name| CommandSpec::parse(name)).collect()
    }

    const MIN: RuntimeVersion = RuntimeVersion::new(3, 8);

    #[test]
    fn first_acceptable_candidate_wins() {
        let mut runner = ScriptedRunner::new(|argv| match argv[0].as_str() {
            "python3" => ok("Python 3.9.2\n"),
            "python" => ok("Python 3.12.1\n"),
            _ => not_found(),
        });

        let selected = locate_runtime(&mut runner, &specs(&["python3", "python"]), MIN).unwrap();
        assert_eq!(selected.command.program, "python3");
        assert_eq!(selected.version, RuntimeVersion::new(3, 9));
        // Stops at the first match.
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn skips_old_candidates_and_keeps_searching() {
        let mut runner = ScriptedRunner::new(|argv| match argv[0].as_str() {
            "python" => ok("Python 2.7.18\n"),
            "py" => ok("Python 3.11.4\n"),
            _ => not_found(),
        });

        let selected = locate_runtime(&mut runner, &specs(&["python", "py -3"]), MIN).unwrap();
        assert_eq!(selected.command.command_line(), "py -3");
        assert_eq!(runner.calls[1], vec!["py", "-3", "--version"]);
    }

    #[test]
    fn no_candidate_at_all_is_not_found() {
        let mut runner = ScriptedRunner::new(|_| not_found());
        let err = locate_runtime(&mut runner, &specs(&["python3", "python"]), MIN).unwrap_err();
        assert!(matches!(err, BootstrapError::RuntimeNotFound { ref tried } if tried.len() == 2));
    }

    #[test]
    fn only_old_candidates_is_insufficient() {
        let mut runner = ScriptedRunner::new(|argv| match argv[0].as_str() {
            "python3" => ok("Python 3.7.9\n"),
            _ => not_found(),
        });
        let err = locate_runtime(&mut runner, &specs(&["python3", "python"]), MIN).unwrap_err();
        match err {
            BootstrapError::RuntimeVersionInsufficient { found, required } => {
                assert_eq!(found, vec![("python3".to_string(), RuntimeVersion::new(3, 7))]);
                assert_eq!(required, MIN);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn store_stub_without_version_counts_as_absent() {
        let mut runner = ScriptedRunner::new(|_| {
            exit(9009, "Python was not found; run without arguments to install from the Microsoft Store")
        });
        let err = locate_runtime(&mut runner, &specs(&["python"]), MIN).unwrap_err();
        assert!(matches!(err, BootstrapError::RuntimeNotFound { .. }));
    }

    #[test]
    fn version_printed_on_stderr_is_recognized() {
        let mut runner = ScriptedRunner::new(|_| exit(0, "Python 3.8.10\n"));
        let selected = locate_runtime(&mut runner, &specs(&["python"]), MIN).unwrap();
        assert_eq!(selected.version, RuntimeVersion::new(3, 8));
    }

    #[test]
    fn newer_major_is_not_accepted() {
        let mut runner = ScriptedRunner::new(|_| ok("Python 4.0.0\n"));
        let err = locate_runtime(&mut runner, &specs(&["python"]), MIN).unwrap_err();
        assert!(matches!(err, BootstrapError::RuntimeVersionInsufficient { .. }));
    }
}
