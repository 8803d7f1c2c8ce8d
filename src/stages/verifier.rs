// Verifier.
// Imports every dependency inside the target interpreter and records a result
// per dependency. Nothing here can fail the bootstrap: a broken import is
// reported as a warning and the sequence moves on to the launchers.

use crate::errors::Stage;
use crate::libs::process::CommandRunner;
use crate::libs::utilities::version::is_older_than;
use crate::schemas::dependency::Dependency;
use crate::stages::env_provisioner::PythonTarget;
use crate::{log_info, log_warn};
use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;

// Dotted identifiers, each part starting with a letter or underscore.
static MODULE_PATH_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Imported; `version` is `__version__` when the module exposes one.
    Passed { version: Option<String> },
    /// Imported, but reports a version below the declared minimum.
    Outdated { found: String, required: String },
    /// Could not be imported.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub dependency: Dependency,
    pub module: String,
    pub status: VerificationStatus,
}

/// Per-dependency results in Dependency List order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub results: Vec<VerificationResult>,
}

impl VerificationReport {
    pub fn all_passed(&self) -> bool {
        self.results
            .iter()
            .all(|r| matches!(r.status, VerificationStatus::Passed { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.status, VerificationStatus::Failed { .. }))
    }

    pub fn status_of(&self, name: &str) -> Option<&VerificationStatus> {
        self.results
            .iter()
            .find(|r| r.dependency.same_distribution(name))
            .map(|r| &r.status)
    }
}

/// Imports each dependency with `target`, independently of the others.
pub fn verify_dependencies(
    target: &PythonTarget,
    dependencies: &[Dependency],
    runner: &mut dyn CommandRunner,
) -> VerificationReport {
    log_info!("{} Verifying {} packages...", Stage::Verify, dependencies.len());

    let results: Vec<VerificationResult> = dependencies
        .iter()
        .map(|dependency| verify_one(target, dependency, runner))
        .collect();
    let report = VerificationReport { results };

    for result in &report.results {
        let name = result.dependency.name.as_str();
        match &result.status {
            VerificationStatus::Passed { version } => log_info!(
                "{}   {} {} {}",
                Stage::Verify,
                "[OK]".green(),
                name,
                version.as_deref().unwrap_or("").dimmed()
            ),
            VerificationStatus::Outdated { found, required } => log_warn!(
                "{}   {} {} {} is older than the required {}",
                Stage::Verify,
                "[OLD]".yellow(),
                name,
                found,
                required
            ),
            VerificationStatus::Failed { reason } => log_warn!(
                "{}   {} {} ({})",
                Stage::Verify,
                "[FAIL]".red(),
                name,
                reason
            ),
        }
    }

    if report.all_passed() {
        log_info!("{} All packages verified", Stage::Verify);
    } else {
        log_warn!(
            "{} Some packages did not verify. The application may still start; check the messages above.",
            Stage::Verify
        );
    }
    report
}

fn verify_one(
    target: &PythonTarget,
    dependency: &Dependency,
    runner: &mut dyn CommandRunner,
) -> VerificationResult {
    let module = dependency.module_name();
    // The name ends up inside `python -c`, so anything else is refused unrun
    let status = if !is_module_path(&module) {
        VerificationStatus::Failed {
            reason: format!("'{module}' is not a valid module name"),
        }
    } else {
        let mut command = target.interpreter.command();
        command.arg("-c").arg(import_snippet(&module));
        match runner.capture(&mut command) {
            // stdout is `__version__`, or empty when the module has none
            Ok(output) if output.succeeded() => {
                let version = output.stdout.trim().to_string();
                classify(dependency, (!version.is_empty()).then_some(version))
            }
            Ok(output) => VerificationStatus::Failed {
                reason: last_line(&output.stderr)
                    .unwrap_or_else(|| output.describe_exit()),
            },
            Err(e) => VerificationStatus::Failed {
                reason: format!("could not run '{}': {}", target.interpreter, e),
            },
        }
    };

    VerificationResult {
        dependency: dependency.clone(),
        module,
        status,
    }
}

fn classify(dependency: &Dependency, version: Option<String>) -> VerificationStatus {
    if let (Some(found), Some(required)) = (&version, &dependency.min_version) {
        if is_older_than(found, required) == Some(true) {
            return VerificationStatus::Outdated {
                found: found.clone(),
                required: required.clone(),
            };
        }
    }
    VerificationStatus::Passed { version }
}

/// `import X; print(getattr(X, '__version__', ''))`, with the top-level package
/// bound so dotted names (`PIL.Image`) work.
fn import_snippet(module: &str) -> String {
    format!("import {module} as _m; print(getattr(_m, '__version__', ''))")
}

/// Only dotted Python identifiers are passed to `-c`.
fn is_module_path(module: &str) -> bool {
    MODULE_PATH_RE
        .get_or_init(|| Regex::new(r"^[^\W\d]\w*(?:\.[^\W\d]\w*)*$").expect("module path regex"))
        .is_match(module)
}

/// Python tracebacks end with the useful line (`ModuleNotFoundError: ...`).
fn last_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
