// Environment Provisioner.
// Makes sure an isolated environment exists and decides which interpreter every
// later stage must use. Once an environment is provisioned, pip and the
// verification imports always go through its embedded interpreter, never the
// system-wide one.

use crate::errors::{BootstrapError, Stage};
use crate::libs::context::BootstrapContext;
use crate::libs::process::CommandRunner;
use crate::libs::prompts::{EnvironmentChoice, Prompter};
use crate::schemas::environment::EnvironmentLayout;
use crate::schemas::runtime::{CommandSpec, SelectedRuntime};
use crate::{log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// How the environment stage ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// No environment existed; a new one was created.
    Created,
    /// An existing environment was kept as is.
    Reused,
    /// An existing environment was deleted and created again.
    Recreated,
    /// Creation failed; dependencies go into the ambient runtime.
    Ambient { reason: String },
}

/// The interpreter later stages run `-m pip` and imports with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonTarget {
    pub interpreter: CommandSpec,
    /// `false` when running against the ambient runtime after a fallback.
    pub isolated: bool,
}

impl PythonTarget {
    pub fn environment(layout: &EnvironmentLayout) -> Self {
        PythonTarget {
            interpreter: CommandSpec::from_path(&layout.interpreter()),
            isolated: true,
        }
    }

    pub fn ambient(runtime: &SelectedRuntime) -> Self {
        PythonTarget {
            interpreter: runtime.command.clone(),
            isolated: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedEnvironment {
    pub outcome: ProvisionOutcome,
    pub target: PythonTarget,
}

/// Creates, reuses or recreates the environment at `ctx.env_dir`.
///
/// An existing directory triggers the reuse-or-recreate question (default: reuse).
/// A directory without an interpreter cannot be reused and is recreated.
///
/// # Errors
/// * `EnvironmentContainsProject` when the directory chosen for recreation holds the project.
/// * `EnvironmentRemoveFailed` when a directory chosen for recreation cannot be deleted.
/// * `EnvironmentCreateFailed` when creation fails and ambient fallback is disabled.
pub fn provision_environment(
    ctx: &BootstrapContext,
    runtime: &SelectedRuntime,
    runner: &mut dyn CommandRunner,
    prompter: &mut dyn Prompter,
) -> Result<ProvisionedEnvironment, BootstrapError> {
    let layout = ctx.layout();

    if !layout.exists() {
        return create_environment(ctx, &layout, runtime, runner, ProvisionOutcome::Created);
    }

    let choice = prompter.existing_environment(&layout.root, EnvironmentChoice::Reuse);
    match choice {
        EnvironmentChoice::Reuse if layout.has_interpreter() => {
            log_info!(
                "{} Reusing existing environment at {}",
                Stage::Environment,
                layout.root.display().to_string().cyan()
            );
            Ok(ProvisionedEnvironment {
                outcome: ProvisionOutcome::Reused,
                target: PythonTarget::environment(&layout),
            })
        }
        EnvironmentChoice::Reuse => {
            log_warn!(
                "{} {} has no interpreter at {}, recreating it",
                Stage::Environment,
                layout.root.display(),
                layout.interpreter().display()
            );
            remove_environment(&layout, &ctx.project_dir)?;
            create_environment(ctx, &layout, runtime, runner, ProvisionOutcome::Recreated)
        }
        EnvironmentChoice::Recreate => {
            remove_environment(&layout, &ctx.project_dir)?;
            create_environment(ctx, &layout, runtime, runner, ProvisionOutcome::Recreated)
        }
    }
}

/// Fails when deleting `layout.root` would also delete `project_dir`,
/// as with an environment directory of `.` or `..`.
pub fn ensure_removable(layout: &EnvironmentLayout, project_dir: &Path) -> Result<(), BootstrapError> {
    let root = fs::canonicalize(&layout.root).unwrap_or_else(|_| layout.root.clone());
    let project = fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    if project.starts_with(&root) {
        return Err(BootstrapError::EnvironmentContainsProject {
            path: layout.root.clone(),
            project: project_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Deletes the whole environment tree, never one that holds the project.
pub fn remove_environment(layout: &EnvironmentLayout, project_dir: &Path) -> Result<(), BootstrapError> {
    ensure_removable(layout, project_dir)?;
    log_info!(
        "{} Removing environment at {}",
        Stage::Environment,
        layout.root.display().to_string().yellow()
    );
    fs::remove_dir_all(&layout.root).map_err(|source| BootstrapError::EnvironmentRemoveFailed {
        path: layout.root.clone(),
        source,
    })
}

fn create_environment(
    ctx: &BootstrapContext,
    layout: &EnvironmentLayout,
    runtime: &SelectedRuntime,
    runner: &mut dyn CommandRunner,
    outcome: ProvisionOutcome,
) -> Result<ProvisionedEnvironment, BootstrapError> {
    log_info!(
        "{} Creating environment at {} with '{}'",
        Stage::Environment,
        layout.root.display().to_string().cyan(),
        runtime.command
    );

    let mut command = runtime.command.command();
    command.arg("-m").arg("venv").arg(&layout.root);

    // A zero exit status is not enough: the interpreter must exist afterwards.
    let failure = match runner.stream(&mut command) {
        Ok(output) if output.succeeded() && layout.has_interpreter() => None,
        Ok(output) if output.succeeded() => Some(format!(
            "venv reported success but {} is missing",
            layout.interpreter().display()
        )),
        Ok(output) => Some(format!("venv failed with {}", output.describe_exit())),
        Err(e) => Some(format!("could not run '{}': {}", runtime.command, e)),
    };

    let Some(reason) = failure else {
        log_info!("{} Environment ready", Stage::Environment);
        return Ok(ProvisionedEnvironment {
            outcome,
            target: PythonTarget::environment(layout),
        });
    };

    if !ctx.config.environment.allow_ambient_fallback {
        return Err(BootstrapError::EnvironmentCreateFailed {
            path: layout.root.clone(),
            reason,
        });
    }

    log_warn!(
        "{} Could not create the isolated environment: {}",
        Stage::Environment,
        reason
    );
    log_warn!(
        "{} Continuing without isolation: dependencies will be installed into '{}'",
        Stage::Environment,
        runtime.command.to_string().yellow()
    );
    Ok(ProvisionedEnvironment {
        outcome: ProvisionOutcome::Ambient { reason },
        target: PythonTarget::ambient(runtime),
    })
}
