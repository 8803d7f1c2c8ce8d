// Register application subcommands.
// Each module corresponds to a specific `fsae-bootstrap` command-line action
// and returns the process exit code.

use crate::errors::BootstrapError;
use crate::libs::config_loading;
use crate::libs::context::BootstrapContext;
use crate::libs::process::CommandRunner;
use crate::stages::env_provisioner::PythonTarget;
use crate::stages::runtime_locator::locate_runtime;
use crate::{log_error, log_info, log_warn};
use std::path::Path;

// Packages the application (PyInstaller executable, InnoSetup script).
pub mod build;
// Copies the packaged application into an install directory.
pub mod deploy;
// Runs the full five-stage bootstrap.
pub mod install;
// Regenerates the launcher scripts.
pub mod launcher;
// Removes launchers and the environment.
pub mod uninstall;
// Re-runs the verifier against the existing environment.
pub mod verify;
// Displays the version of the tool.
pub mod version;

/// Loads the bootstrap context, logging why it could not be loaded.
pub(crate) fn load_context(project_dir: Option<&Path>, config: Option<&Path>) -> Option<BootstrapContext> {
    match config_loading::load_context(project_dir, config) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            log_error!("[Config] {:#}", e);
            None
        }
    }
}

/// Prints a fatal stage error with its stage label.
pub(crate) fn report(error: &BootstrapError) {
    log_error!("{} {}", error.stage(), error);
}

/// The interpreter a previous `install` left behind: the environment's when it
/// exists, otherwise the ambient runtime the locator picks.
pub(crate) fn existing_target(
    ctx: &BootstrapContext,
    runner: &mut dyn CommandRunner,
) -> Result<PythonTarget, BootstrapError> {
    let layout = ctx.layout();
    if layout.has_interpreter() {
        log_info!("Using environment at {}", layout.root.display());
        return Ok(PythonTarget::environment(&layout));
    }
    log_warn!(
        "No environment at {}, falling back to the ambient runtime. Run `fsae-bootstrap install` to create it.",
        layout.root.display()
    );
    let runtime = locate_runtime(runner, &ctx.runtime_candidates(), ctx.config.runtime.minimum)?;
    Ok(PythonTarget::ambient(&runtime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::process::testing::{ScriptedRunner, ok};
    use crate::stages::env_provisioner::tests::{context, fake_venv};

    #[test]
    fn existing_environment_is_preferred() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        fake_venv(&ctx.layout());
        let mut runner = ScriptedRunner::new(|_| ok("Python 3.11.0"));

        let target = existing_target(&ctx, &mut runner).unwrap();

        assert!(target.isolated);
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn missing_environment_falls_back_to_the_located_runtime() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = context(tmp.path());
        ctx.config.runtime.candidates = vec!["python3".into()];
        let mut runner = ScriptedRunner::new(|_| ok("Python 3.11.0"));

        let target = existing_target(&ctx, &mut runner).unwrap();

        assert!(!target.isolated);
        assert_eq!(target.interpreter.program, "python3");
    }
}
