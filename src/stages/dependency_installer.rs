// Dependency Installer.
// Upgrades pip inside the target interpreter, then installs the whole manifest
// in one `pip install -r` batch. The batch is all-or-nothing: a failure stops
// the bootstrap and nothing is retried package by package.

use crate::errors::{BootstrapError, Stage};
use crate::libs::context::BootstrapContext;
use crate::libs::manifest::prepare_manifest;
use crate::libs::process::CommandRunner;
use crate::schemas::dependency::Dependency;
use crate::stages::env_provisioner::PythonTarget;
use crate::{log_info, log_warn};
use colored::Colorize;

/// Installs the Dependency List into `target` and returns it for verification.
///
/// # Errors
/// * `ManifestUnavailable` when the manifest can neither be read nor written.
/// * `DependencyInstallFailed` when the batch install does not succeed.
pub fn install_dependencies(
    ctx: &BootstrapContext,
    target: &PythonTarget,
    runner: &mut dyn CommandRunner,
) -> Result<Vec<Dependency>, BootstrapError> {
    // 1. Read the manifest, writing the default list when it is missing
    let dependencies = prepare_manifest(&ctx.manifest_path, &ctx.config.dependencies.packages)
        .map_err(|source| BootstrapError::ManifestUnavailable {
            path: ctx.manifest_path.clone(),
            source,
        })?;

    // 2. Make the fallback visible: packages land outside any environment
    if !target.isolated {
        log_warn!(
            "{} Installing into the ambient runtime '{}'",
            Stage::Dependencies,
            target.interpreter
        );
    }

    // 3. Best-effort pip upgrade
    upgrade_pip(target, runner);

    // 4. One batch install, through the target interpreter only
    log_info!(
        "{} Installing {} packages from {}...",
        Stage::Dependencies,
        dependencies.len(),
        ctx.manifest_path.display().to_string().cyan()
    );
    let mut install = target.interpreter.command();
    install
        .args(["-m", "pip", "install", "-r"])
        .arg(&ctx.manifest_path);

    match runner.stream(&mut install) {
        Ok(output) if output.succeeded() => {
            log_info!("{} All dependencies installed", Stage::Dependencies);
            Ok(dependencies)
        }
        Ok(output) => Err(BootstrapError::DependencyInstallFailed {
            detail: format!("pip install -r exited with {}", output.describe_exit()),
        }),
        Err(e) => Err(BootstrapError::DependencyInstallFailed {
            detail: format!("could not run '{}': {}", target.interpreter, e),
        }),
    }
}

/// `python -m pip install --upgrade pip`. Failure only warns: an old pip can
/// usually still install the manifest.
fn upgrade_pip(target: &PythonTarget, runner: &mut dyn CommandRunner) {
    log_info!("{} Upgrading pip...", Stage::Dependencies);
    let mut upgrade = target.interpreter.command();
    upgrade.args(["-m", "pip", "install", "--upgrade", "pip"]);

    match runner.stream(&mut upgrade) {
        Ok(output) if output.succeeded() => {}
        Ok(output) => log_warn!(
            "{} pip upgrade failed ({}), continuing with the installed pip",
            Stage::Dependencies,
            output.describe_exit()
        ),
        Err(e) => log_warn!(
            "{} pip upgrade could not run ({}), continuing",
            Stage::Dependencies,
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::process::testing::{ScriptedRunner, exit, ok};
    use crate::schemas::runtime::CommandSpec;
    use crate::stages::env_provisioner::tests::context;
    use std::fs;

    fn env_target() -> PythonTarget {
        PythonTarget {
            interpreter: CommandSpec::parse("venv/bin/python").unwrap(),
            isolated: true,
        }
    }

    #[test]
    fn upgrades_pip_then_installs_the_manifest_in_one_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        let mut runner = ScriptedRunner::new(|_| ok(""));

        let deps = install_dependencies(&ctx, &env_target(), &mut runner).unwrap();

        assert_eq!(deps.len(), 9);
        assert_eq!(runner.calls.len(), 2);
        assert_eq!(runner.calls[0], vec!["venv/bin/python", "-m", "pip", "install", "--upgrade", "pip"]);
        assert_eq!(
            runner.calls[1],
            vec![
                "venv/bin/python".to_string(),
                "-m".into(),
                "pip".into(),
                "install".into(),
                "-r".into(),
                ctx.manifest_path.to_string_lossy().into_owned(),
            ]
        );
        assert!(ctx.manifest_path.is_file());
    }

    #[test]
    fn every_call_goes_through_the_target_interpreter() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        let mut runner = ScriptedRunner::new(|_| ok(""));

        install_dependencies(&ctx, &env_target(), &mut runner).unwrap();
        assert!(runner.calls.iter().all(|call| call[0] == "venv/bin/python"));
    }

    #[test]
    fn failed_pip_upgrade_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        let mut runner = ScriptedRunner::new(|argv| {
            if argv.iter().any(|a| a == "--upgrade") { exit(1, "") } else { ok("") }
        });

        assert!(install_dependencies(&ctx, &env_target(), &mut runner).is_ok());
    }

    #[test]
    fn failed_batch_install_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        let mut runner = ScriptedRunner::new(|argv| {
            if argv.iter().any(|a| a == "-r") { exit(1, "No matching distribution") } else { ok("") }
        });

        let err = install_dependencies(&ctx, &env_target(), &mut runner).unwrap_err();
        assert!(matches!(err, BootstrapError::DependencyInstallFailed { ref detail } if detail.contains("exit code 1")));
        assert_eq!(err.stage(), Stage::Dependencies);
        // Exactly one batch attempt.
        assert_eq!(runner.calls.iter().filter(|c| c.iter().any(|a| a == "-r")).count(), 1);
    }

    #[test]
    fn existing_manifest_is_installed_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path());
        fs::write(&ctx.manifest_path, "numpy>=1.24.0\nscipy\n").unwrap();
        let mut runner = ScriptedRunner::new(|_| ok(""));

        let deps = install_dependencies(&ctx, &env_target(), &mut runner).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(fs::read_to_string(&ctx.manifest_path).unwrap(), "numpy>=1.24.0\nscipy\n");
    }
}
