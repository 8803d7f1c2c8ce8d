// `fsae-bootstrap build`: packages the application for distribution.
// The executable is built with PyInstaller inside the project environment; the
// installer script wraps that executable, so with `--target both` it is only
// written after a successful build.

use crate::cli::type_enums::BuildTarget;
use crate::libs::manifest::load_dependency_list;
use crate::libs::packaging::{build_executable, write_installer_script};
use crate::libs::process::SystemRunner;
use crate::{log_debug, log_error};
use std::path::Path;
use std::process::ExitCode;

pub fn run(project_dir: Option<&Path>, config: Option<&Path>, target: BuildTarget) -> ExitCode {
    log_debug!("Entered build::run() function with target {:?}.", target);

    let Some(ctx) = super::load_context(project_dir, config) else {
        return ExitCode::FAILURE;
    };

    if target.builds_executable() {
        let mut runner = SystemRunner;
        let python = match super::existing_target(&ctx, &mut runner) {
            Ok(python) => python,
            Err(e) => {
                super::report(&e);
                return ExitCode::FAILURE;
            }
        };
        let dependencies = match load_dependency_list(&ctx.manifest_path, &ctx.config.dependencies.packages) {
            Ok(dependencies) => dependencies,
            Err(e) => {
                log_error!("[Build] Could not read {}: {}", ctx.manifest_path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = build_executable(&ctx, &python, &dependencies, &mut runner) {
            log_error!("[Build] {:#}", e);
            return ExitCode::FAILURE;
        }
    }

    if target.writes_installer_script() {
        if let Err(e) = write_installer_script(&ctx) {
            log_error!("[Build] {:#}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
