// `fsae-bootstrap verify`: re-runs the Verifier against the environment an
// earlier `install` created, without installing anything.

use crate::libs::manifest::load_dependency_list;
use crate::libs::process::SystemRunner;
use crate::stages::verifier::verify_dependencies;
use crate::{log_debug, log_error};
use std::path::Path;
use std::process::ExitCode;

/// Exits with 1 when a dependency cannot be imported. Outdated packages only warn.
pub fn run(project_dir: Option<&Path>, config: Option<&Path>) -> ExitCode {
    log_debug!("Entered verify::run() function.");

    let Some(ctx) = super::load_context(project_dir, config) else {
        return ExitCode::FAILURE;
    };
    let mut runner = SystemRunner;

    let target = match super::existing_target(&ctx, &mut runner) {
        Ok(target) => target,
        Err(e) => {
            super::report(&e);
            return ExitCode::FAILURE;
        }
    };

    let dependencies = match load_dependency_list(&ctx.manifest_path, &ctx.config.dependencies.packages) {
        Ok(dependencies) => dependencies,
        Err(e) => {
            log_error!("[Verify] Could not read {}: {}", ctx.manifest_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let report = verify_dependencies(&target, &dependencies, &mut runner);
    if report.failed().next().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
