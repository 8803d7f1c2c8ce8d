// `fsae-bootstrap launcher`: rewrites the launcher scripts without touching the
// environment.

use crate::libs::process::SystemRunner;
use crate::stages::launcher_emitter::emit_launchers;
use crate::stages::runtime_locator::locate_runtime;
use crate::{log_debug, log_error, log_warn};
use std::path::Path;
use std::process::ExitCode;

pub fn run(project_dir: Option<&Path>, config: Option<&Path>) -> ExitCode {
    log_debug!("Entered launcher::run() function.");

    let Some(ctx) = super::load_context(project_dir, config) else {
        return ExitCode::FAILURE;
    };
    let candidates = ctx.runtime_candidates();

    // The ambient command only matters when the environment is missing at launch time.
    let ambient = match locate_runtime(&mut SystemRunner, &candidates, ctx.config.runtime.minimum) {
        Ok(runtime) => runtime.command,
        Err(e) => {
            log_warn!("{} {}", e.stage(), e);
            match candidates.first() {
                Some(first) => {
                    log_warn!("Launchers will fall back to '{}'", first);
                    first.clone()
                }
                None => {
                    log_error!("[Launcher] No runtime candidates are configured");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match emit_launchers(&ctx, &ambient) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            super::report(&e);
            ExitCode::FAILURE
        }
    }
}
