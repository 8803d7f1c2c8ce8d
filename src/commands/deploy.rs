// `fsae-bootstrap deploy`: installs a packaged build by copying it, for
// machines where running the InnoSetup installer is not an option.

use crate::cli::cmd_enums::DeployArgs;
use crate::libs::deployment::{DeployOptions, deploy_application};
use crate::libs::process::SystemRunner;
use crate::libs::prompts::ConsolePrompter;
use crate::{log_debug, log_error, log_info};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

pub fn run(project_dir: Option<&Path>, config: Option<&Path>, args: &DeployArgs) -> ExitCode {
    log_debug!("Entered deploy::run() function.");

    let Some(ctx) = super::load_context(project_dir, config) else {
        return ExitCode::FAILURE;
    };
    let options = DeployOptions {
        shortcuts: !args.no_shortcuts,
    };
    let mut prompter = ConsolePrompter::new(args.presets());

    match deploy_application(&ctx, &options, &mut SystemRunner, &mut prompter) {
        Ok(report) => {
            log_info!(
                "{} {} is installed at {}",
                "Done.".bold().green(),
                ctx.config.app.name,
                report.executable.display().to_string().cyan()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!("[Deploy] {:#}", e);
            ExitCode::FAILURE
        }
    }
}
