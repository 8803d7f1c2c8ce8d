// This file contains the logic for `fsae-bootstrap install`, the default command.
// It loads the bootstrap context and hands it to the sequencer, then prints a
// short summary of what the run produced.

use crate::cli::cmd_enums::InstallArgs;
use crate::libs::context::BootstrapContext;
use crate::libs::process::SystemRunner;
use crate::libs::prompts::ConsolePrompter;
use crate::libs::sequencer::{BootstrapSummary, Sequencer};
use crate::libs::utilities::path_helpers::relative_display;
use crate::stages::env_provisioner::ProvisionOutcome;
use crate::stages::verifier::VerificationStatus;
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

/// Main entry point for the `install` command.
///
/// # Arguments
/// * `project_dir`: Optional project directory (defaults to the working directory).
/// * `config`: Optional configuration file.
/// * `args`: Flags that pre-answer the interactive questions.
pub fn run(project_dir: Option<&Path>, config: Option<&Path>, args: &InstallArgs) -> ExitCode {
    log_debug!("Entered install::run() function.");

    let Some(ctx) = super::load_context(project_dir, config) else {
        return ExitCode::FAILURE;
    };

    eprintln!("{}", format!("  {} Setup", ctx.config.app.name).bold());

    let mut runner = SystemRunner;
    let mut prompter = ConsolePrompter::new(args.presets());
    match Sequencer::new(&ctx, &mut runner, &mut prompter).run() {
        Ok(summary) => {
            print_summary(&ctx, &summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            super::report(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(ctx: &BootstrapContext, summary: &BootstrapSummary) {
    eprintln!();
    log_info!("{}", "Setup complete.".bold().green());
    log_info!(
        "Python: {} ({})",
        summary.runtime.version,
        summary.runtime.command
    );

    match &summary.provision {
        ProvisionOutcome::Ambient { reason } => log_warn!(
            "Environment: none ({}). Dependencies went into the ambient runtime.",
            reason
        ),
        outcome => log_info!(
            "Environment: {} ({:?})",
            relative_display(&ctx.project_dir, &ctx.env_dir),
            outcome
        ),
    }

    let results = &summary.verification.results;
    let outdated = results
        .iter()
        .filter(|r| matches!(r.status, VerificationStatus::Outdated { .. }))
        .count();
    let failed = summary.verification.failed().count();
    log_info!(
        "Dependencies: {} verified, {} outdated, {} failed",
        results.len() - outdated - failed,
        outdated,
        failed
    );

    for launcher in &summary.launchers {
        log_info!("Start the application with: {}", launcher.display().to_string().cyan());
    }
}
