// Bootstrap Sequencer.
//
//   LocateRuntime -> ProvisionEnv -> InstallDeps -> Verify (non-blocking)
//                 -> EmitLauncher -> optional immediate launch -> Done
//
// Each stage runs exactly once. The first fatal error ends the sequence and
// is returned to the caller, which prints it with its stage label and exits 1.

use crate::errors::BootstrapError;
use crate::libs::context::BootstrapContext;
use crate::libs::process::CommandRunner;
use crate::libs::prompts::Prompter;
use crate::schemas::runtime::SelectedRuntime;
use crate::stages::dependency_installer::install_dependencies;
use crate::stages::env_provisioner::{ProvisionOutcome, provision_environment};
use crate::stages::launcher_emitter::{emit_launchers, launch};
use crate::stages::runtime_locator::locate_runtime;
use crate::stages::verifier::{VerificationReport, verify_dependencies};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::path::PathBuf;

/// What a successful bootstrap produced.
#[derive(Debug, Clone)]
pub struct BootstrapSummary {
    pub runtime: SelectedRuntime,
    pub provision: ProvisionOutcome,
    pub verification: VerificationReport,
    pub launchers: Vec<PathBuf>,
    pub launched: bool,
}

/// Runs the five stages against `ctx`, using `runner` for every subprocess
/// and `prompter` for every operator decision.
pub struct Sequencer<'a> {
    ctx: &'a BootstrapContext,
    runner: &'a mut dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Sequencer<'a> {
    pub fn new(
        ctx: &'a BootstrapContext,
        runner: &'a mut dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Sequencer {
            ctx,
            runner,
            prompter,
        }
    }

    pub fn run(&mut self) -> Result<BootstrapSummary, BootstrapError> {
        log_debug!("Entering Sequencer::run()");

        banner("1/5 Locating Python runtime");
        let runtime = locate_runtime(
            self.runner,
            &self.ctx.runtime_candidates(),
            self.ctx.config.runtime.minimum,
        )?;

        banner("2/5 Preparing isolated environment");
        let environment = provision_environment(self.ctx, &runtime, self.runner, self.prompter)?;

        banner("3/5 Installing dependencies");
        let dependencies = install_dependencies(self.ctx, &environment.target, self.runner)?;

        // Import failures are collected in the report, never returned.
        banner("4/5 Verifying dependencies");
        let verification = verify_dependencies(&environment.target, &dependencies, self.runner);

        // The launchers fall back to the ambient runtime when the environment is gone.
        banner("5/5 Writing launchers");
        let launchers = emit_launchers(self.ctx, &runtime.command)?;

        // Declined, or a failed spawn, still counts as a successful bootstrap.
        let launched = self.prompter.launch_now(false) && launch(&launchers, self.runner);

        log_debug!("Exiting Sequencer::run()");
        Ok(BootstrapSummary {
            runtime,
            provision: environment.outcome,
            verification,
            launchers,
            launched,
        })
    }
}

fn banner(title: &str) {
    eprintln!();
    eprintln!("{}", "==============================================================".bright_blue());
    log_info!("{}", title.bold());
}
