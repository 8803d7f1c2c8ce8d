// `fsae-bootstrap uninstall`: removes what `install` generated in the project,
// the launcher scripts and the environment directory. The dependency manifest
// and the application sources are left alone.

use crate::libs::context::BootstrapContext;
use crate::libs::prompts::{ConsolePrompter, PresetAnswers, Prompter};
use crate::stages::env_provisioner::{ensure_removable, remove_environment};
use crate::{log_debug, log_error, log_info};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub fn run(project_dir: Option<&Path>, config: Option<&Path>, yes: bool) -> ExitCode {
    log_debug!("Entered uninstall::run() function.");

    let Some(ctx) = super::load_context(project_dir, config) else {
        return ExitCode::FAILURE;
    };
    let mut prompter = ConsolePrompter::new(PresetAnswers {
        confirm_removal: yes.then_some(true),
        ..PresetAnswers::default()
    });

    match remove_generated(&ctx, &mut prompter) {
        Ok(removed) if removed.is_empty() => {
            log_info!("Nothing to remove");
            ExitCode::SUCCESS
        }
        Ok(removed) => {
            for path in removed {
                log_info!("Removed {}", path.display().to_string().yellow());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Deletes existing launchers (any platform's) and the environment after
/// confirmation. Returns what was removed; declining removes nothing.
pub fn remove_generated(ctx: &BootstrapContext, prompter: &mut dyn Prompter) -> Result<Vec<PathBuf>> {
    let mut targets: Vec<PathBuf> = ctx
        .all_launcher_paths()
        .into_iter()
        .filter(|path| path.is_file())
        .collect();
    let layout = ctx.layout();
    if layout.exists() {
        // Checked up front so a refused environment leaves the launchers too.
        ensure_removable(&layout, &ctx.project_dir)?;
        targets.push(layout.root.clone());
    }
    if targets.is_empty() {
        return Ok(targets);
    }

    let listing = targets
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if !prompter.confirm_removal(&listing, false) {
        log_info!("Keeping {}", listing);
        return Ok(Vec::new());
    }

    for path in &targets {
        if path == &layout.root {
            remove_environment(&layout, &ctx.project_dir)?;
        } else {
            fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
    }
    Ok(targets)
}
