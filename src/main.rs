// Entry point of `fsae-bootstrap`.
// Parses the command line, initializes the logger and dispatches to the
// selected command. Every command reports its own errors and returns the
// process exit code.

mod cli;
mod commands;
mod errors;
mod libs;
mod logger;
mod schemas;
mod stages;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands, InstallArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let project_dir = cli.project_dir.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        None => commands::install::run(project_dir, config, &InstallArgs::default()),
        Some(Commands::Install(args)) => commands::install::run(project_dir, config, &args),
        Some(Commands::Verify) => commands::verify::run(project_dir, config),
        Some(Commands::Launcher) => commands::launcher::run(project_dir, config),
        Some(Commands::Uninstall { yes }) => commands::uninstall::run(project_dir, config, yes),
        Some(Commands::Deploy(args)) => commands::deploy::run(project_dir, config, &args),
        Some(Commands::Build { target }) => commands::build::run(project_dir, config, target),
        Some(Commands::Version) => commands::version::run(),
    }
}
