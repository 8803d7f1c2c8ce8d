use crate::cli::type_enums::BuildTarget;
use crate::libs::prompts::{EnvironmentChoice, PresetAnswers};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Defines the command-line interface for `fsae-bootstrap`.
/// Running without a subcommand is the same as `fsae-bootstrap install`.
#[derive(Parser, Debug)]
#[command(name = "fsae-bootstrap")]
#[command(about = "Set up, verify and launch the FSAE Signal Analyzer", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output (subprocess command lines and output).
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Project directory holding the application sources (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) project_dir: Option<PathBuf>,

    /// Configuration file (defaults to `<project>/bootstrap.yaml` when present).
    #[arg(long, global = true, env = "FSAE_BOOTSTRAP_CONFIG", value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the full bootstrap: runtime, environment, dependencies, verification, launchers.
    Install(InstallArgs),
    /// Re-checks that every dependency imports in the existing environment.
    Verify,
    /// Regenerates the launcher scripts only.
    Launcher,
    /// Deletes the generated launchers and the environment directory.
    Uninstall {
        /// Remove without asking.
        #[arg(short, long)]
        yes: bool,
    },
    /// Copies the packaged application into an install directory and adds shortcuts.
    Deploy(DeployArgs),
    /// Packages the application as a standalone executable and/or installer script.
    Build {
        #[arg(long, value_enum, default_value_t = BuildTarget::Exe)]
        target: BuildTarget,
    },
    /// Show the current version of the tool.
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Accept the default answer for every question.
    #[arg(short, long)]
    pub yes: bool,
    /// Delete and recreate an existing environment.
    #[arg(long, conflicts_with = "reuse")]
    pub recreate: bool,
    /// Keep an existing environment.
    #[arg(long)]
    pub reuse: bool,
    /// Launch the application when the bootstrap finishes.
    #[arg(long, conflicts_with = "no_run")]
    pub run: bool,
    /// Do not launch the application afterwards.
    #[arg(long)]
    pub no_run: bool,
}

impl InstallArgs {
    /// Turns the flags into pre-answered prompts.
    pub fn presets(&self) -> PresetAnswers {
        let environment = if self.recreate {
            Some(EnvironmentChoice::Recreate)
        } else if self.reuse {
            Some(EnvironmentChoice::Reuse)
        } else {
            None
        };
        let launch_now = match (self.run, self.no_run) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        PresetAnswers {
            environment,
            launch_now,
            assume_defaults: self.yes,
            ..PresetAnswers::default()
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Install directory (skips the prompt).
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
    /// Accept the default install directory.
    #[arg(short, long)]
    pub yes: bool,
    /// Do not create Start Menu or desktop shortcuts.
    #[arg(long)]
    pub no_shortcuts: bool,
}

impl DeployArgs {
    pub fn presets(&self) -> PresetAnswers {
        PresetAnswers {
            install_dir: self.install_dir.clone(),
            assume_defaults: self.yes,
            ..PresetAnswers::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_accepted() {
        let cli = Cli::try_parse_from(["fsae-bootstrap", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(cli.command.is_none());
    }

    #[test]
    fn install_flags_become_presets() {
        let cli = Cli::try_parse_from(["fsae-bootstrap", "install", "--recreate", "--no-run", "--yes"]).unwrap();
        let Some(Commands::Install(args)) = cli.command else {
            panic!("expected install");
        };
        let presets = args.presets();
        assert_eq!(presets.environment, Some(EnvironmentChoice::Recreate));
        assert_eq!(presets.launch_now, Some(false));
        assert!(presets.assume_defaults);
    }

    #[test]
    fn recreate_and_reuse_conflict() {
        assert!(Cli::try_parse_from(["fsae-bootstrap", "install", "--recreate", "--reuse"]).is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["fsae-bootstrap", "verify", "--project-dir", "/work/analyzer"]).unwrap();
        assert_eq!(cli.project_dir, Some(PathBuf::from("/work/analyzer")));
    }

    #[test]
    fn build_target_defaults_to_exe() {
        let cli = Cli::try_parse_from(["fsae-bootstrap", "build"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Build { target: BuildTarget::Exe })));
    }
}
