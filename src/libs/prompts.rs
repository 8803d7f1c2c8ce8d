// Operator prompts.
// Stages never read stdin: they ask a `Prompter` with the default answer and
// get a decision back. `ConsolePrompter` is the only place that talks to the
// terminal (through `dialoguer`); command-line flags pre-answer questions and
// `--yes` or a non-interactive stdin falls back to the defaults.

use crate::libs::utilities::path_helpers::expand_path;
use crate::{log_debug, log_warn};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// What to do with an environment directory that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentChoice {
    /// Keep it and install into it.
    Reuse,
    /// Delete the whole tree and create it again.
    Recreate,
}

/// The questions the bootstrap can ask, one method per decision.
pub trait Prompter {
    fn existing_environment(&mut self, path: &Path, default: EnvironmentChoice) -> EnvironmentChoice;
    fn launch_now(&mut self, default: bool) -> bool;
    fn install_dir(&mut self, default: &Path) -> PathBuf;
    fn confirm_removal(&mut self, what: &str, default: bool) -> bool;
}

/// Answers given up front on the command line.
#[derive(Debug, Clone, Default)]
pub struct PresetAnswers {
    pub environment: Option<EnvironmentChoice>,
    pub launch_now: Option<bool>,
    pub install_dir: Option<PathBuf>,
    pub confirm_removal: Option<bool>,
    /// `--yes`: take the default for every question not preset.
    pub assume_defaults: bool,
}

/// Decides a question without the console when possible.
/// A preset wins; otherwise the default is used when defaults are assumed.
pub fn decide_without_console<T>(preset: Option<T>, assume_defaults: bool, default: T) -> Option<T> {
    match preset {
        Some(answer) => Some(answer),
        None if assume_defaults => Some(default),
        None => None,
    }
}

/// `Prompter` backed by the terminal.
pub struct ConsolePrompter {
    presets: PresetAnswers,
}

impl ConsolePrompter {
    pub fn new(mut presets: PresetAnswers) -> Self {
        if !presets.assume_defaults && !std::io::stdin().is_terminal() {
            log_debug!("[Prompt] stdin is not a terminal, using default answers");
            presets.assume_defaults = true;
        }
        ConsolePrompter { presets }
    }
}

impl Prompter for ConsolePrompter {
    fn existing_environment(&mut self, path: &Path, default: EnvironmentChoice) -> EnvironmentChoice {
        if let Some(choice) = decide_without_console(self.presets.environment, self.presets.assume_defaults, default) {
            return choice;
        }
        let default_index = match default {
            EnvironmentChoice::Reuse => 0,
            EnvironmentChoice::Recreate => 1,
        };
        let prompt = format!(
            "An environment already exists at {}",
            path.display().to_string().cyan()
        );
        match Select::new()
            .with_prompt(prompt)
            .items(&["Reuse it", "Delete and recreate it"])
            .default(default_index)
            .interact()
        {
            Ok(0) => EnvironmentChoice::Reuse,
            Ok(_) => EnvironmentChoice::Recreate,
            Err(e) => {
                log_warn!("[Prompt] Could not read the answer ({}), using {:?}", e, default);
                default
            }
        }
    }

    fn launch_now(&mut self, default: bool) -> bool {
        if let Some(answer) = decide_without_console(self.presets.launch_now, self.presets.assume_defaults, default) {
            return answer;
        }
        confirm("Launch the application now?", default)
    }

    fn install_dir(&mut self, default: &Path) -> PathBuf {
        let preset = self.presets.install_dir.clone();
        if let Some(dir) = decide_without_console(preset, self.presets.assume_defaults, default.to_path_buf()) {
            return dir;
        }
        match Input::<String>::new()
            .with_prompt("Install directory")
            .default(default.display().to_string())
            .interact_text()
        {
            Ok(answer) => expand_path(answer.trim()),
            Err(e) => {
                log_warn!("[Prompt] Could not read the answer ({}), using {}", e, default.display());
                default.to_path_buf()
            }
        }
    }

    fn confirm_removal(&mut self, what: &str, default: bool) -> bool {
        if let Some(answer) = decide_without_console(self.presets.confirm_removal, self.presets.assume_defaults, default) {
            return answer;
        }
        confirm(&format!("Remove {what}?"), default)
    }
}

fn confirm(prompt: &str, default: bool) -> bool {
    match Confirm::new().with_prompt(prompt).default(default).interact() {
        Ok(answer) => answer,
        Err(e) => {
            log_warn!("[Prompt] Could not read the answer ({}), using {}", e, default);
            default
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_win_over_defaults() {
        assert_eq!(
            decide_without_console(Some(EnvironmentChoice::Recreate), true, EnvironmentChoice::Reuse),
            Some(EnvironmentChoice::Recreate)
        );
    }

    #[test]
    fn defaults_apply_only_when_assumed() {
        assert_eq!(decide_without_console(None, true, false), Some(false));
        assert_eq!(decide_without_console::<bool>(None, false, false), None);
    }

    #[test]
    fn console_prompter_with_yes_never_blocks() {
        let mut prompter = ConsolePrompter::new(PresetAnswers {
            launch_now: Some(true),
            assume_defaults: true,
            ..PresetAnswers::default()
        });
        assert_eq!(
            prompter.existing_environment(Path::new("venv"), EnvironmentChoice::Reuse),
            EnvironmentChoice::Reuse
        );
        assert!(prompter.launch_now(false));
        assert_eq!(prompter.install_dir(Path::new("/opt/app")), PathBuf::from("/opt/app"));
        assert!(!prompter.confirm_removal("the environment", false));
    }
}
