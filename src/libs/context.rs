// The explicit configuration threaded through every stage.
// Stages read paths and settings from here instead of the process working
// directory or environment variables.

use crate::libs::utilities::path_helpers::resolve_against;
use crate::libs::utilities::platform::Platform;
use crate::schemas::config::BootstrapConfig;
use crate::schemas::environment::EnvironmentLayout;
use crate::schemas::runtime::CommandSpec;
use std::path::{Path, PathBuf};

/// Everything a bootstrap run needs to know, resolved once up front.
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    /// Project root: launchers are written here, relative paths resolve here.
    pub project_dir: PathBuf,
    /// The isolated environment directory.
    pub env_dir: PathBuf,
    /// The declarative dependency manifest.
    pub manifest_path: PathBuf,
    pub platform: Platform,
    pub config: BootstrapConfig,
}

impl BootstrapContext {
    pub fn new(project_dir: &Path, config: BootstrapConfig, platform: Platform) -> Self {
        let env_dir = resolve_against(project_dir, &config.environment.dir);
        let manifest_path = resolve_against(project_dir, &config.dependencies.manifest);
        BootstrapContext {
            project_dir: project_dir.to_path_buf(),
            env_dir,
            manifest_path,
            platform,
            config,
        }
    }

    pub fn layout(&self) -> EnvironmentLayout {
        EnvironmentLayout::new(&self.env_dir, self.platform)
    }

    /// Configured runtime candidates, blank entries dropped.
    pub fn runtime_candidates(&self) -> Vec<CommandSpec> {
        self.config
            .runtime
            .candidates
            .iter()
            .filter_map(|candidate| CommandSpec::parse(candidate))
            .collect()
    }

    /// Launchers generated for this platform.
    pub fn launcher_paths(&self) -> Vec<PathBuf> {
        let extensions: &[&str] = if self.platform.is_windows() {
            &["bat", "ps1"]
        } else {
            &["sh"]
        };
        self.launchers_with(extensions)
    }

    /// Every launcher variant, whichever platform wrote it.
    pub fn all_launcher_paths(&self) -> Vec<PathBuf> {
        self.launchers_with(&["bat", "ps1", "sh"])
    }

    fn launchers_with(&self, extensions: &[&str]) -> Vec<PathBuf> {
        extensions
            .iter()
            .map(|ext| {
                self.project_dir
                    .join(format!("{}.{}", self.config.app.launcher_name, ext))
            })
            .collect()
    }
}
