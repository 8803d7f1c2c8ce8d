use crate::libs::context::BootstrapContext;
use crate::libs::utilities::platform::Platform;
use crate::schemas::config::BootstrapConfig;
use crate::{log_debug, log_info};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the project directory when no config path was given.
pub const DEFAULT_CONFIG_FILE: &str = "bootstrap.yaml";

/// Resolves the project directory: the explicit one, else the working directory.
/// Relative paths are made absolute so generated scripts and logs are unambiguous.
pub fn resolve_project_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    Ok(match explicit {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Picks the configuration file to load.
///
/// Priority order:
/// 1. `--config` (clap also fills it from `FSAE_BOOTSTRAP_CONFIG`)
/// 2. `<project>/bootstrap.yaml` when it exists
/// 3. none: built-in defaults
pub fn resolve_config_path(project_dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        });
    }
    let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Loads `bootstrap.yaml`, or the defaults when `path` is `None`.
/// An explicitly named file that cannot be read or parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<BootstrapConfig> {
    let Some(path) = path else {
        log_debug!("[Config] No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
        return Ok(BootstrapConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    let config: BootstrapConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}. Please check its YAML syntax", path.display()))?;

    log_info!("[Config] Using configuration file: {}", path.display().to_string().cyan());
    log_debug!("[Config] Loaded configuration: {:?}", config);
    Ok(config)
}

/// Resolves paths and configuration into the context every stage receives.
pub fn load_context(project_dir: Option<&Path>, config_path: Option<&Path>) -> Result<BootstrapContext> {
    let project_dir = resolve_project_dir(project_dir)?;
    let config_path = resolve_config_path(&project_dir, config_path);
    let config = load_config(config_path.as_deref())?;
    let ctx = BootstrapContext::new(&project_dir, config, Platform::current());

    log_debug!("[Config] Project directory: {}", ctx.project_dir.display());
    log_debug!("[Config] Environment directory: {}", ctx.env_dir.display());
    log_debug!("[Config] Dependency manifest: {}", ctx.manifest_path.display());
    Ok(ctx)
}
