use crate::log_debug;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Expands `~` and `$VARS` in a user supplied path.
///
/// Paths coming from `bootstrap.yaml` or from the install-directory prompt may
/// contain a tilde or environment variables (`%LOCALAPPDATA%` style variables
/// are not expanded). When a variable is undefined the path is only
/// tilde-expanded, so the operator still sees what they typed.
///
/// # Arguments
/// * `path`: The raw path string.
///
/// # Returns
/// * `PathBuf`: The expanded path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log_debug!(
                "[Paths] Could not expand variables in '{}': {}. Expanding '~' only.",
                path.yellow(),
                e
            );
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}

/// Expands `path` and anchors it at `base` when it is relative.
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Renders `path` relative to `base` for use inside generated scripts.
/// Falls back to the full path when `path` is not below `base`.
pub fn relative_display(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
