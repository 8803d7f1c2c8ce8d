// Error taxonomy for the bootstrap sequence.
// Fatal conditions are `BootstrapError` values and end the run with exit status 1.
// Non-fatal conditions (ambient fallback, per-dependency verification failures)
// are logged and never surface here.

use crate::schemas::runtime::RuntimeVersion;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The sequencer stage a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Runtime,
    Environment,
    Dependencies,
    Verify,
    Launcher,
}

impl Stage {
    /// Prefix used on every log line of the stage.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Runtime => "[Runtime]",
            Stage::Environment => "[Environment]",
            Stage::Dependencies => "[Dependencies]",
            Stage::Verify => "[Verify]",
            Stage::Launcher => "[Launcher]",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Python runtime not found (tried: {})", .tried.join(", "))]
    RuntimeNotFound { tried: Vec<String> },

    #[error(
        "insufficient Python version: found {}, but {required} or newer (same major) is required",
        describe_found(.found)
    )]
    RuntimeVersionInsufficient {
        found: Vec<(String, RuntimeVersion)>,
        required: RuntimeVersion,
    },

    #[error("could not create the isolated environment at {}: {reason}", .path.display())]
    EnvironmentCreateFailed { path: PathBuf, reason: String },

    #[error("could not remove the existing environment at {}: {source}", .path.display())]
    EnvironmentRemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "refusing to remove the environment at {}: it contains the project {}",
        .path.display(),
        .project.display()
    )]
    EnvironmentContainsProject { path: PathBuf, project: PathBuf },

    #[error("could not prepare the dependency manifest {}: {source}", .path.display())]
    ManifestUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("dependency install failed: {detail}")]
    DependencyInstallFailed { detail: String },

    #[error(
        "could not write launcher {}: {source}. Fix the directory permissions and rerun, or create the launcher by hand",
        .path.display()
    )]
    LauncherWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BootstrapError {
    /// The stage that raised the error, for the stage-labelled fatal message.
    pub fn stage(&self) -> Stage {
        match self {
            BootstrapError::RuntimeNotFound { .. }
            | BootstrapError::RuntimeVersionInsufficient { .. } => Stage::Runtime,
            BootstrapError::EnvironmentCreateFailed { .. }
            | BootstrapError::EnvironmentRemoveFailed { .. }
            | BootstrapError::EnvironmentContainsProject { .. } => Stage::Environment,
            BootstrapError::ManifestUnavailable { .. }
            | BootstrapError::DependencyInstallFailed { .. } => Stage::Dependencies,
            BootstrapError::LauncherWriteFailed { .. } => Stage::Launcher,
        }
    }
}

fn describe_found(found: &[(String, RuntimeVersion)]) -> String {
    found
        .iter()
        .map(|(candidate, version)| format!("'{candidate}' at {version}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_errors_are_distinct() {
        let absent = BootstrapError::RuntimeNotFound {
            tried: vec!["python3".into(), "python".into()],
        };
        let too_old = BootstrapError::RuntimeVersionInsufficient {
            found: vec![("python3".into(), RuntimeVersion::new(3, 7))],
            required: RuntimeVersion::new(3, 8),
        };

        assert_eq!(
            absent.to_string(),
            "Python runtime not found (tried: python3, python)"
        );
        assert!(too_old.to_string().starts_with("insufficient Python version"));
        assert!(too_old.to_string().contains("'python3' at 3.7"));
        assert_eq!(absent.stage(), Stage::Runtime);
        assert_eq!(too_old.stage(), Stage::Runtime);
    }

    #[test]
    fn launcher_errors_tell_the_operator_what_to_do() {
        let error = BootstrapError::LauncherWriteFailed {
            path: PathBuf::from("run_analyzer.sh"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.stage(), Stage::Launcher);
        assert!(error.to_string().contains("create the launcher by hand"));
    }
}
