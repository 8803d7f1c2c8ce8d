// Where things live inside an isolated environment.
// Windows environments keep executables in `Scripts\`, POSIX ones in `bin/`.

use crate::libs::utilities::platform::Platform;
use std::path::{Path, PathBuf};

/// The on-disk layout of an isolated environment rooted at `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    pub root: PathBuf,
    pub platform: Platform,
}

impl EnvironmentLayout {
    pub fn new(root: &Path, platform: Platform) -> Self {
        EnvironmentLayout {
            root: root.to_path_buf(),
            platform,
        }
    }

    /// Directory holding the environment's executables.
    pub fn scripts_dir(&self) -> PathBuf {
        if self.platform.is_windows() {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// The environment's embedded interpreter.
    pub fn interpreter(&self) -> PathBuf {
        if self.platform.is_windows() {
            self.scripts_dir().join("python.exe")
        } else {
            self.scripts_dir().join("python")
        }
    }

    /// The activation script sourced by the shell/batch launchers.
    pub fn activate_script(&self) -> PathBuf {
        if self.platform.is_windows() {
            self.scripts_dir().join("activate.bat")
        } else {
            self.scripts_dir().join("activate")
        }
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// A provisioned environment has its own interpreter.
    pub fn has_interpreter(&self) -> bool {
        self.interpreter().is_file()
    }
}
