use clap::ValueEnum;

/// What `fsae-bootstrap build` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuildTarget {
    /// Standalone executable through PyInstaller.
    #[default]
    Exe,
    /// InnoSetup script for a Windows installer.
    InstallerScript,
    /// The executable, then the installer script if the build succeeded.
    Both,
}

impl BuildTarget {
    pub fn builds_executable(self) -> bool {
        matches!(self, BuildTarget::Exe | BuildTarget::Both)
    }

    pub fn writes_installer_script(self) -> bool {
        matches!(self, BuildTarget::InstallerScript | BuildTarget::Both)
    }
}
