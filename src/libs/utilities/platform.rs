// Host platform detection.
// The stages never call `cfg!` themselves: the detected platform is stored in the
// bootstrap context so tests can exercise Windows and POSIX layouts anywhere.

use std::fmt;

/// The operating system family the bootstrapper is generating files for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detects the platform this binary was compiled for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Suffix appended to native executables (`.exe` on Windows).
    pub fn exe_suffix(self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Default runtime candidates, in preference order.
    pub fn default_runtime_candidates(self) -> Vec<String> {
        let names: &[&str] = match self {
            Platform::Windows => &["python", "py -3", "python3"],
            Platform::MacOs | Platform::Linux => &["python3", "python"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_prefers_the_python_launcher_before_python3() {
        let candidates = Platform::Windows.default_runtime_candidates();
        assert_eq!(candidates, vec!["python", "py -3", "python3"]);
    }

    #[test]
    fn posix_prefers_python3() {
        assert_eq!(Platform::Linux.default_runtime_candidates()[0], "python3");
        assert_eq!(Platform::MacOs.exe_suffix(), "");
        assert_eq!(Platform::Windows.exe_suffix(), ".exe");
    }
}
