// Schema for the optional `bootstrap.yaml` file.
// Every section and field may be omitted; the defaults describe the
// FSAE Signal Analyzer so a fresh checkout bootstraps with no file at all.
//
// ```yaml
// app:
//   name: FSAE Signal Analyzer
//   entry_module: fsae_signal_analyzer.main
//   hidden_imports: [scipy.signal, tkinter.filedialog]
// runtime:
//   candidates: ["python3", "python"]
//   minimum: "3.8"
// environment:
//   dir: venv
//   allow_ambient_fallback: true
// dependencies:
//   manifest: requirements.txt
//   packages:
//     - { name: pillow, min_version: "10.0.0", import_name: PIL }
// ```

use crate::libs::utilities::platform::Platform;
use crate::schemas::dependency::{Dependency, default_dependencies};
use crate::schemas::runtime::RuntimeVersion;
use serde::Deserialize;

/// Top-level `bootstrap.yaml` document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    pub app: AppConfig,
    pub runtime: RuntimeConfig,
    pub environment: EnvironmentConfig,
    pub dependencies: DependencyConfig,
    pub deploy: DeployConfig,
}

/// The application being bootstrapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Human readable name, used for shortcuts and the installer script.
    pub name: String,
    /// Version written into the installer script.
    pub version: String,
    pub publisher: String,
    /// Module started by the launchers with `python -m`.
    pub entry_module: String,
    /// Script handed to PyInstaller.
    pub entry_script: String,
    /// Launcher file stem: `run_analyzer` gives `run_analyzer.sh`/`.bat`/`.ps1`.
    pub launcher_name: String,
    /// Packaged application deployed by `deploy`, relative to the project.
    /// Defaults to `dist/<PackageName>` plus the platform executable suffix.
    pub executable: Option<String>,
    /// Optional icon referenced by shortcuts.
    pub icon: Option<String>,
    /// Submodules PyInstaller cannot see through dynamic imports.
    pub hidden_imports: Vec<String>,
}

/// Imported lazily by the analyzer, so PyInstaller misses them.
const DEFAULT_HIDDEN_IMPORTS: &[&str] = &[
    "plotly.express",
    "plotly.graph_objects",
    "scipy.signal",
    "scipy.fft",
    "matplotlib.pyplot",
    "matplotlib.figure",
    "PIL.Image",
    "PIL.ImageTk",
    "tkinter",
    "tkinter.ttk",
    "tkinter.filedialog",
];

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            name: "FSAE Signal Analyzer".to_string(),
            version: "2.0".to_string(),
            publisher: "ITU Racing Electronics".to_string(),
            entry_module: "fsae_signal_analyzer.main".to_string(),
            entry_script: "run_analyzer.py".to_string(),
            launcher_name: "run_analyzer".to_string(),
            executable: None,
            icon: None,
            hidden_imports: DEFAULT_HIDDEN_IMPORTS.iter().map(|module| module.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// File-system friendly name used for the packaged executable
    /// (`FSAE Signal Analyzer` becomes `FSAE_Signal_Analyzer`).
    pub fn package_name(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Project-relative path of the packaged application.
    pub fn executable_path(&self, platform: Platform) -> String {
        self.executable.clone().unwrap_or_else(|| {
            format!("dist/{}{}", self.package_name(), platform.exe_suffix())
        })
    }
}

/// Runtime Locator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Commands tried in order; each may carry arguments (`py -3`).
    pub candidates: Vec<String>,
    /// Same major, at least this minor.
    pub minimum: RuntimeVersion,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            candidates: Platform::current().default_runtime_candidates(),
            minimum: RuntimeVersion::new(3, 8),
        }
    }
}

/// Environment Provisioner settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Environment directory, relative to the project unless absolute.
    pub dir: String,
    /// Continue against the ambient runtime when the environment cannot be created.
    pub allow_ambient_fallback: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            dir: "venv".to_string(),
            allow_ambient_fallback: true,
        }
    }
}

/// Dependency Installer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyConfig {
    /// Declarative manifest consumed by `pip install -r`.
    pub manifest: String,
    /// Dependency List used when the manifest does not exist yet, and the
    /// source of import names for verification.
    pub packages: Vec<Dependency>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        DependencyConfig {
            manifest: "requirements.txt".to_string(),
            packages: default_dependencies(),
        }
    }
}

/// `deploy` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Install directory offered as the prompt default.
    pub install_dir: Option<String>,
    /// Shortcut label; defaults to the application name.
    pub shortcut_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_application_defaults() {
        let config: BootstrapConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.app.entry_module, "fsae_signal_analyzer.main");
        assert_eq!(config.environment.dir, "venv");
        assert!(config.environment.allow_ambient_fallback);
        assert_eq!(config.runtime.minimum, RuntimeVersion::new(3, 8));
        assert_eq!(config.dependencies.manifest, "requirements.txt");
        assert_eq!(config.dependencies.packages.len(), 9);
        assert_eq!(config.app.hidden_imports.len(), 11);
    }

    #[test]
    fn hidden_imports_can_be_overridden() {
        let config: BootstrapConfig = serde_yaml::from_str("app:\n  hidden_imports: [scipy.io]\n").unwrap();
        assert_eq!(config.app.hidden_imports, vec!["scipy.io"]);
        assert_eq!(config.app.name, "FSAE Signal Analyzer");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
runtime:
  candidates: ["python3.11"]
  minimum: "3.10"
environment:
  allow_ambient_fallback: false
dependencies:
  packages:
    - name: pillow
      min_version: "10.0.0"
      import_name: PIL
"#;
        let config: BootstrapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.runtime.candidates, vec!["python3.11"]);
        assert_eq!(config.runtime.minimum, RuntimeVersion::new(3, 10));
        assert_eq!(config.environment.dir, "venv");
        assert!(!config.environment.allow_ambient_fallback);
        assert_eq!(config.dependencies.packages.len(), 1);
        assert_eq!(config.dependencies.packages[0].module_name(), "PIL");
        assert_eq!(config.app.launcher_name, "run_analyzer");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<BootstrapConfig, _> = serde_yaml::from_str("environment:\n  directory: env\n");
        assert!(result.is_err());
    }

    #[test]
    fn unquoted_minimum_keeps_two_digit_minor() {
        let config: BootstrapConfig = serde_yaml::from_str("runtime:\n  minimum: 3.10\n").unwrap();
        assert_eq!(config.runtime.minimum, RuntimeVersion::new(3, 10));
    }

    #[test]
    fn executable_path_follows_the_package_name() {
        let app = AppConfig::default();
        assert_eq!(app.package_name(), "FSAE_Signal_Analyzer");
        assert_eq!(app.executable_path(Platform::Windows), "dist/FSAE_Signal_Analyzer.exe");
        assert_eq!(app.executable_path(Platform::Linux), "dist/FSAE_Signal_Analyzer");
    }
}
