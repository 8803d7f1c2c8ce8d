// Dependency List entries.
// A dependency is a distribution name (what pip installs), an optional minimum
// version, and the module name the Verifier imports to prove it is usable.

use serde::{Deserialize, Serialize};

// Distributions whose import name differs from the distribution name.
const IMPORT_ALIASES: &[(&str, &str)] = &[
    ("pillow", "PIL"),
    ("pyyaml", "yaml"),
    ("opencv-python", "cv2"),
    ("scikit-learn", "sklearn"),
    ("beautifulsoup4", "bs4"),
    ("pyinstaller", "PyInstaller"),
];

/// One `(name, minimum-version)` entry of the Dependency List.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Distribution name as understood by pip (`pillow`, `CTkMessagebox`).
    pub name: String,
    /// Lowest acceptable version, rendered as `name>=min_version`.
    #[serde(default)]
    pub min_version: Option<String>,
    /// Module to import during verification when it differs from `name`.
    #[serde(default)]
    pub import_name: Option<String>,
}

impl Dependency {
    pub fn new(name: &str, min_version: Option<&str>) -> Self {
        Dependency {
            name: name.to_string(),
            min_version: min_version.map(str::to_string),
            import_name: None,
        }
    }

    pub fn with_import(mut self, import_name: &str) -> Self {
        self.import_name = Some(import_name.to_string());
        self
    }

    /// The manifest line for this dependency, e.g. `numpy>=1.24.0`.
    pub fn requirement_line(&self) -> String {
        match &self.min_version {
            Some(min) => format!("{}>={}", self.name, min),
            None => self.name.clone(),
        }
    }

    /// The module the Verifier imports.
    /// Explicit `import_name` wins, then the alias table, then the
    /// distribution name with `-` replaced by `_`.
    pub fn module_name(&self) -> String {
        if let Some(import_name) = &self.import_name {
            return import_name.clone();
        }
        let normalized = normalize_name(&self.name);
        IMPORT_ALIASES
            .iter()
            .find(|(dist, _)| *dist == normalized)
            .map(|(_, module)| module.to_string())
            .unwrap_or_else(|| self.name.replace('-', "_"))
    }

    /// Whether two entries name the same distribution (`Pillow` == `pillow`).
    pub fn same_distribution(&self, other_name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(other_name)
    }
}

/// PEP 503 style name normalization: lowercase, `_` and `.` become `-`.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['_', '.'], "-")
}

/// The dependencies the FSAE Signal Analyzer declares, in install order.
pub fn default_dependencies() -> Vec<Dependency> {
    vec![
        Dependency::new("customtkinter", Some("5.2.0")),
        Dependency::new("CTkMessagebox", Some("2.5")),
        Dependency::new("plotly", Some("5.18.0")),
        Dependency::new("matplotlib", Some("3.7.0")),
        Dependency::new("pillow", Some("10.0.0")).with_import("PIL"),
        Dependency::new("pandas", Some("2.0.0")),
        Dependency::new("numpy", Some("1.24.0")),
        Dependency::new("openpyxl", Some("3.1.0")),
        Dependency::new("scipy", Some("1.11.0")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_requirement_lines() {
        assert_eq!(
            Dependency::new("numpy", Some("1.24.0")).requirement_line(),
            "numpy>=1.24.0"
        );
        assert_eq!(Dependency::new("plotly", None).requirement_line(), "plotly");
    }

    #[test]
    fn resolves_module_names() {
        assert_eq!(Dependency::new("Pillow", None).module_name(), "PIL");
        assert_eq!(Dependency::new("PyYAML", None).module_name(), "yaml");
        assert_eq!(Dependency::new("CTkMessagebox", None).module_name(), "CTkMessagebox");
        assert_eq!(Dependency::new("typing-extensions", None).module_name(), "typing_extensions");
        assert_eq!(
            Dependency::new("pillow", None).with_import("PIL.Image").module_name(),
            "PIL.Image"
        );
    }

    #[test]
    fn defaults_match_the_application_manifest() {
        let deps = default_dependencies();
        assert_eq!(deps.len(), 9);
        assert_eq!(deps[0].name, "customtkinter");
        assert_eq!(deps[8].requirement_line(), "scipy>=1.11.0");
        assert!(deps[4].same_distribution("Pillow"));
    }
}
