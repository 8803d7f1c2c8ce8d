// The declarative dependency manifest (`requirements.txt`).
// The Dependency Installer hands the file to `pip install -r` verbatim; this
// module only writes it when missing and reads it back to learn the
// Dependency List the Verifier checks.

use crate::log_info;
use crate::schemas::dependency::Dependency;
use colored::Colorize;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

static REQUIREMENT_RE: OnceLock<Regex> = OnceLock::new();
// First lower bound or pin among comma-separated clauses.
static MINIMUM_RE: OnceLock<Regex> = OnceLock::new();

const HEADER: &str = "# Dependencies of the application, installed by fsae-bootstrap.\n";

/// Renders `dependencies` as a requirements file, one `name>=min` per line.
pub fn render_requirements(dependencies: &[Dependency]) -> String {
    let mut out = String::from(HEADER);
    for dependency in dependencies {
        out.push_str(&dependency.requirement_line());
        out.push('\n');
    }
    out
}

/// Parses a requirements file into the Dependency List, keeping file order.
///
/// Comments, blank lines, pip options (`-r`, `--index-url`, ...), extras and
/// environment markers are skipped. Import names are taken from `known`
/// entries of the same distribution so configured aliases survive.
pub fn parse_requirements(text: &str, known: &[Dependency]) -> Vec<Dependency> {
    text.lines()
        .filter_map(|line| parse_line(line, known))
        .collect()
}

fn parse_line(line: &str, known: &[Dependency]) -> Option<Dependency> {
    let line = strip_comment(line).trim();
    if line.is_empty() || line.starts_with('-') {
        return None;
    }
    // Drop environment markers: `pywin32>=306; sys_platform == "win32"`.
    let line = line.split(';').next().unwrap_or(line).trim();

    // `name [extras] constraints`, extras skipped: `pandas[excel]>=2.0`.
    let requirement = REQUIREMENT_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9._-]+)\s*(?:\[[^\]]*\])?\s*(.*)$").expect("requirement regex")
    });
    let minimum = MINIMUM_RE.get_or_init(|| {
        Regex::new(r"(?:^|,)\s*(?:>=|==|~=)\s*([^,\s]+)").expect("minimum regex")
    });

    let caps = requirement.captures(line)?;
    let name = caps.get(1)?.as_str();
    let constraints = caps.get(2).map_or("", |m| m.as_str());
    let min_version = minimum
        .captures(constraints)
        .map(|version| version[1].to_string());

    let import_name = known
        .iter()
        .find(|dependency| dependency.same_distribution(name))
        .and_then(|dependency| dependency.import_name.clone());

    Some(Dependency {
        name: name.to_string(),
        min_version,
        import_name,
    })
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Reads the Dependency List from `path`, or `configured` when the file is missing.
pub fn load_dependency_list(path: &Path, configured: &[Dependency]) -> io::Result<Vec<Dependency>> {
    if path.is_file() {
        let text = fs::read_to_string(path)?;
        Ok(parse_requirements(&text, configured))
    } else {
        Ok(configured.to_vec())
    }
}

/// Makes sure the manifest exists and returns the Dependency List it declares.
/// A missing manifest is written from `configured`; an existing one is never rewritten.
pub fn prepare_manifest(path: &Path, configured: &[Dependency]) -> io::Result<Vec<Dependency>> {
    if path.is_file() {
        return load_dependency_list(path, configured);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_requirements(configured))?;
    log_info!(
        "[Dependencies] Wrote dependency manifest {} ({} packages)",
        path.display().to_string().cyan(),
        configured.len()
    );
    Ok(configured.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::dependency::default_dependencies;

    #[test]
    fn parses_the_usual_requirement_shapes() {
        let text = "\
# GUI
customtkinter>=5.2.0
CTkMessagebox >= 2.5  # dialogs
--index-url https://pypi.org/simple
-r dev.txt

pandas[excel]>=2.0.0,<3
numpy==1.26.4
pywin32>=306; sys_platform == \"win32\"
plotly
";
        let deps = parse_requirements(text, &[]);
        let lines: Vec<String> = deps.iter().map(Dependency::requirement_line).collect();
        assert_eq!(
            lines,
            vec![
                "customtkinter>=5.2.0",
                "CTkMessagebox>=2.5",
                "pandas>=2.0.0",
                "numpy>=1.26.4",
                "pywin32>=306",
                "plotly",
            ]
        );
    }

    #[test]
    fn upper_bounds_and_exclusions_are_not_minimums() {
        let deps = parse_requirements("scipy<2,>=1.11.0\nmatplotlib!=3.8.0\nopenpyxl <= 3.2\n", &[]);
        assert_eq!(deps[0].min_version.as_deref(), Some("1.11.0"));
        assert_eq!(deps[1].min_version, None);
        assert_eq!(deps[2].min_version, None);
    }

    #[test]
    fn keeps_configured_import_names() {
        let known = vec![Dependency::new("pillow", Some("10.0.0")).with_import("PIL")];
        let deps = parse_requirements("Pillow>=10.1\n", &known);
        assert_eq!(deps[0].name, "Pillow");
        assert_eq!(deps[0].import_name.as_deref(), Some("PIL"));
    }

    #[test]
    fn missing_manifest_is_written_from_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("requirements.txt");

        let deps = prepare_manifest(&path, &default_dependencies()).unwrap();
        assert_eq!(deps, default_dependencies());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("customtkinter>=5.2.0\nCTkMessagebox>=2.5\n"));
        assert_eq!(parse_requirements(&written, &default_dependencies()), default_dependencies());
    }

    #[test]
    fn existing_manifest_is_read_not_rewritten() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("requirements.txt");
        fs::write(&path, "numpy>=1.24.0\n").unwrap();

        let deps = prepare_manifest(&path, &default_dependencies()).unwrap();
        assert_eq!(deps, vec![Dependency::new("numpy", Some("1.24.0"))]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "numpy>=1.24.0\n");
    }
}
