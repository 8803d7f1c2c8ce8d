// Types describing Python runtimes: how to invoke one, which version it reported,
// and which one the Runtime Locator selected.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;

// First `<digits>.<digits>` in `--version` output.
static VERSION_RE: OnceLock<Regex> = OnceLock::new();

/// A `major.minor` interpreter version.
///
/// Ordering is lexicographic on `(major, minor)`, but acceptance is not a plain
/// comparison: see [`RuntimeVersion::satisfies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl RuntimeVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        RuntimeVersion { major, minor }
    }

    /// Finds the first `<digits>.<digits>` occurrence in interpreter output.
    ///
    /// `Python 3.10.12` yields `3.10`; `Python 2.7.18` yields `2.7`.
    /// Output without such a pattern (e.g. a store redirect stub) yields `None`.
    pub fn find_in(output: &str) -> Option<Self> {
        let re = VERSION_RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)").expect("version regex"));
        re.captures_iter(output).find_map(|caps| {
            let major = caps[1].parse().ok()?;
            let minor = caps[2].parse().ok()?;
            Some(RuntimeVersion { major, minor })
        })
    }

    /// A runtime is acceptable when the major version matches exactly and the
    /// minor version is at least the required one (`3.8` accepts `3.8`..`3.x`,
    /// never `2.x` or `4.x`).
    pub fn satisfies(&self, minimum: &RuntimeVersion) -> bool {
        self.major == minimum.major && self.minor >= minimum.minor
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for RuntimeVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| format!("expected 'major.minor', got '{s}'"))?;
        let major = major
            .parse()
            .map_err(|_| format!("invalid major version in '{s}'"))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid minor version in '{s}'"))?;
        Ok(RuntimeVersion { major, minor })
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A program plus leading arguments, e.g. `py -3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Splits a configured candidate such as `"py -3"` on whitespace.
    /// Returns `None` for blank candidates.
    pub fn parse(candidate: &str) -> Option<Self> {
        let mut parts = candidate.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(CommandSpec {
            program,
            args: parts.collect(),
        })
    }

    /// An interpreter addressed by path (the environment's own `python`).
    pub fn from_path(path: &Path) -> Self {
        CommandSpec {
            program: path.to_string_lossy().into_owned(),
            args: Vec::new(),
        }
    }

    /// Builds a fresh `Command` with the leading arguments applied.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// The command as it would be typed into a shell.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// The runtime the Locator accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRuntime {
    pub command: CommandSpec,
    pub version: RuntimeVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_major_minor_in_interpreter_banners() {
        assert_eq!(
            RuntimeVersion::find_in("Python 3.10.12\n"),
            Some(RuntimeVersion::new(3, 10))
        );
        assert_eq!(
            RuntimeVersion::find_in("Python 2.7.18"),
            Some(RuntimeVersion::new(2, 7))
        );
        assert_eq!(
            RuntimeVersion::find_in("Python 3.12.0rc1"),
            Some(RuntimeVersion::new(3, 12))
        );
    }

    #[test]
    fn ignores_output_without_a_dotted_version() {
        assert_eq!(RuntimeVersion::find_in("Python was not found; run without arguments to install from the Microsoft Store"), None);
        assert_eq!(RuntimeVersion::find_in("exit 9009"), None);
        assert_eq!(RuntimeVersion::find_in("3."), None);
    }

    #[test]
    fn skips_numbers_too_large_for_a_version() {
        assert_eq!(
            RuntimeVersion::find_in("build 99999999999.1\nPython 3.9.18 (main, Aug 24 2023)"),
            Some(RuntimeVersion::new(3, 9))
        );
    }

    #[test]
    fn acceptance_requires_matching_major() {
        let minimum = RuntimeVersion::new(3, 8);
        assert!(RuntimeVersion::new(3, 8).satisfies(&minimum));
        assert!(RuntimeVersion::new(3, 12).satisfies(&minimum));
        assert!(!RuntimeVersion::new(3, 7).satisfies(&minimum));
        assert!(!RuntimeVersion::new(4, 0).satisfies(&minimum));
        assert!(!RuntimeVersion::new(2, 9).satisfies(&minimum));
    }

    #[test]
    fn parses_configured_minimums() {
        assert_eq!("3.8".parse::<RuntimeVersion>(), Ok(RuntimeVersion::new(3, 8)));
        assert!("3".parse::<RuntimeVersion>().is_err());
        assert!("three.eight".parse::<RuntimeVersion>().is_err());
    }

    #[test]
    fn candidates_keep_their_leading_arguments() {
        let spec = CommandSpec::parse("  py   -3 ").unwrap();
        assert_eq!(spec.program, "py");
        assert_eq!(spec.args, vec!["-3"]);
        assert_eq!(spec.command_line(), "py -3");
        assert_eq!(CommandSpec::parse("   "), None);
    }
}
