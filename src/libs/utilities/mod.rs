// Small helpers shared by the stages and commands.

// `~`/`$VAR` expansion and project-relative path resolution.
pub mod path_helpers;
// Host platform detection and per-platform file naming.
pub mod platform;
// Lenient version parsing for installed Python packages.
pub mod version;
