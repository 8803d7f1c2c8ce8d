// Shared building blocks used by the stages and the commands.

// Resolving the project directory and loading `bootstrap.yaml`.
pub(crate) mod config_loading;
// The explicit configuration passed to every stage.
pub(crate) mod context;
// Copying a packaged build into an install directory.
pub(crate) mod deployment;
// Reading and writing the dependency manifest (`requirements.txt`).
pub(crate) mod manifest;
// PyInstaller builds and the InnoSetup installer script.
pub(crate) mod packaging;
// Running external commands behind a trait.
pub(crate) mod process;
// Operator questions and their non-interactive answers.
pub(crate) mod prompts;
// Runs the five stages in order.
pub(crate) mod sequencer;
// Start Menu, desktop and application-menu shortcuts.
pub(crate) mod shortcuts;
// Small helpers: paths, platform detection, version comparison.
pub(crate) mod utilities;
