// Data types shared across the bootstrap stages.

// `bootstrap.yaml` configuration with FSAE Signal Analyzer defaults.
pub mod config;
// Dependency List entries and import-name resolution.
pub mod dependency;
// On-disk layout of an isolated environment.
pub mod environment;
// Candidate runtimes, parsed versions and the selected interpreter.
pub mod runtime;
