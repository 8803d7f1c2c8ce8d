// The five stages of the bootstrap sequence, in execution order.
// Each stage attempts its work exactly once; `libs::sequencer` wires them together.

// Finds an acceptable Python interpreter among the configured candidates.
pub mod runtime_locator;
// Creates, reuses or recreates the isolated environment.
pub mod env_provisioner;
// Upgrades pip and batch-installs the dependency manifest.
pub mod dependency_installer;
// Imports every dependency inside the environment, never aborting.
pub mod verifier;
// Writes the launcher scripts and optionally starts the application.
pub mod launcher_emitter;
