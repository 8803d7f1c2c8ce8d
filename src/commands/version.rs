// Prints the version of `fsae-bootstrap`, taken from the package metadata at
// compile time.

use crate::log_info;
use std::process::ExitCode;

pub fn run() -> ExitCode {
    log_info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    ExitCode::SUCCESS
}
