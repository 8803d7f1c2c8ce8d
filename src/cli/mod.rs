// Command-line surface of `fsae-bootstrap`.

// Top-level parser, subcommands and their flags.
pub mod cmd_enums;
// Value enums accepted by subcommand flags.
pub mod type_enums;
