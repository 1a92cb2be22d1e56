// notesync-cli/src/lib.rs
//
// Library portion of the notesync CLI application.
// Contains the option groups, signature rendering and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod options;
pub mod output;
pub mod registry;
pub mod render;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, build_app};
pub use commands::run;
pub use context::SharedState;
pub use error::{CliError, CliResult};
pub use registry::Registry;
