// notesync-cli/src/cli.rs
//
// Defines the global command-line arguments using clap. The subcommands are
// not derived: they are rendered at startup from the registered composed
// commands and attached in `build_app`.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, CommandFactory, Parser};

use crate::config;
use crate::registry::Registry;

pub const INSPECT: &str = "inspect";

#[derive(Parser, Debug)]
#[command(
    name = "notesync",
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Notesync: Sync book and article highlights",
    long_about = "Collects highlights from reading services and prepares them for Readwise."
)]
pub struct Cli {
    /// Directory holding configuration files
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = config::CONFIG_DIR_ENV,
        default_value = config::DEFAULT_CONFIG_DIR
    )]
    pub config_dir: PathBuf,

    /// Directory for cached data such as browser sessions
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = config::CACHE_DIR_ENV,
        default_value = config::DEFAULT_CACHE_DIR
    )]
    pub cache_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

fn inspect_command() -> Command {
    Command::new(INSPECT)
        .about("Show the merged options of a command, with the groups that declared them.")
        .arg(
            Arg::new("path")
                .value_name("COMMAND")
                .num_args(1..)
                .required(true)
                .help("Command path, e.g. `sync ridibooks readwise`"),
        )
}

/// The full application: global arguments, the registered subcommand tree
/// and `inspect`.
pub fn build_app(registry: &Registry) -> Command {
    Cli::command()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(registry.subcommands())
        .subcommand(inspect_command())
}
