// notesync-cli/src/main.rs
//
// Entry point of the `notesync` binary.
//
// Responsibilities:
// - Composing the registered commands and rendering them into a clap app.
// - Parsing arguments and environment variables.
// - Setting up logging from the verbosity flags.
// - Dispatching into the selected command and reporting failures.
//
// The subcommand tree is rendered from composed commands, so one composition
// is needed before anything can be parsed. Logging is only installed after
// parsing, and the registry that runs is composed again once it is, so
// merge and composition logs reach the configured output.

use std::process;

use anyhow::Context;
use clap::FromArgMatches;
use notesync_cli::error::{EXIT_FAILURE, EXIT_USAGE};
use notesync_cli::{Cli, CliError, Registry, SharedState, build_app, logging, output, run};

fn main() {
    if let Err(e) = try_main() {
        output::print_error(format!("{e:#}"));
        let code = e
            .downcast_ref::<CliError>()
            .map_or(EXIT_FAILURE, CliError::exit_code);
        if code == EXIT_USAGE {
            eprintln!("\nFor more information, try '--help'.");
        }
        process::exit(code);
    }
}

fn try_main() -> anyhow::Result<()> {
    let state = SharedState::default();

    let matches = {
        let registry = Registry::standard(&state).context("failed to compose commands")?;
        build_app(&registry).get_matches()
    };
    let cli = Cli::from_arg_matches(&matches)?;
    logging::init(cli.verbose);

    let registry = Registry::standard(&state).context("failed to compose commands")?;
    run(&cli, &registry, &state, &matches)?;
    Ok(())
}
