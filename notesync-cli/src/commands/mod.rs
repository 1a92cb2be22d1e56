//! Command implementations for the CLI.
//!
//! `run` routes parsed matches either to `inspect` or to the registered
//! composed command they resolve to.

/// Module containing the `inspect` command, which prints merged signatures.
pub mod inspect;

/// Module containing the `sync <provider> readwise` commands.
pub mod sync;

use clap::ArgMatches;
use log::info;

use crate::cli::{Cli, INSPECT};
use crate::config::expand_home;
use crate::context::{SharedState, with_state};
use crate::error::{CliError, CliResult};
use crate::output;
use crate::registry::Registry;
use crate::render;

/// Runs the command selected by `matches`.
pub fn run(cli: &Cli, registry: &Registry, state: &SharedState, matches: &ArgMatches) -> CliResult<()> {
    with_state(state, |s| {
        s.config_dir = expand_home(&cli.config_dir);
        s.cache_dir = expand_home(&cli.cache_dir);
    })?;

    if let Some((INSPECT, sub)) = matches.subcommand() {
        let path: Vec<&str> = sub
            .get_many::<String>("path")
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        let entry = registry
            .find(&path)
            .ok_or_else(|| CliError::UnknownCommand(path.join(" ")))?;
        return inspect::run(entry, cli.json);
    }

    let (entry, leaf) = registry
        .resolve(matches)
        .ok_or_else(|| CliError::UnknownCommand(subcommand_path(matches)))?;

    let args = render::arguments(leaf, entry.command.signature());
    info!(
        "Running `{}` with {} supplied option(s)",
        entry.path.join(" "),
        args.len()
    );
    let plan = entry.command.invoke(&args)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        output::print_plan(&plan);
    }
    Ok(())
}

fn subcommand_path(matches: &ArgMatches) -> String {
    let mut names = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        names.push(name);
        current = sub;
    }
    names.join(" ")
}
