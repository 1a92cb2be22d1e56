// ============================================================================
// notesync-cli/src/registry.rs
// ============================================================================
//
// COMMAND REGISTRY: Composed commands and the subcommand tree around them
//
// Every registered command lives at a path of subcommand names, for example
// `sync ridibooks readwise`. Intermediate names become clap group commands
// that only hold subcommands; the last name is rendered from the command's
// merged signature.

use clap::{ArgMatches, Command};
use notesync_core::Composed;

use crate::commands::sync::{SyncPlan, compose_readwise};
use crate::context::SharedState;
use crate::error::{CliError, CliResult};
use crate::options::PROVIDERS;
use crate::render;

pub const SYNC_GROUP: &str = "sync";

/// A composed command registered under a subcommand path.
#[derive(Debug)]
pub struct Entry {
    pub path: Vec<&'static str>,
    pub about: String,
    pub command: Composed<SyncPlan, CliError>,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sync command, one per provider.
    pub fn standard(state: &SharedState) -> CliResult<Self> {
        let mut registry = Self::new();
        for provider in &PROVIDERS {
            registry.register(
                vec![SYNC_GROUP, provider.name, "readwise"],
                format!("Sync {} highlights to Readwise.", provider.label),
                compose_readwise(provider, state)?,
            );
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        path: Vec<&'static str>,
        about: impl Into<String>,
        command: Composed<SyncPlan, CliError>,
    ) {
        self.entries.push(Entry {
            path,
            about: about.into(),
            command,
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn find(&self, path: &[&str]) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    /// Clap subcommands for every registered path.
    pub fn subcommands(&self) -> Vec<Command> {
        let entries: Vec<&Entry> = self.entries.iter().collect();
        level(&entries, 0)
    }

    /// Follows the subcommand chain of `matches` down to a registered
    /// command and returns it with the matches of its own arguments.
    pub fn resolve<'m>(&self, matches: &'m ArgMatches) -> Option<(&Entry, &'m ArgMatches)> {
        let mut path = Vec::new();
        let mut current = matches;
        while let Some((name, sub)) = current.subcommand() {
            path.push(name);
            current = sub;
        }
        self.find(&path).map(|entry| (entry, current))
    }
}

fn group_about(name: &str) -> String {
    if name == SYNC_GROUP {
        return "Sync highlights from a source to a destination.".to_string();
    }
    PROVIDERS
        .iter()
        .find(|provider| provider.name == name)
        .map_or_else(|| format!("{name} commands."), |provider| provider.about.to_string())
}

fn level(entries: &[&Entry], depth: usize) -> Vec<Command> {
    let mut names: Vec<&'static str> = Vec::new();
    for entry in entries {
        if let Some(name) = entry.path.get(depth) {
            if !names.contains(name) {
                names.push(*name);
            }
        }
    }

    names
        .into_iter()
        .map(|name| {
            let children: Vec<&Entry> = entries
                .iter()
                .copied()
                .filter(|entry| entry.path.get(depth) == Some(&name))
                .collect();

            match children.as_slice() {
                [leaf] if leaf.path.len() == depth + 1 => {
                    render::command(name, &leaf.about, leaf.command.merged_signature())
                }
                _ => Command::new(name)
                    .about(group_about(name))
                    .subcommand_required(true)
                    .arg_required_else_help(true)
                    .subcommands(level(&children, depth + 1)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(registry: &Registry) -> Command {
        Command::new("notesync").subcommands(registry.subcommands())
    }

    #[test]
    fn test_standard_registers_every_provider() {
        let state = SharedState::default();
        let registry = Registry::standard(&state).unwrap();

        assert!(registry.find(&["sync", "ridibooks", "readwise"]).is_some());
        assert!(registry.find(&["sync", "longblack", "readwise"]).is_some());
        assert!(registry.find(&["sync", "ridibooks"]).is_none());
        assert_eq!(registry.entries().len(), 2);
    }

    #[test]
    fn test_subcommand_tree_shape() {
        let state = SharedState::default();
        let registry = Registry::standard(&state).unwrap();
        let commands = registry.subcommands();

        assert_eq!(commands.len(), 1);
        let sync = &commands[0];
        assert_eq!(sync.get_name(), "sync");
        assert!(sync.is_subcommand_required_set());

        let providers: Vec<_> = sync.get_subcommands().map(|c| c.get_name()).collect();
        assert_eq!(providers, vec!["ridibooks", "longblack"]);

        let ridibooks = sync.find_subcommand("ridibooks").unwrap();
        let readwise = ridibooks.find_subcommand("readwise").unwrap();
        assert!(readwise.get_arguments().any(|a| a.get_id() == "readwise_token"));
    }

    #[test]
    fn test_resolve_returns_leaf_matches() {
        let state = SharedState::default();
        let registry = Registry::standard(&state).unwrap();

        let matches = app(&registry)
            .try_get_matches_from([
                "notesync",
                "sync",
                "longblack",
                "readwise",
                "--readwise-token",
                "t",
            ])
            .unwrap();

        let (entry, leaf) = registry.resolve(&matches).unwrap();
        assert_eq!(entry.path, vec!["sync", "longblack", "readwise"]);
        assert_eq!(leaf.get_one::<String>("readwise_token").map(String::as_str), Some("t"));
    }

    #[test]
    fn test_group_without_subcommand_is_rejected() {
        let state = SharedState::default();
        let registry = Registry::standard(&state).unwrap();

        let err = app(&registry)
            .try_get_matches_from(["notesync", "sync", "ridibooks"])
            .unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }
}
