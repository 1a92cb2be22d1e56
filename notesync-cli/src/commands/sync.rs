// ============================================================================
// notesync-cli/src/commands/sync.rs
// ============================================================================
//
// SYNC COMMANDS: `sync <provider> readwise`
//
// The command body declares only its own parameters (the Readwise token and
// tags). Browser and provider credentials come from the option groups
// composed in front of it, which leave their results in the run state.
//
// The body resolves everything the scraping and upload clients need into a
// SyncPlan. Running those clients happens outside this crate.

use std::path::PathBuf;
use std::sync::Arc;

use notesync_core::{Arguments, Callable, ComposeBuilder, Composed, Parameter, Signature, TypeTag};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config;
use crate::context::{AuthMethod, BrowserSettings, SharedState, with_state};
use crate::error::{CliError, CliErrorContext, CliResult};
use crate::options::{Provider, bad_parameter, browser_options, declare, provider_auth_options};

pub const READWISE: &str = "readwise";

/// Everything resolved for one sync run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncPlan {
    pub source: String,
    pub destination: String,
    pub category: String,
    pub auth_method: AuthMethod,
    pub user_id: Option<String>,
    pub browser: BrowserSettings,
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub tags: Vec<String>,
    /// Masked destination token.
    pub readwise_token: String,
}

pub fn readwise_signature() -> CliResult<Signature> {
    declare(vec![
        Parameter::option("readwise_token")
            .annotated(TypeTag::Str)
            .env(config::READWISE_TOKEN_ENV)
            .help("Readwise.io API token. https://readwise.io/access_token"),
        Parameter::option("tags")
            .annotated(TypeTag::List(Box::new(TypeTag::Str)))
            .with_default(json!([]))
            .help("Tags to attach to the highlights. Multiple tags can be provided."),
    ])
}

#[derive(Deserialize)]
struct ReadwiseArgs {
    readwise_token: String,
    tags: Vec<String>,
}

/// Keeps the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// The command body of `sync <provider> readwise`.
pub fn readwise_command(
    provider: &Provider,
    state: &SharedState,
) -> CliResult<Callable<SyncPlan, CliError>> {
    let state = Arc::clone(state);
    let provider = *provider;
    Ok(Callable::new(
        READWISE,
        readwise_signature()?,
        move |args: Arguments| {
            let args: ReadwiseArgs = args.deserialize().map_err(bad_parameter)?;
            with_state(&state, |s| -> CliResult<SyncPlan> {
                let browser = s
                    .browser
                    .clone()
                    .cli_context("browser options were not applied")?;
                let auth = s
                    .auths
                    .get(provider.name)
                    .cli_context(format!("no credentials recorded for {}", provider.name))?;

                Ok(SyncPlan {
                    source: provider.name.to_string(),
                    destination: READWISE.to_string(),
                    category: provider.category.to_string(),
                    auth_method: auth.auth_method,
                    user_id: auth.user_id.clone(),
                    browser,
                    config_dir: s.config_dir.clone(),
                    cache_dir: s.cache_dir.clone(),
                    tags: args.tags,
                    readwise_token: mask_secret(&args.readwise_token),
                })
            })?
        },
    ))
}

/// Composes `sync <provider> readwise` from its body and option groups.
pub fn compose_readwise(
    provider: &Provider,
    state: &SharedState,
) -> CliResult<Composed<SyncPlan, CliError>> {
    let composed = ComposeBuilder::new(readwise_command(provider, state)?)
        .extra(browser_options(state)?)
        .extra(provider_auth_options(provider, state)?)
        .build()?;
    Ok(composed)
}
