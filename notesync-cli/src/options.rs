// ============================================================================
// notesync-cli/src/options.rs
// ============================================================================
//
// OPTION GROUPS: Reusable parameter sets attached to sync commands
//
// Each group is a declared signature plus a configuration step. The step
// receives only the values its own parameters were bound to and records the
// outcome in the shared run state, where the command body picks it up.
//
// KEY COMPONENTS:
// - browser_options: headless mode, page timeout, empty-source policy
// - provider_auth_options: authentication method and credentials for one
//   highlight provider
// - Provider: static description of a highlight provider

use std::sync::Arc;

use log::debug;
use notesync_core::{Arguments, Callable, CoreError, Parameter, Signature, TypeTag};
use serde::Deserialize;
use serde_json::Value;

use crate::config;
use crate::context::{AuthMethod, AuthState, BrowserSettings, SharedState, with_state};
use crate::error::{CliError, CliResult};

/// A service highlights are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    /// Command and state key, e.g. `ridibooks`.
    pub name: &'static str,
    /// Human-readable name used in help text.
    pub label: &'static str,
    /// Prefix of the provider's environment variables.
    pub env_prefix: &'static str,
    /// Readwise category the highlights are filed under.
    pub category: &'static str,
    pub about: &'static str,
}

pub const RIDIBOOKS: Provider = Provider {
    name: "ridibooks",
    label: "Ridibooks",
    env_prefix: "RIDI",
    category: "books",
    about: "Sync Ridibooks book notes to another service.",
};

pub const LONGBLACK: Provider = Provider {
    name: "longblack",
    label: "Longblack",
    env_prefix: "LONGBLACK",
    category: "articles",
    about: "Sync Longblack scraps (highlights) to another service.",
};

pub const PROVIDERS: [Provider; 2] = [RIDIBOOKS, LONGBLACK];

pub(crate) fn declare(parameters: Vec<Parameter>) -> CliResult<Signature> {
    Ok(Signature::new(parameters).map_err(CoreError::from)?)
}

pub(crate) fn bad_parameter(err: serde_json::Error) -> CliError {
    CliError::BadParameter(err.to_string())
}

pub fn browser_signature() -> CliResult<Signature> {
    declare(vec![
        Parameter::option("headless_mode")
            .annotated(TypeTag::Bool)
            .with_default(config::DEFAULT_HEADLESS_MODE)
            .env(config::HEADLESS_MODE_ENV)
            .help("Hide the browser window (headless mode)."),
        Parameter::option("browser_timeout_seconds")
            .annotated(TypeTag::Int)
            .with_default(config::DEFAULT_BROWSER_TIMEOUT_SECONDS)
            .env(config::BROWSER_TIMEOUT_SECONDS_ENV)
            .help("Timeout for browser page loading in seconds."),
        Parameter::option("error_on_empty_source")
            .annotated(TypeTag::Bool)
            .with_default(config::DEFAULT_ERROR_ON_EMPTY_SOURCE)
            .env(config::ERROR_ON_EMPTY_SOURCE_ENV)
            .help("Exit with exit code 2 if no article/book is found from the source."),
    ])
}

/// Browser option group: records the browser settings in the run state.
pub fn browser_options(state: &SharedState) -> CliResult<Callable<(), CliError>> {
    let state = Arc::clone(state);
    Ok(Callable::new(
        "browser_options",
        browser_signature()?,
        move |args: Arguments| {
            let settings: BrowserSettings = args.deserialize().map_err(bad_parameter)?;
            debug!("Browser settings: {:?}", settings);
            with_state(&state, |s| s.browser = Some(settings))
        },
    ))
}

pub fn auth_signature(provider: &Provider) -> CliResult<Signature> {
    let methods = AuthMethod::ALL.iter().map(|m| m.as_str().to_string()).collect();
    declare(vec![
        Parameter::option("auth_method")
            .annotated(TypeTag::Choice(methods))
            .with_default(AuthMethod::HeadlessBrowser.as_str())
            .env(format!("{}_AUTH_METHOD", provider.env_prefix))
            .help(format!("Authentication method to use with {}.", provider.label)),
        Parameter::option("user_id")
            .annotated(TypeTag::Str)
            .with_default(Value::Null)
            .env(format!("{}_USER_ID", provider.env_prefix))
            .help(format!("{} user ID.", provider.label)),
        Parameter::option("password")
            .annotated(TypeTag::Str)
            .with_default(Value::Null)
            .env(format!("{}_PASSWORD", provider.env_prefix))
            .help(format!("{} password.", provider.label)),
    ])
}

#[derive(Deserialize)]
struct AuthArgs {
    auth_method: AuthMethod,
    user_id: Option<String>,
    password: Option<String>,
}

/// Resolves the credentials a provider needs for the chosen method.
fn resolve_auth(args: AuthArgs) -> CliResult<AuthState> {
    let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

    match args.auth_method {
        AuthMethod::HeadlessBrowser => {
            if !present(&args.user_id) || !present(&args.password) {
                return Err(CliError::BadParameter(
                    "`user_id` and `password` must be provided.".to_string(),
                ));
            }
        }
    }

    Ok(AuthState {
        auth_method: args.auth_method,
        user_id: args.user_id,
        password: args.password,
    })
}

/// Provider authentication group: validates and records the credentials.
pub fn provider_auth_options(
    provider: &Provider,
    state: &SharedState,
) -> CliResult<Callable<(), CliError>> {
    let state = Arc::clone(state);
    let key = provider.name;
    Ok(Callable::new(
        format!("{}_auth_options", provider.name),
        auth_signature(provider)?,
        move |args: Arguments| {
            let auth = resolve_auth(args.deserialize().map_err(bad_parameter)?)?;
            debug!("Resolved {} auth with method {}", key, auth.auth_method);
            with_state(&state, |s| {
                s.auths.insert(key.to_string(), auth);
            })
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn auth_args() -> Arguments {
        Arguments::new()
            .with("auth_method", "headless_browser")
            .with("user_id", "reader")
            .with("password", "secret")
    }

    #[test]
    fn test_browser_options_record_settings() {
        let state = SharedState::default();
        let group = browser_options(&state).unwrap();

        group
            .call(
                Arguments::new()
                    .with("headless_mode", false)
                    .with("browser_timeout_seconds", 30)
                    .with("error_on_empty_source", true),
            )
            .unwrap();

        let browser = with_state(&state, |s| s.browser.clone()).unwrap();
        assert_eq!(
            browser,
            Some(BrowserSettings {
                headless_mode: false,
                browser_timeout_seconds: 30,
                error_on_empty_source: true,
            })
        );
    }

    #[test]
    fn test_browser_options_reject_negative_timeout() {
        let state = SharedState::default();
        let group = browser_options(&state).unwrap();

        let err = group
            .call(
                Arguments::new()
                    .with("headless_mode", true)
                    .with("browser_timeout_seconds", -1)
                    .with("error_on_empty_source", false),
            )
            .unwrap_err();

        assert!(matches!(err, CliError::BadParameter(_)));
    }

    #[test]
    fn test_auth_signature_uses_provider_env() {
        let signature = auth_signature(&LONGBLACK).unwrap();
        assert_eq!(
            signature.get("user_id").unwrap().env.as_deref(),
            Some("LONGBLACK_USER_ID")
        );
        assert_eq!(
            signature.get("auth_method").unwrap().default.value(),
            Some(&json!("headless_browser"))
        );
    }

    #[test]
    fn test_provider_auth_records_credentials() {
        let state = SharedState::default();
        let group = provider_auth_options(&RIDIBOOKS, &state).unwrap();

        group.call(auth_args()).unwrap();

        let auth = with_state(&state, |s| s.auths.get("ridibooks").cloned()).unwrap();
        let auth = auth.unwrap();
        assert_eq!(auth.user_id.as_deref(), Some("reader"));
        assert_eq!(auth.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_provider_auth_requires_credentials() {
        let state = SharedState::default();
        let group = provider_auth_options(&RIDIBOOKS, &state).unwrap();

        let missing_password = auth_args().with("password", Value::Null);
        let err = group.call(missing_password).unwrap_err();
        assert!(err.to_string().contains("`user_id` and `password` must be provided."));

        let empty_user = auth_args().with("user_id", "");
        assert!(group.call(empty_user).is_err());

        assert!(with_state(&state, |s| s.auths.is_empty()).unwrap());
    }

    #[test]
    fn test_provider_auth_rejects_unknown_method() {
        let state = SharedState::default();
        let group = provider_auth_options(&RIDIBOOKS, &state).unwrap();

        let err = group
            .call(auth_args().with("auth_method", "browser_cookie"))
            .unwrap_err();
        assert!(matches!(err, CliError::BadParameter(_)));
    }
}
