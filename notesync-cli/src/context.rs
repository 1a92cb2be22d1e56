//! Run-time state shared between option-group steps and command bodies.
//!
//! Option groups run before the command body and record what they resolved
//! here; the body then reads it back. One state value lives for one process.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Authentication methods a provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Log in through a browser session with a user id and password.
    HeadlessBrowser,
}

impl AuthMethod {
    pub const ALL: [AuthMethod; 1] = [AuthMethod::HeadlessBrowser];

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::HeadlessBrowser => "headless_browser",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials resolved for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub auth_method: AuthMethod,
    pub user_id: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

/// Browser automation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    pub headless_mode: bool,
    pub browser_timeout_seconds: u64,
    pub error_on_empty_source: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub browser: Option<BrowserSettings>,
    pub auths: BTreeMap<String, AuthState>,
}

/// Handle captured by every registered callable.
pub type SharedState = Arc<Mutex<RunState>>;

/// Runs `f` with exclusive access to the state.
pub fn with_state<T>(state: &SharedState, f: impl FnOnce(&mut RunState) -> T) -> CliResult<T> {
    let mut guard = state
        .lock()
        .map_err(|_| CliError::State("run state lock poisoned".to_string()))?;
    Ok(f(&mut guard))
}
