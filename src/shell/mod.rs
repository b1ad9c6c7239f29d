//! Shell detection
//!
//! Resolves which shell completions are produced for: an explicit name wins,
//! otherwise the `SHELL` environment variable is used. Either may be a full
//! path (`/usr/bin/zsh`); only the last path component is considered.

use tracing::debug;

use crate::completion::Shell;
use crate::error::{Result, ShellError};

/// Environment variable consulted when no shell is given
pub const SHELL_VAR: &str = "SHELL";

/// Pick the shell from an explicit name or the `SHELL` value
///
/// # Arguments
/// * `explicit` - Shell name given by the user, if any
/// * `env_shell` - Value of the `SHELL` environment variable, if set
///
/// # Returns
/// * `Result<Shell>` - Detected shell, or why none could be picked
pub fn detect_shell(explicit: Option<&str>, env_shell: Option<&str>) -> Result<Shell> {
    let chosen = explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| env_shell.map(str::trim).filter(|s| !s.is_empty()))
        .ok_or(ShellError::Undetectable)?;

    let name = basename(chosen);
    let shell = name.parse::<Shell>()?;
    debug!(input = chosen, %shell, "detected shell");
    Ok(shell)
}

/// [`detect_shell`] reading `SHELL` from the process environment
pub fn detect_shell_from_env(explicit: Option<&str>) -> Result<Shell> {
    let env_shell = std::env::var(SHELL_VAR).ok();
    detect_shell(explicit, env_shell.as_deref())
}

/// Last non-empty component of a `/` or `\` separated path, so a
/// trailing separator is ignored
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
}
