//! Installable completion scripts
//!
//! Each shell gets a small script that hands the line being completed to the
//! program (as `COMP_LINE`) and feeds whatever it prints back to the shell.
//! The templates are embedded at build time; `{pkgname}` and `{completer}`
//! are substituted per program.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::completion::Shell;
use crate::error::{Result, ScriptError};

/// Subcommand the generated script invokes when none is given
pub const DEFAULT_COMPLETER: &str = "completion";

const BASH_TEMPLATE: &str = include_str!("../../templates/completion.bash");
const ZSH_TEMPLATE: &str = include_str!("../../templates/completion.zsh");
const FISH_TEMPLATE: &str = include_str!("../../templates/completion.fish");

/// Raw template for a shell
pub fn template_for(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_TEMPLATE,
        Shell::Zsh => ZSH_TEMPLATE,
        Shell::Fish => FISH_TEMPLATE,
    }
}

/// Generate the completion script for a program
///
/// # Arguments
/// * `name` - Program the script completes
/// * `completer` - Subcommand of `name` that prints completions (default `completion`)
/// * `shell` - Target shell
///
/// # Returns
/// * `Result<String>` - Script text with `\n` line endings
pub fn generate_script(name: &str, completer: Option<&str>, shell: Shell) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ScriptError::EmptyName.into());
    }
    if name.contains(|c: char| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(ScriptError::InvalidName(name.to_string()).into());
    }

    let completer = completer
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COMPLETER);
    if completer.contains(['\n', '\r']) {
        return Err(ScriptError::InvalidCompleter(completer.to_string()).into());
    }

    Ok(template_for(shell)
        .replace("{pkgname}", name)
        .replace("{completer}", completer)
        .replace("\r\n", "\n"))
}

/// Write a script to `output`, or stdout when no path is given
pub fn write_script(script: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, script)?;
            info!(path = %path.display(), "wrote completion script");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(script.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
