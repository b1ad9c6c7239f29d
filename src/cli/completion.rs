//! Shell completion for the tabtree binary itself
//!
//! Scripts come straight from clap_complete; tree-driven completion for other
//! programs lives in the `script` module.

use clap::CommandFactory;
use clap_complete::generate;
use std::io::Write;

use crate::cli::CliArgs;
use crate::completion::Shell;
use crate::error::Result;

/// Map a supported shell onto clap_complete's shell type
fn clap_shell(shell: Shell) -> clap_complete::Shell {
    match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
    }
}

/// Generate the completion script for `tabtree`
///
/// # Arguments
/// * `shell` - Target shell
/// * `out` - Where the script is written
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = CliArgs::command();
    generate(clap_shell(shell), &mut cmd, "tabtree", out);
    out.flush()?;
    Ok(())
}
