//! Tabtree - tree-driven shell tab completion
//!
//! A CLI author describes their command as a tree of subcommands, flag
//! value lists and descriptions. Given the partially typed command line a
//! shell hands over on TAB, tabtree works out where in the tree the user is
//! and prints what may come next, formatted for bash, zsh or fish.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Line classification, tree resolution and rendering
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `grammar`: JSON grammar files
//! - `script`: Installable completion scripts
//! - `shell`: Shell detection
//!
//! # Example
//!
//! ```
//! use tabtree::{Grammar, Shell};
//!
//! let grammar = Grammar::from_json_str(
//!     r#"{ "tree": { "build": {}, "bench": {}, "test": {} } }"#,
//! )?;
//! let engine = grammar.into_engine();
//!
//! let completions = engine.next_completions(Shell::Bash, "cargo b", &[]);
//! assert_eq!(completions.output.to_string(), "build\nbench\n");
//! # Ok::<(), tabtree::error::GrammarError>(())
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod grammar;
pub mod script;
pub mod shell;

// Re-export commonly used types
pub use completion::{CompletionEngine, CompletionNode, Completions, Shell, ShellOutput};
pub use config::Config;
pub use error::{Result, TabtreeError};
pub use grammar::Grammar;
pub use script::generate_script;
pub use shell::detect_shell;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
