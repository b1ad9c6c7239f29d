//! Error handling for tabtree.
//!
//! The completion core is fail-soft and never produces these errors: an
//! unknown token simply yields no candidates. Errors only come from the
//! surrounding collaborators:
//! - Shell detection and validation
//! - Grammar file loading
//! - Completion script generation
//! - Configuration loading
//!
//! # Example
//!
//! ```rust
//! use tabtree::error::{Result, ShellError};
//!
//! fn pick(name: &str) -> Result<()> {
//!     if name != "bash" {
//!         return Err(ShellError::Unsupported(name.to_string()).into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(pick("tcsh").is_err());
//! ```

pub mod kinds;

pub use kinds::{ConfigError, GrammarError, Result, ScriptError, ShellError, TabtreeError};
