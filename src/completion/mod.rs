//! Shell completion engine
//!
//! Given the partially-typed command line a shell is completing, this module
//! answers "what could come next": subcommands, flag names or flag values,
//! formatted for the invoking shell.
//!
//! # Architecture
//!
//! - **tree**: The command grammar as a tagged tree (branch / list / literal)
//! - **flags**: Flag types and aliases
//! - **line**: Splits the line and classifies each word
//! - **values**: Flag values accumulated while classifying
//! - **render**: Shell-specific output formats
//! - **engine**: Orchestrates the whole flow
//!
//! # Examples
//!
//! ```
//! use tabtree::completion::{Aliases, ArgType, CompletionEngine, CompletionNode, Shell, ShellOutput};
//!
//! let tree = CompletionNode::branch()
//!     .with_child("start", CompletionNode::branch().with_description("Start the service"))
//!     .with_child("stop", CompletionNode::branch().with_description("Stop the service"));
//! let engine = CompletionEngine::new(tree, Aliases::default(), [("--port", ArgType::Number)]);
//!
//! let completions = engine.next_completions(Shell::Zsh, "svc ", &[]);
//! assert_eq!(
//!     completions.output,
//!     ShellOutput::Lines(vec![
//!         "start:Start the service".to_string(),
//!         "stop:Stop the service".to_string(),
//!     ])
//! );
//! ```

mod engine;
mod flags;
mod line;
mod render;
mod tree;
mod values;

pub use engine::{Candidates, CompletionEngine, Completions, DEFAULT_LINE_VAR, ShellOutput};
pub use flags::{Aliases, ArgType, DEFAULT_TYPE, FlagTypes, ScalarType};
pub use line::{LineParser, ParsedLine};
pub use render::{CompletionUnit, Shell, filter_prefix, render};
pub use tree::{ANY_FLAG, CompletionNode, DESC_KEY, OPTS_KEY};
pub use values::{ArgValue, ArgValues, REMAINDER_KEY, parse_number};
