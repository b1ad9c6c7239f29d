use std::{fmt, io};

/// Crate-wide `Result` type using [`TabtreeError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, TabtreeError>;

/// Top-level error type for tabtree operations.
///
/// The completion engine itself never fails; these errors come from the
/// collaborators around it (grammar loading, shell detection, script
/// generation, configuration).
#[derive(Debug)]
pub enum TabtreeError {
    /// Shell detection or validation errors.
    Shell(ShellError),

    /// Grammar file errors.
    Grammar(GrammarError),

    /// Completion script generation errors.
    Script(ScriptError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Shell detection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// No shell was given and `SHELL` is unset or empty.
    Undetectable,

    /// Shell name is not one of the supported shells.
    Unsupported(String),
}

/// Grammar loading errors.
#[derive(Debug)]
pub enum GrammarError {
    /// Grammar file could not be read.
    Read { path: String, source: io::Error },

    /// Grammar document is not valid JSON or has the wrong shape.
    Syntax(String),

    /// A tree node has a value that is neither object, array nor string.
    InvalidNode { path: String, found: String },

    /// Unknown flag type name.
    UnknownType { flag: String, name: String },
}

/// Script generation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Program name is empty.
    EmptyName,

    /// Program name contains whitespace or a path separator.
    InvalidName(String),

    /// Completer subcommand contains a line break.
    InvalidCompleter(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for TabtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabtreeError::Shell(e) => write!(f, "{e}"),
            TabtreeError::Grammar(e) => write!(f, "Grammar error: {e}"),
            TabtreeError::Script(e) => write!(f, "Script error: {e}"),
            TabtreeError::Config(e) => write!(f, "Configuration error: {e}"),
            TabtreeError::Io(e) => write!(f, "I/O error: {e}"),
            TabtreeError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Undetectable => write!(
                f,
                "Cannot detect SHELL; provide shell manually or set SHELL environment variable"
            ),
            ShellError::Unsupported(name) => write!(
                f,
                "Unrecognized SHELL {name}. Only 'bash', 'zsh', 'fish' are supported"
            ),
        }
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Read { path, source } => {
                write!(f, "Failed to read grammar file {path}: {source}")
            }
            GrammarError::Syntax(msg) => write!(f, "Invalid grammar document: {msg}"),
            GrammarError::InvalidNode { path, found } => write!(
                f,
                "Invalid tree node at '{path}': expected object, array or string, found {found}"
            ),
            GrammarError::UnknownType { flag, name } => {
                write!(f, "Unknown type '{name}' for flag '{flag}'")
            }
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::EmptyName => write!(f, "Program name must not be empty"),
            ScriptError::InvalidName(name) => write!(f, "Invalid program name: '{name}'"),
            ScriptError::InvalidCompleter(name) => {
                write!(f, "Invalid completer subcommand: '{name}'")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for TabtreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabtreeError::Io(e) => Some(e),
            TabtreeError::Grammar(GrammarError::Read { source, .. }) => Some(source),
            _ => None,
        }
    }
}
impl std::error::Error for ShellError {}
impl std::error::Error for GrammarError {}
impl std::error::Error for ScriptError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to TabtreeError ========================= */

impl From<io::Error> for TabtreeError {
    fn from(err: io::Error) -> Self {
        TabtreeError::Io(err)
    }
}

impl From<ShellError> for TabtreeError {
    fn from(err: ShellError) -> Self {
        TabtreeError::Shell(err)
    }
}

impl From<GrammarError> for TabtreeError {
    fn from(err: GrammarError) -> Self {
        TabtreeError::Grammar(err)
    }
}

impl From<ScriptError> for TabtreeError {
    fn from(err: ScriptError) -> Self {
        TabtreeError::Script(err)
    }
}

impl From<ConfigError> for TabtreeError {
    fn from(err: ConfigError) -> Self {
        TabtreeError::Config(err)
    }
}

impl From<String> for TabtreeError {
    fn from(msg: String) -> Self {
        TabtreeError::Generic(msg)
    }
}

impl From<&str> for TabtreeError {
    fn from(msg: &str) -> Self {
        TabtreeError::Generic(msg.to_owned())
    }
}
