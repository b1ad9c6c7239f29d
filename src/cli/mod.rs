//! Command-line interface for tabtree
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Dispatching subcommands (complete, script, shell, config, ...)

pub mod completion;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::completion::{Completions, CompletionUnit, Shell};
use crate::config::{Config, LogLevel};
use crate::error::{Result, ShellError, TabtreeError};
use crate::grammar::Grammar;
use crate::script::{generate_script, write_script};
use crate::shell::{detect_shell, detect_shell_from_env};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV_VAR: &str = "TABTREE_LOG";

/// Tabtree - tree-driven shell tab completion
#[derive(Parser, Debug)]
#[command(
    name = "tabtree",
    version,
    about = "Tree-driven tab completion for bash, zsh and fish",
    long_about = "Completes command lines from a JSON grammar describing subcommands, flags,
flag types and aliases, and generates the shell scripts that wire it up.",
    arg_required_else_help = true
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "very-verbose", alias = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for tabtree
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print completions for a command line
    Complete {
        /// Shell the output is formatted for (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,

        /// Grammar file (JSON)
        #[arg(short, long, value_name = "FILE")]
        grammar: PathBuf,

        /// Line to complete; read from the configured variable when omitted
        #[arg(short, long, value_name = "LINE", allow_hyphen_values = true)]
        line: Option<String>,

        /// Extra candidate appended to the tree's own
        #[arg(short, long, value_name = "NAME[:DESC]")]
        extra: Vec<String>,

        /// Print the values parsed from the line to stderr as JSON
        #[arg(long)]
        dump_values: bool,
    },

    /// Generate an installable completion script for a program
    Script {
        /// Program the script completes
        #[arg(value_name = "NAME")]
        name: String,

        /// Subcommand of NAME that prints completions
        #[arg(long, value_name = "SUB")]
        completer: Option<String>,

        /// Target shell (detected from SHELL when omitted)
        #[arg(short, long, value_name = "SHELL")]
        shell: Option<String>,

        /// Write the script to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the detected shell
    Shell {
        /// Shell name or path; SHELL is used when omitted
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,

    /// Generate the completion script for tabtree itself
    Completions {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_logging_args(&mut config, args);

        Ok(config)
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Pick the tracing filter directive
    ///
    /// Verbosity flags win over the `TABTREE_LOG` value, which wins over
    /// the configured level.
    ///
    /// # Arguments
    /// * `env_filter` - Value of `TABTREE_LOG`, if set
    pub fn log_directive(&self, env_filter: Option<&str>) -> String {
        let forced = self.args.very_verbose || self.args.verbose || self.args.quiet;
        match env_filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(filter) if !forced => filter.to_string(),
            _ => self.config.logging.level.as_str().to_string(),
        }
    }

    /// Handle the parsed subcommand
    pub fn handle_command(&self) -> Result<()> {
        match &self.args.command {
            Commands::Complete {
                shell,
                grammar,
                line,
                extra,
                dump_values,
            } => {
                let shell: Shell = shell.parse()?;
                let completions = self.complete(shell, grammar, line.as_deref(), extra)?;
                if *dump_values {
                    let json = serde_json::to_string(&completions.values)
                        .map_err(|e| TabtreeError::Generic(e.to_string()))?;
                    eprintln!("{json}");
                }
                let mut stdout = io::stdout().lock();
                write!(stdout, "{}", completions.output)?;
                stdout.flush()?;
                Ok(())
            }
            Commands::Script {
                name,
                completer,
                shell,
                output,
            } => {
                let shell = self.resolve_shell_from_env(shell.as_deref())?;
                let completer = completer
                    .as_deref()
                    .unwrap_or(&self.config.completion.completer);
                let script = generate_script(name, Some(completer), shell)?;
                write_script(&script, output.as_deref())
            }
            Commands::Shell { name } => {
                println!("{}", self.resolve_shell_from_env(name.as_deref())?);
                Ok(())
            }
            Commands::Config { show, validate } => {
                self.handle_config_command(*show, *validate)
            }
            Commands::Version => {
                self.show_version();
                Ok(())
            }
            Commands::Completions { shell } => {
                let shell: Shell = shell.parse()?;
                completion::generate_completion(shell, &mut io::stdout().lock())
            }
        }
    }

    /// Run the engine for one line
    ///
    /// # Arguments
    /// * `shell` - Output shell
    /// * `grammar` - Grammar file path
    /// * `line` - Line to complete, or `None` to read the configured variable
    /// * `extra` - `NAME[:DESC]` specs of extra candidates
    ///
    /// # Returns
    /// * `Result<Completions>` - Output and parsed values
    pub fn complete(
        &self,
        shell: Shell,
        grammar: &Path,
        line: Option<&str>,
        extra: &[String],
    ) -> Result<Completions> {
        let engine = Grammar::load(grammar)?.into_engine();
        let extra: Vec<CompletionUnit> =
            extra.iter().map(|spec| CompletionUnit::parse_spec(spec)).collect();

        let completions = match line {
            Some(line) => engine.next_completions(shell, line, &extra),
            None => {
                let var = &self.config.completion.line_var;
                debug!(var = %var, "reading line from environment");
                engine.next_completions_from_env(shell, var, &extra)
            }
        };
        Ok(completions)
    }

    /// Pick the shell: explicit name, then `SHELL`, then the configured default
    ///
    /// # Arguments
    /// * `explicit` - Shell name given on the command line
    /// * `env_shell` - Value of `SHELL`, if set
    pub fn resolve_shell(&self, explicit: Option<&str>, env_shell: Option<&str>) -> Result<Shell> {
        self.or_default_shell(detect_shell(explicit, env_shell))
    }

    fn resolve_shell_from_env(&self, explicit: Option<&str>) -> Result<Shell> {
        self.or_default_shell(detect_shell_from_env(explicit))
    }

    /// Replace an undetectable shell with the configured default, if any
    fn or_default_shell(&self, detected: Result<Shell>) -> Result<Shell> {
        match detected {
            Err(TabtreeError::Shell(ShellError::Undetectable)) => self
                .config
                .default_shell()
                .ok_or_else(|| ShellError::Undetectable.into()),
            other => other,
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("tabtree version {}", crate::VERSION);
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        println!("# Configuration file: {}", self.get_config_path().display());
        println!();
        print!("{}", self.config.to_toml_string()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}
