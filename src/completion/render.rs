//! Shell-specific rendering of completion candidates
//!
//! Each supported shell expects candidates on stdout, one per line:
//! - bash: the bare word; bash does no filtering of its own, so the caller
//!   keeps only words starting with the partial word
//! - zsh: `name:description`, colons escaped as `\:`
//! - fish: `name<TAB>description`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShellError;

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Bash, Shell::Zsh, Shell::Fish];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }

    /// Whether the caller must prefix-filter candidates for this shell
    pub fn needs_prefix_filter(&self) -> bool {
        matches!(self, Shell::Bash)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shell {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            other => Err(ShellError::Unsupported(other.to_string())),
        }
    }
}

/// One completion candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUnit {
    /// Text inserted on the command line
    pub name: String,
    /// Text shown next to the candidate, where the shell supports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate spelling of `name`. Carried for display; no shell renders it yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl CompletionUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Parse `name` or `name:description`
    pub fn parse_spec(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((name, desc)) if !desc.is_empty() => Self::new(name).with_description(desc),
            Some((name, _)) => Self::new(name),
            None => Self::new(spec),
        }
    }

    fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Render candidates in input order, one line each
pub fn render(shell: Shell, units: &[CompletionUnit]) -> Vec<String> {
    units.iter().map(|unit| render_unit(shell, unit)).collect()
}

fn render_unit(shell: Shell, unit: &CompletionUnit) -> String {
    match shell {
        Shell::Bash => unit.name.clone(),
        Shell::Zsh => match unit.description_text() {
            Some(desc) => format!("{}:{}", escape_zsh(&unit.name), escape_zsh(desc)),
            None => escape_zsh(&unit.name),
        },
        Shell::Fish => match unit.description_text() {
            Some(desc) => format!("{}\t{}", unit.name, desc),
            None => unit.name.clone(),
        },
    }
}

fn escape_zsh(text: &str) -> String {
    text.replace(':', "\\:")
}

/// Keep lines starting with `partial` (byte-wise, case-sensitive)
pub fn filter_prefix(lines: Vec<String>, partial: &str) -> Vec<String> {
    if partial.is_empty() {
        return lines;
    }
    lines
        .into_iter()
        .filter(|line| line.starts_with(partial))
        .collect()
}
