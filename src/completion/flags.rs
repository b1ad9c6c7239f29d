//! Flag types and aliases
//!
//! The type map decides how many line tokens a flag consumes and how its value
//! is coerced. Flags missing from the map fall back to [`DEFAULT_TYPE`].
//! Aliases are resolved eagerly: once a [`FlagTypes`] is built against an
//! [`Aliases`] map, looking up an alias yields its canonical flag's type.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Element type of a list-valued flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Number,
}

/// How a flag consumes tokens from the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArgType {
    /// Presence flag, consumes nothing
    Boolean,
    /// Consumes the next token as a string
    String,
    /// Consumes the next token as a number
    Number,
    /// Repeatable, each occurrence increments a counter (`-v`, `-vvv`)
    Count,
    /// Consumes comma-separated values; numbers may also be space-separated
    ListOf(ScalarType),
}

/// Type assumed for a flag that is not in the type map
pub const DEFAULT_TYPE: ArgType = ArgType::Boolean;

impl ArgType {
    /// Whether the flag expects a value after it
    pub fn takes_value(&self) -> bool {
        matches!(self, ArgType::String | ArgType::Number | ArgType::ListOf(_))
    }

    /// Type name as written in grammar files
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgType::Boolean => "boolean",
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Count => "count",
            ArgType::ListOf(ScalarType::String) => "string[]",
            ArgType::ListOf(ScalarType::Number) => "number[]",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" | "bool" => Ok(ArgType::Boolean),
            "string" => Ok(ArgType::String),
            "number" => Ok(ArgType::Number),
            "count" => Ok(ArgType::Count),
            "string[]" => Ok(ArgType::ListOf(ScalarType::String)),
            "number[]" => Ok(ArgType::ListOf(ScalarType::Number)),
            _ => Err(s.to_string()),
        }
    }
}

impl TryFrom<String> for ArgType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArgType> for String {
    fn from(value: ArgType) -> Self {
        value.as_str().to_string()
    }
}

/// Alias token -> canonical token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    to_canonical: BTreeMap<String, String>,
    /// Canonical token -> its aliases, sorted
    by_canonical: BTreeMap<String, Vec<String>>,
}

impl Aliases {
    /// Build the alias map. Aliases resolve one hop; an alias of an alias is
    /// not followed.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let to_canonical: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.into(), canonical.into()))
            .collect();

        let mut by_canonical: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (alias, canonical) in &to_canonical {
            by_canonical
                .entry(canonical.clone())
                .or_default()
                .push(alias.clone());
        }

        Self {
            to_canonical,
            by_canonical,
        }
    }

    /// Canonical spelling of `token` (the token itself when it is no alias)
    pub fn canonical<'a>(&'a self, token: &'a str) -> &'a str {
        self.to_canonical
            .get(token)
            .map(String::as_str)
            .unwrap_or(token)
    }

    /// First alias (in sorted order) of a canonical token, used as a display hint
    pub fn hint_for(&self, canonical: &str) -> Option<&str> {
        self.by_canonical
            .get(canonical)
            .and_then(|aliases| aliases.first())
            .map(String::as_str)
    }

    /// Iterate over `(alias, canonical)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.to_canonical
            .iter()
            .map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.to_canonical.is_empty()
    }
}

/// Flag token -> declared type, alias-patched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTypes {
    declared: BTreeMap<String, ArgType>,
}

impl FlagTypes {
    /// Build the type map and copy each canonical flag's type onto its
    /// aliases. An alias whose canonical flag is untyped gets [`DEFAULT_TYPE`].
    pub fn new<I, K>(types: I, aliases: &Aliases) -> Self
    where
        I: IntoIterator<Item = (K, ArgType)>,
        K: Into<String>,
    {
        let mut declared: BTreeMap<String, ArgType> = types
            .into_iter()
            .map(|(flag, ty)| (flag.into(), ty))
            .collect();

        for (alias, canonical) in aliases.iter() {
            let ty = declared.get(canonical).copied().unwrap_or(DEFAULT_TYPE);
            declared.insert(alias.to_string(), ty);
        }

        Self { declared }
    }

    /// Declared type of `flag`, if any
    pub fn declared(&self, flag: &str) -> Option<ArgType> {
        self.declared.get(flag).copied()
    }

    /// Type of `flag`, falling back to [`DEFAULT_TYPE`]
    pub fn get(&self, flag: &str) -> ArgType {
        self.declared(flag).unwrap_or(DEFAULT_TYPE)
    }

    pub fn is_declared(&self, flag: &str) -> bool {
        self.declared.contains_key(flag)
    }
}
