//! Accumulated argument values
//!
//! Values collected while classifying a line. A fresh [`ArgValues`] is built
//! for every completion request and handed back to the caller; the engine
//! never keeps one between calls.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Key under which the positional remainder is reported
pub const REMAINDER_KEY: &str = "_";

/// A parsed flag value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Str(String),
    Num(f64),
    Count(u32),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Coerce a token to a number; unparsable input becomes `0`
    pub fn number(token: &str) -> Self {
        ArgValue::Num(parse_number(token).unwrap_or(0.0))
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            ArgValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a token as a number the way a command line would write it
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Flag values plus the positional remainder, for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgValues {
    flags: BTreeMap<String, ArgValue>,
    positional: Vec<String>,
}

impl ArgValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value recorded for a canonical flag
    pub fn get(&self, flag: &str) -> Option<&ArgValue> {
        self.flags.get(flag)
    }

    /// Positional words, in line order
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.positional.is_empty()
    }

    /// Record a single value, replacing any earlier one
    pub fn set(&mut self, flag: &str, value: ArgValue) {
        self.flags.insert(flag.to_string(), value);
    }

    /// Add `by` to a flag's counter. A non-count value is replaced.
    pub fn increment(&mut self, flag: &str, by: u32) {
        let entry = self
            .flags
            .entry(flag.to_string())
            .or_insert(ArgValue::Count(0));
        match entry {
            ArgValue::Count(n) => *n = n.saturating_add(by),
            other => *other = ArgValue::Count(by),
        }
    }

    /// Append to a flag's list. A non-list value is replaced.
    pub fn push(&mut self, flag: &str, value: ArgValue) {
        let entry = self
            .flags
            .entry(flag.to_string())
            .or_insert_with(|| ArgValue::List(Vec::new()));
        match entry {
            ArgValue::List(items) => items.push(value),
            other => *other = ArgValue::List(vec![value]),
        }
    }

    pub fn push_positional(&mut self, word: impl Into<String>) {
        self.positional.push(word.into());
    }
}

impl Serialize for ArgValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len() + 1))?;
        map.serialize_entry(REMAINDER_KEY, &self.positional)?;
        for (flag, value) in &self.flags {
            map.serialize_entry(flag, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(ArgValue::number("42"), ArgValue::Num(42.0));
        assert_eq!(ArgValue::number("-1.5"), ArgValue::Num(-1.5));
        assert_eq!(ArgValue::number("abc"), ArgValue::Num(0.0));
        assert_eq!(ArgValue::number(""), ArgValue::Num(0.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_increment_and_push() {
        let mut values = ArgValues::new();
        values.increment("-v", 1);
        values.increment("-v", 2);
        assert_eq!(values.get("-v").and_then(ArgValue::as_count), Some(3));

        values.push("--tags", ArgValue::Str("a".to_string()));
        values.push("--tags", ArgValue::Str("b".to_string()));
        assert_eq!(values.get("--tags").and_then(ArgValue::as_list).map(<[_]>::len), Some(2));

        // A boolean overwritten by a counter restarts the count
        values.set("-x", ArgValue::Bool(true));
        values.increment("-x", 1);
        assert_eq!(values.get("-x"), Some(&ArgValue::Count(1)));
    }

    #[test]
    fn test_serialize_with_remainder_key() {
        let mut values = ArgValues::new();
        values.set("--verbose", ArgValue::Bool(true));
        values.push_positional("file.txt");

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "_": ["file.txt"], "--verbose": true })
        );
    }
}
