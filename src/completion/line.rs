//! Completion line tokenizer and classifier
//!
//! Turns the raw line a shell is completing into the tokens that select a
//! position in the completion tree, the word currently being typed, and
//! whether the cursor sits where a flag's value is expected. Flag values met
//! on the way are accumulated into [`ArgValues`].
//!
//! The classifier is a single left-to-right pass over the words of the line:
//! - Bare words that name a child of the current node descend into it
//! - Other bare words go to the positional remainder
//! - Long flags (`--name`) and short flags (`-n`) are typed by [`FlagTypes`]
//! - Single-dash words longer than two characters are either a flag with an
//!   attached value (`-n5`, `-ofile`) or a cluster of short flags (`-xvf`)
//! - Everything after a literal ` -- ` is positional and never classified

use tracing::{debug, trace};

use super::flags::{Aliases, ArgType, FlagTypes, ScalarType};
use super::tree::CompletionNode;
use super::values::{ArgValue, ArgValues, parse_number};

/// Separator after which the rest of the line is free-form
const SEPARATOR: &str = " -- ";

/// Result of classifying one completion line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLine {
    /// Canonical tokens selecting the position in the tree, in order
    pub resolved: Vec<String>,
    /// Word under the cursor (empty right after a space)
    pub partial: String,
    /// Flag whose value the cursor is on, if any
    pub pending_flag: Option<String>,
    /// Values accumulated while classifying
    pub values: ArgValues,
}

impl ParsedLine {
    /// Whether the cursor is in flag-value position
    pub fn awaiting_flag_value(&self) -> bool {
        self.pending_flag.is_some()
    }
}

/// Outcome of classifying a flag that may consume following words
enum Step {
    /// Continue at this word index
    Next(usize),
    /// The line ends where this flag's value is expected
    Pending,
}

/// Classifier bound to a grammar
pub struct LineParser<'a> {
    root: &'a CompletionNode,
    aliases: &'a Aliases,
    types: &'a FlagTypes,
}

impl<'a> LineParser<'a> {
    pub fn new(root: &'a CompletionNode, aliases: &'a Aliases, types: &'a FlagTypes) -> Self {
        Self {
            root,
            aliases,
            types,
        }
    }

    /// Classify a full completion line, program name included
    pub fn parse(&self, line: &str) -> ParsedLine {
        let (head, tail) = match line.find(SEPARATOR) {
            Some(at) => (&line[..at], Some(&line[at + SEPARATOR.len()..])),
            None => (line, None),
        };

        let mut words = split_words(head);
        if !words.is_empty() {
            // Program name
            words.remove(0);
        }

        let mut remainder: Vec<&str> = Vec::new();
        let partial = match tail {
            Some(rest) => {
                remainder = rest.split_whitespace().collect();
                if ends_with_break(rest) || rest.is_empty() {
                    String::new()
                } else {
                    remainder.pop().unwrap_or_default().to_string()
                }
            }
            None if ends_with_break(head) => String::new(),
            None => words.pop().unwrap_or_default().to_string(),
        };

        let mut parsed = self.classify(&words);
        if tail.is_some() {
            // The cursor is past the separator, never on a flag value
            parsed.pending_flag = None;
        }
        parsed.partial = partial;
        for word in remainder {
            parsed.values.push_positional(word);
        }

        debug!(
            resolved = ?parsed.resolved,
            partial = %parsed.partial,
            pending = ?parsed.pending_flag,
            "classified completion line"
        );
        parsed
    }

    fn classify(&self, words: &[&str]) -> ParsedLine {
        let mut parsed = ParsedLine::default();
        let mut node = self.root;
        let mut i = 0;

        while i < words.len() {
            let word = words[i];
            let token = self.aliases.canonical(word);
            trace!(index = i, word, token, "classifying word");

            let step = if is_flag(word) {
                self.flag_step(token, words, i, &mut parsed.values)
            } else if is_short_cluster(word) {
                self.cluster_step(word, words, i, &mut parsed.values)
            } else {
                if let Some(child) = node.child(token) {
                    parsed.resolved.push(token.to_string());
                    node = child;
                    if self.types.is_declared(token) {
                        parsed.values.set(token, ArgValue::Bool(true));
                    }
                } else if self.types.is_declared(token) {
                    parsed.values.set(token, ArgValue::Bool(true));
                } else {
                    parsed.values.push_positional(word);
                }
                Step::Next(i + 1)
            };

            match step {
                Step::Next(next) => i = next,
                Step::Pending => {
                    parsed.pending_flag = Some(self.pending_name(word));
                    break;
                }
            }
        }

        parsed
    }

    /// Canonical flag left pending by `word`
    fn pending_name(&self, word: &str) -> String {
        if is_short_cluster(word) {
            // Only the last flag of a cluster can be left waiting for a value
            let last = word.chars().last().unwrap_or('-');
            self.aliases.canonical(&format!("-{last}")).to_string()
        } else {
            self.aliases.canonical(word).to_string()
        }
    }

    /// Classify the flag at `words[i]`, consuming its value words if any
    fn flag_step(&self, flag: &str, words: &[&str], i: usize, values: &mut ArgValues) -> Step {
        let ty = self.types.get(flag);
        match ty {
            ArgType::Boolean => {
                values.set(flag, ArgValue::Bool(true));
                Step::Next(i + 1)
            }
            ArgType::Count => {
                values.increment(flag, 1);
                Step::Next(i + 1)
            }
            ArgType::String | ArgType::Number => match words.get(i + 1) {
                Some(value) => {
                    record_value(values, flag, ty, value);
                    Step::Next(i + 2)
                }
                None => Step::Pending,
            },
            ArgType::ListOf(kind) => {
                let Some(first) = words.get(i + 1) else {
                    return Step::Pending;
                };
                record_value(values, flag, ty, first);

                let mut next = i + 2;
                if kind == ScalarType::Number {
                    while let Some(word) = words.get(next).filter(|w| is_number_list(w)) {
                        record_value(values, flag, ty, word);
                        next += 1;
                    }
                    if next >= words.len() {
                        // More numbers may follow under the cursor
                        return Step::Pending;
                    }
                }
                Step::Next(next)
            }
        }
    }

    /// Classify a single-dash word longer than two characters.
    ///
    /// An attached value (`-n5`, `-ofile`) is checked before the word is
    /// split into a cluster of short flags.
    fn cluster_step(&self, word: &str, words: &[&str], i: usize, values: &mut ArgValues) -> Step {
        let split = word
            .char_indices()
            .nth(2)
            .map(|(at, _)| at)
            .unwrap_or(word.len());
        let flag = self.aliases.canonical(&word[..split]).to_string();
        let rest = &word[split..];

        match self.types.declared(&flag) {
            Some(ty @ (ArgType::Number | ArgType::String | ArgType::ListOf(_))) => {
                record_value(values, &flag, ty, rest);
                return Step::Next(i + 1);
            }
            Some(ArgType::Count) if parse_number(rest).is_some() => {
                values.increment(&flag, count_of(rest));
                return Step::Next(i + 1);
            }
            _ if parse_number(rest).is_some() => {
                values.set(&flag, ArgValue::number(rest));
                return Step::Next(i + 1);
            }
            _ => {}
        }

        let chars: Vec<char> = word.chars().skip(1).collect();
        for (k, c) in chars.iter().enumerate() {
            let short = format!("-{c}");
            let flag = self.aliases.canonical(&short).to_string();
            match self.types.declared(&flag) {
                Some(ArgType::Boolean) => values.set(&flag, ArgValue::Bool(true)),
                Some(ty) if ty.takes_value() => {
                    let attached: String = chars[k + 1..].iter().collect();
                    if attached.is_empty() {
                        return self.flag_step(&flag, words, i, values);
                    }
                    record_value(values, &flag, ty, &attached);
                    return Step::Next(i + 1);
                }
                _ => values.increment(&flag, 1),
            }
        }
        Step::Next(i + 1)
    }
}

/// Store `raw` as the value of `flag` according to its type
fn record_value(values: &mut ArgValues, flag: &str, ty: ArgType, raw: &str) {
    match ty {
        ArgType::String => values.set(flag, ArgValue::Str(raw.to_string())),
        ArgType::Number => values.set(flag, ArgValue::number(raw)),
        ArgType::ListOf(kind) => {
            for part in raw.split(',').filter(|p| !p.is_empty()) {
                let item = match kind {
                    ScalarType::String => ArgValue::Str(part.to_string()),
                    ScalarType::Number => ArgValue::number(part),
                };
                values.push(flag, item);
            }
        }
        ArgType::Count => values.increment(flag, 1),
        ArgType::Boolean => values.set(flag, ArgValue::Bool(true)),
    }
}

fn count_of(raw: &str) -> u32 {
    parse_number(raw)
        .filter(|n| *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// `3` or `1,2,3`
fn is_number_list(word: &str) -> bool {
    let mut parts = word.split(',').filter(|p| !p.is_empty()).peekable();
    parts.peek().is_some() && parts.all(|p| parse_number(p).is_some())
}

fn is_break(c: char) -> bool {
    c.is_whitespace() || c == '='
}

fn split_words(text: &str) -> Vec<&str> {
    text.split(is_break).filter(|w| !w.is_empty()).collect()
}

fn ends_with_break(text: &str) -> bool {
    text.ends_with(is_break)
}

/// `--long` or a two-character short flag such as `-v`
fn is_flag(word: &str) -> bool {
    word.starts_with("--") || (word.starts_with('-') && word.chars().count() == 2)
}

/// `-xyz`: single dash followed by two or more characters
fn is_short_cluster(word: &str) -> bool {
    word.starts_with('-') && !word.starts_with("--") && word.chars().count() > 2
}
