//! Grammar files
//!
//! A grammar file is the CLI author's description of their command, in JSON:
//!
//! ```json
//! {
//!   "tree": {
//!     "build": {
//!       "__desc": "Build the project",
//!       "__opts": { "--target": ["x86_64", "aarch64"] },
//!       "release": {}
//!     },
//!     "test": {}
//!   },
//!   "aliases": { "b": "build", "-t": "--target" },
//!   "types": { "--target": "string", "-v": "count", "--tags": "string[]" }
//! }
//! ```
//!
//! Key order inside `tree` is kept, so candidates come out in the order the
//! author wrote them.
//!
//! `__opts` may also be a plain list, offered as the value of any flag used
//! under that branch.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::completion::{Aliases, ArgType, CompletionEngine, CompletionNode};
use crate::error::{GrammarError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GrammarDocument {
    tree: Value,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    #[serde(default)]
    types: BTreeMap<String, String>,
}

/// Parsed grammar, ready to build an engine from
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    pub tree: CompletionNode,
    pub aliases: Aliases,
    pub types: Vec<(String, ArgType)>,
}

impl Grammar {
    /// Parse a grammar document
    pub fn from_json_str(text: &str) -> std::result::Result<Self, GrammarError> {
        let doc: GrammarDocument =
            serde_json::from_str(text).map_err(|e| GrammarError::Syntax(e.to_string()))?;

        let tree = CompletionNode::from_json(&doc.tree)?;
        let aliases = Aliases::new(doc.aliases);
        let types = doc
            .types
            .into_iter()
            .map(|(flag, name)| match name.parse::<ArgType>() {
                Ok(ty) => Ok((flag, ty)),
                Err(name) => Err(GrammarError::UnknownType { flag, name }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            tree,
            aliases,
            types,
        })
    }

    /// Read and parse a grammar file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GrammarError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let grammar = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            types = grammar.types.len(),
            "loaded grammar"
        );
        Ok(grammar)
    }

    /// Build the completion engine for this grammar
    pub fn into_engine(self) -> CompletionEngine {
        CompletionEngine::new(self.tree, self.aliases, self.types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{ScalarType, Shell, ShellOutput};
    use crate::error::TabtreeError;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "tree": {
            "build": {
                "__desc": "Build the project",
                "__opts": { "--target": ["x86_64", "aarch64"] },
                "release": {}
            },
            "test": { "__desc": "Run tests" }
        },
        "aliases": { "b": "build", "-t": "--target" },
        "types": { "--target": "string", "-v": "count", "--tags": "string[]" }
    }"#;

    #[test]
    fn test_parse_sample() {
        let grammar = Grammar::from_json_str(SAMPLE).unwrap();

        assert_eq!(grammar.aliases.canonical("b"), "build");
        assert!(grammar.types.contains(&("-v".to_string(), ArgType::Count)));
        assert!(
            grammar
                .types
                .contains(&("--tags".to_string(), ArgType::ListOf(ScalarType::String)))
        );
        assert_eq!(
            grammar.tree.child("build").and_then(|n| n.description()),
            Some("Build the project")
        );
    }

    #[test]
    fn test_into_engine_completes() {
        let engine = Grammar::from_json_str(SAMPLE).unwrap().into_engine();

        let completions = engine.next_completions(Shell::Fish, "app b -t ", &[]);
        assert_eq!(
            completions.output,
            ShellOutput::Lines(vec!["x86_64".to_string(), "aarch64".to_string()])
        );

        let completions = engine.next_completions(Shell::Zsh, "app ", &[]);
        assert_eq!(
            completions.output,
            ShellOutput::Lines(vec![
                "build:Build the project".to_string(),
                "test:Run tests".to_string(),
            ])
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Grammar::from_json_str(r#"{ "tree": {}, "types": { "--x": "float" } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            GrammarError::UnknownType { ref flag, ref name } if flag == "--x" && name == "float"
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            Grammar::from_json_str("{ not json"),
            Err(GrammarError::Syntax(_))
        ));
        // tree is required
        assert!(matches!(
            Grammar::from_json_str(r#"{ "aliases": {} }"#),
            Err(GrammarError::Syntax(_))
        ));
        assert!(matches!(
            Grammar::from_json_str(r#"{ "tree": {}, "extra": 1 }"#),
            Err(GrammarError::Syntax(_))
        ));
        assert!(matches!(
            Grammar::from_json_str(r#"{ "tree": 7 }"#),
            Err(GrammarError::InvalidNode { .. })
        ));
    }

    #[test]
    fn test_opts_as_list() {
        let grammar = Grammar::from_json_str(
            r#"{
                "tree": { "build": { "__opts": ["--target", "--jobs"], "release": {} } },
                "types": { "--only": "string" }
            }"#,
        )
        .unwrap();
        let engine = grammar.into_engine();

        let completions = engine.next_completions(Shell::Zsh, "app build --only ", &[]);
        assert_eq!(
            completions.output,
            ShellOutput::Lines(vec!["--target".to_string(), "--jobs".to_string()])
        );

        let completions = engine.next_completions(Shell::Zsh, "app build ", &[]);
        assert_eq!(
            completions.output,
            ShellOutput::Lines(vec!["release".to_string()])
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let grammar = Grammar::load(file.path()).unwrap();
        assert!(grammar.tree.child("test").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Grammar::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TabtreeError::Grammar(GrammarError::Read { .. })));
    }
}
