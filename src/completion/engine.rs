//! Completion engine - orchestrates the completion flow
//!
//! This module ties the completion components together: line classification,
//! tree resolution, shell rendering and (for bash) prefix filtering.

use std::fmt;

use tracing::{debug, warn};

use super::flags::{Aliases, ArgType, FlagTypes};
use super::line::{LineParser, ParsedLine};
use super::render::{CompletionUnit, Shell, filter_prefix, render};
use super::tree::CompletionNode;
use super::values::ArgValues;

/// Environment variable holding the line being completed
pub const DEFAULT_LINE_VAR: &str = "COMP_LINE";

/// What the tree yields at a position
#[derive(Debug, Clone, PartialEq)]
pub enum Candidates {
    /// Payload passed to the shell untouched
    Literal(String),
    /// Candidates to render
    Units(Vec<CompletionUnit>),
}

impl Candidates {
    fn empty() -> Self {
        Candidates::Units(Vec::new())
    }
}

/// What the shell receives on stdout
#[derive(Debug, Clone, PartialEq)]
pub enum ShellOutput {
    /// Precomputed payload, printed as is
    Literal(String),
    /// Rendered candidates, one per line
    Lines(Vec<String>),
}

impl ShellOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            ShellOutput::Literal(payload) => payload.is_empty(),
            ShellOutput::Lines(lines) => lines.is_empty(),
        }
    }
}

impl fmt::Display for ShellOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellOutput::Literal(payload) => f.write_str(payload),
            ShellOutput::Lines(lines) => {
                for line in lines {
                    writeln!(f, "{line}")?;
                }
                Ok(())
            }
        }
    }
}

/// Result of one completion request
#[derive(Debug, Clone, PartialEq)]
pub struct Completions {
    pub output: ShellOutput,
    /// Values parsed from the line, built fresh for this request
    pub values: ArgValues,
}

impl Completions {
    fn empty() -> Self {
        Self {
            output: ShellOutput::Lines(Vec::new()),
            values: ArgValues::new(),
        }
    }
}

/// Main completion engine
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    tree: CompletionNode,
    aliases: Aliases,
    types: FlagTypes,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `tree` - Grammar of the command being completed
    /// * `aliases` - Alias token to canonical token
    /// * `types` - Declared flag types; aliases inherit their canonical flag's type
    pub fn new<I, K>(tree: CompletionNode, aliases: Aliases, types: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgType)>,
        K: Into<String>,
    {
        let types = FlagTypes::new(types, &aliases);
        Self {
            tree,
            aliases,
            types,
        }
    }

    pub fn tree(&self) -> &CompletionNode {
        &self.tree
    }

    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }

    pub fn types(&self) -> &FlagTypes {
        &self.types
    }

    /// Classify a completion line against this grammar
    pub fn parse_line(&self, line: &str) -> ParsedLine {
        LineParser::new(&self.tree, &self.aliases, &self.types).parse(line)
    }

    /// Walk the tree along `tokens` and collect the candidates there.
    ///
    /// A token with no matching child yields no candidates. With a
    /// `pending_flag`, only that flag's value candidates are returned, taken
    /// from the nearest node on the path that declares them. A node's own
    /// entry for the flag wins over values it offers to any flag.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S], pending_flag: Option<&str>) -> Candidates {
        let mut path = vec![&self.tree];
        let mut node = &self.tree;

        for token in tokens {
            let token = self.aliases.canonical(token.as_ref());
            match node.child(token) {
                Some(child) => {
                    node = child;
                    path.push(child);
                }
                None => {
                    debug!(token, "no completion tree entry for token");
                    return Candidates::empty();
                }
            }
        }

        match pending_flag {
            Some(flag) => {
                let flag = self.aliases.canonical(flag);
                let scoped = path.iter().rev().find_map(|n| {
                    n.flag_values(flag)
                        .or_else(|| n.child(flag))
                        .or_else(|| n.any_flag_values())
                });
                match scoped {
                    Some(values) => self.candidates_of(values),
                    None => {
                        debug!(flag, "no value candidates declared for flag");
                        Candidates::empty()
                    }
                }
            }
            None => self.candidates_of(node),
        }
    }

    fn candidates_of(&self, node: &CompletionNode) -> Candidates {
        match node {
            CompletionNode::Literal(payload) => Candidates::Literal(payload.clone()),
            CompletionNode::List(items) => {
                Candidates::Units(items.iter().map(CompletionUnit::new).collect())
            }
            CompletionNode::Branch { children, .. } => Candidates::Units(
                children
                    .iter()
                    .map(|(name, child)| {
                        let mut unit = CompletionUnit::new(name);
                        if let Some(desc) = child.description() {
                            unit = unit.with_description(desc);
                        }
                        if let Some(alias) = self.aliases.hint_for(name) {
                            unit = unit.with_alias(alias);
                        }
                        unit
                    })
                    .collect(),
            ),
        }
    }

    /// Produce the completions for `line`
    ///
    /// # Arguments
    /// * `shell` - Shell the output is rendered for
    /// * `line` - Full line being completed, program name included
    /// * `extra` - Caller-supplied candidates appended after the tree's own
    ///
    /// # Returns
    /// * `Completions` - Rendered output plus the values parsed from the line
    pub fn next_completions(
        &self,
        shell: Shell,
        line: &str,
        extra: &[CompletionUnit],
    ) -> Completions {
        if line.trim().is_empty() {
            return Completions::empty();
        }

        let parsed = self.parse_line(line);
        let output = match self.resolve(&parsed.resolved, parsed.pending_flag.as_deref()) {
            Candidates::Literal(payload) => ShellOutput::Literal(payload),
            Candidates::Units(mut units) => {
                units.extend(extra.iter().cloned());
                let lines = render(shell, &units);
                if shell.needs_prefix_filter() {
                    ShellOutput::Lines(filter_prefix(lines, &parsed.partial))
                } else {
                    ShellOutput::Lines(lines)
                }
            }
        };

        debug!(%shell, candidates = ?output, "completions ready");
        Completions {
            output,
            values: parsed.values,
        }
    }

    /// Produce the completions for the line held in environment variable `var`.
    ///
    /// An unset or empty variable yields no completions.
    pub fn next_completions_from_env(
        &self,
        shell: Shell,
        var: &str,
        extra: &[CompletionUnit],
    ) -> Completions {
        match std::env::var(var) {
            Ok(line) => self.next_completions(shell, &line, extra),
            Err(e) => {
                warn!(var, error = %e, "completion line not available");
                Completions::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::flags::ScalarType;
    use crate::completion::values::ArgValue;

    fn create_test_engine() -> CompletionEngine {
        let tree = CompletionNode::branch()
            .with_flag_values("--color", CompletionNode::list(["auto", "always", "never"]))
            .with_child(
                "build",
                CompletionNode::branch()
                    .with_description("Build the project")
                    .with_child("release", CompletionNode::branch().with_description("Optimised"))
                    .with_child("debug", CompletionNode::branch())
                    .with_flag_values("--target", CompletionNode::list(["x86_64", "aarch64"])),
            )
            .with_child("start", CompletionNode::branch().with_description("Start the service"))
            .with_child("stop", CompletionNode::branch().with_description("Stop the service"))
            .with_child("--format", CompletionNode::list(["json", "yaml"]))
            .with_child("files", CompletionNode::literal("__tabtree_files__"));

        let aliases = Aliases::new([("b", "build"), ("-t", "--target")]);
        CompletionEngine::new(
            tree,
            aliases,
            [
                ("--target", ArgType::String),
                ("--color", ArgType::String),
                ("--format", ArgType::String),
                ("-v", ArgType::Count),
                ("--tags", ArgType::ListOf(ScalarType::String)),
            ],
        )
    }

    fn lines(completions: &Completions) -> Vec<String> {
        match &completions.output {
            ShellOutput::Lines(lines) => lines.clone(),
            other => panic!("Expected Lines output, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_unknown_token_is_empty() {
        let engine = create_test_engine();
        assert_eq!(engine.resolve(&["nope"], None), Candidates::empty());
        assert_eq!(engine.resolve(&["build", "nope", "deeper"], None), Candidates::empty());
        // Walking past a leaf is also a miss
        assert_eq!(engine.resolve(&["--format", "json"], None), Candidates::empty());
    }

    #[test]
    fn test_resolve_branch_children() {
        let engine = create_test_engine();
        let Candidates::Units(units) = engine.resolve(&["build"], None) else {
            panic!("Expected Units");
        };
        assert_eq!(
            units,
            vec![
                CompletionUnit::new("release").with_description("Optimised"),
                CompletionUnit::new("debug"),
            ]
        );
    }

    #[test]
    fn test_resolve_alias_hint() {
        let engine = create_test_engine();
        let Candidates::Units(units) = engine.resolve::<&str>(&[], None) else {
            panic!("Expected Units");
        };
        let build = units.iter().find(|u| u.name == "build").unwrap();
        assert_eq!(build.alias.as_deref(), Some("b"));
        assert_eq!(build.description.as_deref(), Some("Build the project"));
    }

    #[test]
    fn test_awaiting_value_returns_flag_options_only() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Zsh, "mycli --verbose build --target ", &[]);

        assert_eq!(lines(&completions), vec!["x86_64", "aarch64"]);
        assert_eq!(completions.values.get("--verbose"), Some(&ArgValue::Bool(true)));
    }

    #[test]
    fn test_flag_options_inherited_from_ancestor() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Bash, "mycli build --color a", &[]);
        assert_eq!(lines(&completions), vec!["auto", "always"]);
    }

    #[test]
    fn test_flag_child_used_for_values() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Fish, "mycli --format ", &[]);
        assert_eq!(lines(&completions), vec!["json", "yaml"]);
    }

    #[test]
    fn test_any_flag_values() {
        let tree = CompletionNode::branch().with_child(
            "deploy",
            CompletionNode::branch()
                .with_any_flag_values(CompletionNode::list(["staging", "prod"]))
                .with_flag_values("--region", CompletionNode::list(["eu", "us"]))
                .with_child("now", CompletionNode::branch()),
        );
        let engine = CompletionEngine::new(
            tree,
            Aliases::default(),
            [("--env", ArgType::String), ("--region", ArgType::String)],
        );

        let completions = engine.next_completions(Shell::Fish, "app deploy --env ", &[]);
        assert_eq!(lines(&completions), vec!["staging", "prod"]);

        let completions = engine.next_completions(Shell::Fish, "app deploy --region ", &[]);
        assert_eq!(lines(&completions), vec!["eu", "us"]);

        // Inherited by subcommands
        let completions = engine.next_completions(Shell::Fish, "app deploy now --env ", &[]);
        assert_eq!(lines(&completions), vec!["staging", "prod"]);

        // Not offered outside the branch declaring them
        let completions = engine.next_completions(Shell::Fish, "app --env ", &[]);
        assert!(completions.output.is_empty());
    }

    #[test]
    fn test_separator_ends_flag_value_position() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Bash, "mycli build --target -- foo ", &[]);
        assert_eq!(lines(&completions), vec!["release", "debug"]);
        assert_eq!(completions.values.positional(), &["foo"]);
    }

    #[test]
    fn test_pending_flag_without_values() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Zsh, "mycli --tags ", &[]);
        assert!(completions.output.is_empty());
    }

    #[test]
    fn test_zsh_start_stop() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Zsh, "mycli st", &[]);
        let rendered = lines(&completions);

        let start = rendered.iter().position(|l| l == "start:Start the service");
        let stop = rendered.iter().position(|l| l == "stop:Stop the service");
        assert!(start.is_some() && stop.is_some());
        assert!(start < stop);
    }

    #[test]
    fn test_bash_filters_by_partial_word() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Bash, "mycli st", &[]);
        assert_eq!(lines(&completions), vec!["start", "stop"]);

        let completions = engine.next_completions(Shell::Bash, "mycli ", &[]);
        assert_eq!(
            lines(&completions),
            vec!["build", "start", "stop", "--format", "files"]
        );
    }

    #[test]
    fn test_bash_output_is_subset_of_unfiltered() {
        let engine = create_test_engine();
        for line in ["mycli ", "mycli s", "mycli b", "mycli build r", "mycli x"] {
            let parsed = engine.parse_line(line);
            let filtered = lines(&engine.next_completions(Shell::Bash, line, &[]));
            let Candidates::Units(units) = engine.resolve(&parsed.resolved, None) else {
                panic!("Expected Units");
            };
            let unfiltered = render(Shell::Bash, &units);
            for entry in &filtered {
                assert!(entry.starts_with(&parsed.partial));
                assert!(unfiltered.contains(entry));
            }
        }
    }

    #[test]
    fn test_zsh_and_fish_do_not_filter() {
        let engine = create_test_engine();
        let zsh = lines(&engine.next_completions(Shell::Zsh, "mycli zzz", &[]));
        let fish = lines(&engine.next_completions(Shell::Fish, "mycli zzz", &[]));
        assert_eq!(zsh.len(), 5);
        assert_eq!(fish.len(), 5);
        assert!(fish.contains(&"build\tBuild the project".to_string()));
    }

    #[test]
    fn test_literal_passthrough() {
        let engine = create_test_engine();
        let extra = vec![CompletionUnit::new("ignored")];
        let completions = engine.next_completions(Shell::Bash, "mycli files x", &extra);
        assert_eq!(
            completions.output,
            ShellOutput::Literal("__tabtree_files__".to_string())
        );
        assert_eq!(completions.output.to_string(), "__tabtree_files__");
    }

    #[test]
    fn test_extra_candidates_appended() {
        let engine = create_test_engine();
        let extra = vec![CompletionUnit::new("deploy").with_description("Ship: now")];
        let completions = engine.next_completions(Shell::Zsh, "mycli build ", &extra);
        assert_eq!(
            lines(&completions),
            vec!["release:Optimised", "debug", "deploy:Ship\\: now"]
        );

        let completions = engine.next_completions(Shell::Bash, "mycli build d", &extra);
        assert_eq!(lines(&completions), vec!["debug", "deploy"]);
    }

    #[test]
    fn test_alias_transparency() {
        let engine = create_test_engine();
        for shell in Shell::ALL {
            assert_eq!(
                engine.next_completions(shell, "mycli b -t ", &[]),
                engine.next_completions(shell, "mycli build --target ", &[])
            );
            assert_eq!(
                engine.next_completions(shell, "mycli b ", &[]),
                engine.next_completions(shell, "mycli build ", &[])
            );
        }
        assert_eq!(engine.types().get("-t"), engine.types().get("--target"));
    }

    #[test]
    fn test_values_returned_per_call() {
        let engine = create_test_engine();
        let first = engine.next_completions(Shell::Bash, "mycli -vvv --tags a,b,c ", &[]);
        assert_eq!(first.values.get("-v"), Some(&ArgValue::Count(3)));
        assert_eq!(
            first.values.get("--tags"),
            Some(&ArgValue::List(vec![
                ArgValue::Str("a".to_string()),
                ArgValue::Str("b".to_string()),
                ArgValue::Str("c".to_string()),
            ]))
        );

        // Nothing carries over into the next request
        let second = engine.next_completions(Shell::Bash, "mycli ", &[]);
        assert!(second.values.is_empty());
    }

    #[test]
    fn test_idempotent_output() {
        let engine = create_test_engine();
        let line = "mycli -v build --target x86_64 r";
        for shell in Shell::ALL {
            let a = engine.next_completions(shell, line, &[]);
            let b = engine.next_completions(shell, line, &[]);
            assert_eq!(a.output.to_string(), b.output.to_string());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_empty_line() {
        let engine = create_test_engine();
        let completions = engine.next_completions(Shell::Bash, "", &[]);
        assert!(completions.output.is_empty());
        assert!(completions.values.is_empty());
    }

    #[test]
    fn test_unset_env_var_yields_nothing() {
        let engine = create_test_engine();
        let completions =
            engine.next_completions_from_env(Shell::Zsh, "TABTREE_TEST_SURELY_UNSET_VAR", &[]);
        assert_eq!(completions.output, ShellOutput::Lines(Vec::new()));
    }

    #[test]
    fn test_output_display() {
        let output = ShellOutput::Lines(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(output.to_string(), "a\nb\n");
    }
}
