//! Completion tree definitions
//!
//! The completion tree describes a command's grammar: which subcommands exist
//! at each depth, which values a flag accepts, and a description per node.
//! It is data only; walking it is the engine's job.

use serde_json::Value;

use crate::error::GrammarError;

/// Reserved key holding a branch's description
pub const DESC_KEY: &str = "__desc";

/// Reserved key holding a branch's flag-value candidates
pub const OPTS_KEY: &str = "__opts";

/// Flag key under which values offered to any flag of a branch are kept
pub const ANY_FLAG: &str = "*";

/// A node of the completion tree
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionNode {
    /// Named children in declaration order, plus metadata
    Branch {
        children: Vec<(String, CompletionNode)>,
        description: Option<String>,
        /// Canonical flag (or [`ANY_FLAG`]) -> node holding that flag's value candidates
        flag_options: Vec<(String, CompletionNode)>,
    },

    /// Literal completion strings with no description
    List(Vec<String>),

    /// Pre-rendered payload handed to the shell verbatim
    Literal(String),
}

impl CompletionNode {
    /// Create an empty branch
    pub fn branch() -> Self {
        CompletionNode::Branch {
            children: Vec::new(),
            description: None,
            flag_options: Vec::new(),
        }
    }

    /// Create a list node
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompletionNode::List(items.into_iter().map(Into::into).collect())
    }

    /// Create a literal node
    pub fn literal(payload: impl Into<String>) -> Self {
        CompletionNode::Literal(payload.into())
    }

    /// Builder: set the description of a branch. No-op on leaves.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        if let CompletionNode::Branch { description, .. } = &mut self {
            *description = Some(text.into());
        }
        self
    }

    /// Builder: append a child to a branch. No-op on leaves.
    pub fn with_child(mut self, name: impl Into<String>, node: CompletionNode) -> Self {
        if let CompletionNode::Branch { children, .. } = &mut self {
            children.push((name.into(), node));
        }
        self
    }

    /// Builder: declare the value candidates of a flag on a branch. No-op on leaves.
    pub fn with_flag_values(mut self, flag: impl Into<String>, node: CompletionNode) -> Self {
        if let CompletionNode::Branch { flag_options, .. } = &mut self {
            flag_options.push((flag.into(), node));
        }
        self
    }

    /// Builder: declare values offered to any flag of a branch. No-op on leaves.
    pub fn with_any_flag_values(self, node: CompletionNode) -> Self {
        self.with_flag_values(ANY_FLAG, node)
    }

    /// Look up a direct child by name
    pub fn child(&self, name: &str) -> Option<&CompletionNode> {
        match self {
            CompletionNode::Branch { children, .. } => children
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Look up the value candidates declared for `flag` on this node
    pub fn flag_values(&self, flag: &str) -> Option<&CompletionNode> {
        match self {
            CompletionNode::Branch { flag_options, .. } => flag_options
                .iter()
                .find(|(key, _)| key == flag)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Values this branch offers to any flag without its own declaration
    pub fn any_flag_values(&self) -> Option<&CompletionNode> {
        self.flag_values(ANY_FLAG)
    }

    /// Description of this node, if it is a described branch
    pub fn description(&self) -> Option<&str> {
        match self {
            CompletionNode::Branch { description, .. } => description.as_deref(),
            _ => None,
        }
    }

    /// Build a tree from a JSON value.
    ///
    /// Objects become branches (keys in document order, `__desc` and `__opts`
    /// taken as metadata), arrays become lists and strings become literals.
    pub fn from_json(value: &Value) -> Result<Self, GrammarError> {
        Self::from_json_at(value, "$")
    }

    fn from_json_at(value: &Value, path: &str) -> Result<Self, GrammarError> {
        match value {
            Value::String(s) => Ok(CompletionNode::Literal(s.clone())),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    other => Err(GrammarError::InvalidNode {
                        path: format!("{path}[{i}]"),
                        found: json_kind(other).to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(CompletionNode::List),
            Value::Object(map) => {
                let mut node = CompletionNode::branch();
                for (key, child) in map {
                    let child_path = format!("{path}.{key}");
                    match key.as_str() {
                        DESC_KEY => match child {
                            Value::String(s) => node = node.with_description(s.clone()),
                            Value::Null => {}
                            other => {
                                return Err(GrammarError::InvalidNode {
                                    path: child_path,
                                    found: json_kind(other).to_string(),
                                });
                            }
                        },
                        OPTS_KEY => match child {
                            Value::Object(opts) => {
                                for (flag, values) in opts {
                                    let values_path = format!("{child_path}.{flag}");
                                    node = node.with_flag_values(
                                        flag.clone(),
                                        Self::from_json_at(values, &values_path)?,
                                    );
                                }
                            }
                            Value::Array(_) => {
                                node = node.with_any_flag_values(Self::from_json_at(
                                    child,
                                    &child_path,
                                )?);
                            }
                            other => {
                                return Err(GrammarError::InvalidNode {
                                    path: child_path,
                                    found: json_kind(other).to_string(),
                                });
                            }
                        },
                        _ => {
                            let child_node = Self::from_json_at(child, &child_path)?;
                            node = node.with_child(key.clone(), child_node);
                        }
                    }
                }
                Ok(node)
            }
            other => Err(GrammarError::InvalidNode {
                path: path.to_string(),
                found: json_kind(other).to_string(),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
