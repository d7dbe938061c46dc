//! Expression Evaluation
//!
//! The decorator never interprets expressions itself. Title values that look
//! like expressions are handed to an `ExpressionEvaluator`; a failed
//! evaluation falls back to the raw text.

use std::collections::HashMap;

use fos_dom::{DomTree, NodeId};

/// Where an expression is being evaluated
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Template being composed
    pub template: &'a str,
    pub tree: &'a DomTree,
    /// Element carrying the expression
    pub node: NodeId,
}

/// Evaluation failure, always recovered by the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("Expressions are not supported: {0}")]
    Unsupported(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Malformed expression: {0}")]
    Syntax(String),
}

/// Host engine hook for evaluating expression text
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(
        &self,
        expression: &str,
        context: &EvaluationContext<'_>,
    ) -> Result<String, EvaluationError>;
}

/// Check whether a value is written in expression syntax (`${..}`, `*{..}`,
/// `#{..}`, `@{..}` or `~{..}`)
pub fn is_expression(text: &str) -> bool {
    let text = text.trim();
    let mut chars = text.chars();
    matches!(chars.next(), Some('$' | '*' | '#' | '@' | '~'))
        && chars.next() == Some('{')
        && text.ends_with('}')
}

/// Evaluator that rejects everything, so raw text is always used
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvaluator;

impl ExpressionEvaluator for NoEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        _context: &EvaluationContext<'_>,
    ) -> Result<String, EvaluationError> {
        Err(EvaluationError::Unsupported(expression.to_string()))
    }
}

/// Evaluator resolving `${name}` from a fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct VariableEvaluator {
    variables: HashMap<String, String>,
}

impl VariableEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for VariableEvaluator {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

impl ExpressionEvaluator for VariableEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        _context: &EvaluationContext<'_>,
    ) -> Result<String, EvaluationError> {
        let expression = expression.trim();
        let Some(inner) = expression
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            return Err(EvaluationError::Unsupported(expression.to_string()));
        };

        let name = inner.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
            return Err(EvaluationError::Syntax(expression.to_string()));
        }
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| EvaluationError::UnknownVariable(name.to_string()))
    }
}
