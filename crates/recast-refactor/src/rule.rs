use std::borrow::Borrow;
use std::fmt;

use recast_syntax::{GreenNode, NodeHandle, SyntaxNode, TextRange};
use recast_types::CallableSignature;
use serde::{Deserialize, Serialize};

use crate::{RefactorContext, RefactorError};

/// Stable identifier of a refactoring rule, used in configuration and telemetry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Code action category, spelled the way editors expect it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeActionKind {
    #[serde(rename = "refactor")]
    Refactor,
    #[serde(rename = "refactor.extract")]
    RefactorExtract,
    #[serde(rename = "refactor.inline")]
    RefactorInline,
    #[serde(rename = "refactor.rewrite")]
    RefactorRewrite,
}

impl CodeActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CodeActionKind::Refactor => "refactor",
            CodeActionKind::RefactorExtract => "refactor.extract",
            CodeActionKind::RefactorInline => "refactor.inline",
            CodeActionKind::RefactorRewrite => "refactor.rewrite",
        }
    }
}

/// Rule-specific facts captured while probing, consumed when the edit is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchData {
    /// The target denotes a value of a delegate type with this invoke signature.
    Callable(CallableSignature),
}

/// A successful probe: the node to replace plus whatever the builder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub target: NodeHandle,
    pub data: MatchData,
}

impl RuleMatch {
    pub fn target_range(&self) -> TextRange {
        self.target.range()
    }
}

/// One refactoring.
///
/// Rules are stateless. [`RefactoringRule::probe`] must be cheap and free of side
/// effects since it runs for every caret movement; all construction work is
/// deferred to [`RefactoringRule::build`].
pub trait RefactoringRule: Send + Sync {
    fn id(&self) -> RuleId;

    fn default_title(&self) -> &'static str;

    fn kind(&self) -> CodeActionKind {
        CodeActionKind::RefactorRewrite
    }

    /// Decide whether the rule applies to `node` (the innermost node at the
    /// selection start).
    fn probe(
        &self,
        ctx: &RefactorContext<'_>,
        node: &SyntaxNode,
        selection: TextRange,
    ) -> Option<RuleMatch>;

    /// Build the replacement for `matched.target`.
    fn build(&self, ctx: &RefactorContext<'_>, matched: &RuleMatch)
        -> Result<GreenNode, RefactorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_action_kinds_use_editor_spelling() {
        let json = serde_json::to_string(&CodeActionKind::RefactorRewrite).unwrap();
        assert_eq!(json, "\"refactor.rewrite\"");
        assert_eq!(CodeActionKind::RefactorRewrite.as_str(), "refactor.rewrite");

        let back: CodeActionKind = serde_json::from_str("\"refactor.extract\"").unwrap();
        assert_eq!(back, CodeActionKind::RefactorExtract);
    }

    #[test]
    fn rule_ids_serialize_as_plain_strings() {
        let id = RuleId::new("method-group-to-anonymous-method");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"method-group-to-anonymous-method\""
        );
        assert_eq!(id.to_string(), id.as_str());
    }
}
