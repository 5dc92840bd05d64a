use recast_core::{apply_text_edits, TextEdit};
use recast_syntax::{GreenNode, NodeHandle, SyntaxNode, SyntaxTree, TextRange};
use similar::TextDiff;

use crate::RefactorError;

/// A realized refactoring: which node goes away and what replaces it.
///
/// The edit is a plain value; nothing changes until [`RefactoringEdit::apply`]
/// produces a new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefactoringEdit {
    pub replaced_range: TextRange,
    pub new_node: GreenNode,
    target: NodeHandle,
}

impl RefactoringEdit {
    pub fn new(target: NodeHandle, new_node: GreenNode) -> Self {
        Self {
            replaced_range: target.range(),
            new_node,
            target,
        }
    }

    pub fn target(&self) -> &NodeHandle {
        &self.target
    }

    pub fn new_text(&self) -> String {
        SyntaxNode::new_root(self.new_node.clone()).to_string()
    }

    /// Splice the new node into `tree`.
    ///
    /// Fails with [`RefactorError::StructuralInconsistency`] when `tree` is not
    /// the version the edit was computed against.
    pub fn apply(&self, tree: &SyntaxTree) -> Result<SyntaxTree, RefactorError> {
        let target = self.target.resolve(tree)?;
        Ok(tree.replace(&target, self.new_node.clone())?)
    }

    /// The same edit as a textual replacement.
    pub fn to_text_edit(&self) -> TextEdit {
        TextEdit::new(self.replaced_range, self.new_text())
    }

    /// Unified diff of `tree`'s text before and after the edit.
    pub fn preview(&self, tree: &SyntaxTree, file_name: &str) -> Result<String, RefactorError> {
        let original = tree.text();
        let modified = apply_text_edits(&original, &[self.to_text_edit()])?;
        let diff = TextDiff::from_lines(&original, &modified);
        Ok(diff
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{file_name}"), &format!("b/{file_name}"))
            .to_string())
    }
}
