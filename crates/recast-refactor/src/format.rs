use recast_syntax::{SyntaxTree, TextRange};

/// Marks the region a formatter should normalize after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatAnnotation {
    /// Range of the inserted node in the new tree.
    pub range: TextRange,
}

/// Host-provided pretty printer.
pub trait Formatter {
    fn format(&self, tree: SyntaxTree, annotation: FormatAnnotation) -> SyntaxTree;
}

/// Leaves trees untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFormatter;

impl Formatter for IdentityFormatter {
    fn format(&self, tree: SyntaxTree, _annotation: FormatAnnotation) -> SyntaxTree {
        tree
    }
}
