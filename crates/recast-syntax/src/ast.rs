//! Typed views over [`SyntaxNode`]s.
//!
//! Wrappers are zero-cost: each holds the red node and exposes accessors for the
//! children the parser produces. Accessors return `None` for missing children so
//! trees with syntax errors can be inspected without panicking.

use crate::parser::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

pub mod support {
    use crate::ast::AstNode;
    use crate::parser::{SyntaxNode, SyntaxToken};
    use crate::syntax_kind::SyntaxKind;

    pub fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
        node.children().find_map(N::cast)
    }

    pub fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
        node.children().filter_map(N::cast)
    }

    pub fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == kind)
    }

    /// The declared name of a declaration node: the last identifier token among its
    /// direct children.
    pub fn ident_token(node: &SyntaxNode) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|tok| tok.kind() == SyntaxKind::Identifier)
            .last()
    }

    /// Direct child node at `n`, skipping tokens.
    pub fn nth_child(node: &SyntaxNode, n: usize) -> Option<SyntaxNode> {
        node.children().nth(n)
    }
}

mod ext;
mod nodes;

pub use ext::is_type_syntax;
pub use nodes::*;
