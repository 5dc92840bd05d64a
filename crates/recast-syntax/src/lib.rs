//! Lossless syntax trees for a C# subset.
//!
//! - [`lex`] turns source text into tokens (trivia included).
//! - [`parse`] builds a rowan green tree wrapped in an immutable [`SyntaxTree`]; it
//!   never fails, errors are reported next to the tree.
//! - [`ast`] offers typed views over nodes and [`make`] builds new green nodes
//!   that can be spliced in with [`SyntaxTree::replace`].

pub mod ast;
mod lexer;
pub mod make;
mod parser;
mod syntax_kind;
mod tree;

pub use ast::AstNode;
pub use lexer::{lex, lex_with_errors, LexError, Lexer, Token};
pub use parser::{
    debug_dump, parse, parse_type_name, Parse, SyntaxElement, SyntaxNode, SyntaxToken,
};
pub use rowan::GreenNode;
pub use syntax_kind::{CSharpLanguage, SyntaxKind};
pub use text_size::{TextRange, TextSize};
pub use tree::{grandparent_of, parent_of, NodeHandle, SyntaxTree, TreeError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}
