//! Factories for green nodes.
//!
//! Each factory emits the same shape the parser would produce for the equivalent
//! source text, including where trivia lives, so factory-built subtrees can be
//! spliced into parsed trees and compared against re-parsed output.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::{ParseError, SyntaxKind};

type GreenElement = NodeOrToken<GreenNode, GreenToken>;

fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

fn punct(kind: SyntaxKind) -> GreenElement {
    token(kind, kind.fixed_text().unwrap_or_default())
}

fn space() -> GreenElement {
    token(SyntaxKind::Whitespace, " ")
}

fn separated(items: Vec<GreenNode>, open: SyntaxKind, close: SyntaxKind) -> Vec<GreenElement> {
    let mut children = vec![punct(open)];
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            children.push(punct(SyntaxKind::Comma));
            children.push(space());
        }
        children.push(NodeOrToken::Node(item));
    }
    children.push(punct(close));
    children
}

pub fn identifier_name(name: &str) -> GreenNode {
    node(
        SyntaxKind::IdentifierName,
        vec![token(SyntaxKind::Identifier, name)],
    )
}

/// Parse `text` as a type (`int`, `List<string>`, `System.EventArgs`).
pub fn type_name(text: &str) -> Result<GreenNode, ParseError> {
    crate::parser::parse_type_name(text)
}

pub fn argument(expression: GreenNode) -> GreenNode {
    node(SyntaxKind::Argument, vec![NodeOrToken::Node(expression)])
}

/// `(a, b, c)`; each expression is wrapped in an `Argument`.
pub fn argument_list(expressions: Vec<GreenNode>) -> GreenNode {
    let arguments = expressions.into_iter().map(argument).collect();
    node(
        SyntaxKind::ArgumentList,
        separated(arguments, SyntaxKind::LParen, SyntaxKind::RParen),
    )
}

pub fn invocation(expression: GreenNode, argument_list: GreenNode) -> GreenNode {
    node(
        SyntaxKind::InvocationExpression,
        vec![NodeOrToken::Node(expression), NodeOrToken::Node(argument_list)],
    )
}

pub fn parameter(ty: GreenNode, name: &str) -> GreenNode {
    node(
        SyntaxKind::Parameter,
        vec![
            NodeOrToken::Node(ty),
            space(),
            token(SyntaxKind::Identifier, name),
        ],
    )
}

pub fn parameter_list(parameters: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::ParameterList,
        separated(parameters, SyntaxKind::LParen, SyntaxKind::RParen),
    )
}

pub fn expression_statement(expression: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ExpressionStatement,
        vec![NodeOrToken::Node(expression), punct(SyntaxKind::Semicolon)],
    )
}

pub fn return_statement(expression: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ReturnStatement,
        vec![
            punct(SyntaxKind::ReturnKw),
            space(),
            NodeOrToken::Node(expression),
            punct(SyntaxKind::Semicolon),
        ],
    )
}

/// `{ s1 s2 }`, or `{ }` when empty.
pub fn block(statements: Vec<GreenNode>) -> GreenNode {
    let mut children = vec![punct(SyntaxKind::LBrace), space()];
    for statement in statements {
        children.push(NodeOrToken::Node(statement));
        children.push(space());
    }
    children.push(punct(SyntaxKind::RBrace));
    node(SyntaxKind::Block, children)
}

/// `delegate(params) body`, or `delegate body` when `parameters` is `None`.
pub fn anonymous_method(parameters: Option<GreenNode>, body: GreenNode) -> GreenNode {
    let mut children = vec![punct(SyntaxKind::DelegateKw)];
    if let Some(parameters) = parameters {
        children.push(NodeOrToken::Node(parameters));
    }
    children.push(space());
    children.push(NodeOrToken::Node(body));
    node(SyntaxKind::AnonymousMethodExpression, children)
}
