use crate::ast::{AstNode, IdentifierName};
use crate::tree::{grandparent_of, parent_of};
use crate::{SyntaxKind, SyntaxNode};

impl IdentifierName {
    /// `true` when the identifier sits two levels below an event declaration, e.g. the
    /// `Handler` in `event Handler E;`.
    pub fn in_event_declaration(&self) -> bool {
        grandparent_of(self.syntax()).map_or(false, |g| {
            matches!(
                g.kind(),
                SyntaxKind::EventDeclaration | SyntaxKind::EventFieldDeclaration
            )
        })
    }

    /// The enclosing member access when this identifier is the name to the right of
    /// its `.`.
    pub fn member_access_parent(&self) -> Option<SyntaxNode> {
        let parent = parent_of(self.syntax())?;
        if parent.kind() != SyntaxKind::MemberAccessExpression {
            return None;
        }
        let name = parent.children().nth(1)?;
        (&name == self.syntax()).then_some(parent)
    }

    /// `true` when the identifier spells (part of) a type rather than reading a value.
    pub fn is_type_syntax(&self) -> bool {
        is_type_syntax(self.syntax())
    }

    /// `true` for the left-hand side of an assignment (`x = ...`, `x += ...`).
    pub fn is_assignment_target(&self) -> bool {
        parent_of(self.syntax()).map_or(false, |parent| {
            parent.kind() == SyntaxKind::AssignmentExpression
                && parent.first_child().as_ref() == Some(self.syntax())
        })
    }
}

/// `true` when `node` sits where the grammar expects a type rather than an expression.
pub fn is_type_syntax(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let is_first_child = parent.first_child().as_ref() == Some(node);
    match parent.kind() {
        SyntaxKind::VariableDeclaration | SyntaxKind::CastExpression => is_first_child,
        SyntaxKind::Parameter
        | SyntaxKind::MethodDeclaration
        | SyntaxKind::DelegateDeclaration
        | SyntaxKind::PropertyDeclaration
        | SyntaxKind::EventDeclaration
        | SyntaxKind::ObjectCreationExpression
        | SyntaxKind::TypeArgumentList
        | SyntaxKind::BaseList
        | SyntaxKind::UsingDirective
        | SyntaxKind::NameEquals
        | SyntaxKind::NamespaceDeclaration
        | SyntaxKind::ExplicitInterfaceSpecifier
        | SyntaxKind::QualifiedName
        | SyntaxKind::ArrayType => true,
        _ => false,
    }
}
