use std::collections::VecDeque;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, NodeOrToken};
use text_size::{TextRange, TextSize};

use crate::lexer::{lex_with_errors, Token};
use crate::syntax_kind::{CSharpLanguage, SyntaxKind};
use crate::tree::SyntaxTree;
use crate::ParseError;

pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;

/// Result of parsing a compilation unit.
///
/// Parsing never fails: malformed input produces `Error` nodes plus entries in
/// `errors`, and the tree still reproduces the input text byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub tree: SyntaxTree,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        self.tree.root()
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn parse(input: &str) -> Parse {
    Parser::new(input).parse()
}

/// Parse a standalone type name such as `Dictionary<string, int>` or `System.EventArgs`.
///
/// Surrounding whitespace is ignored. The returned green node is the type node
/// itself (`IdentifierName`, `GenericName`, `QualifiedName`, `PredefinedType` or
/// `ArrayType`), ready to be spliced into a larger tree.
pub fn parse_type_name(text: &str) -> Result<GreenNode, ParseError> {
    let mut p = Parser::new(text.trim());
    if !p.at_type_start() {
        return Err(ParseError {
            message: format!("`{}` is not a type name", text.trim()),
            range: TextRange::up_to(TextSize::of(text.trim())),
        });
    }
    p.parse_type();
    if let Some(err) = p.errors.into_iter().next() {
        return Err(err);
    }
    if !p.tokens.is_empty() {
        let range = p.tokens.front().map(|t| t.range).unwrap_or_default();
        return Err(ParseError {
            message: "unexpected trailing tokens after type name".to_string(),
            range,
        });
    }
    Ok(p.builder.finish())
}

struct Parser<'a> {
    input: &'a str,
    tokens: VecDeque<Token>,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let (tokens, lex_errors) = lex_with_errors(input);
        let errors = lex_errors
            .into_iter()
            .map(|e| ParseError {
                message: e.message,
                range: e.range,
            })
            .collect();
        Self {
            input,
            tokens: VecDeque::from(tokens),
            builder: GreenNodeBuilder::new(),
            errors,
        }
    }

    fn parse(mut self) -> Parse {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());
        self.eat_trivia();

        self.parse_namespace_body(false);

        self.eat_trivia();
        self.builder.finish_node();

        tracing::trace!(
            target = "recast.syntax",
            len = self.input.len(),
            errors = self.errors.len(),
            "parsed compilation unit"
        );
        Parse {
            tree: SyntaxTree::new(self.builder.finish()),
            errors: self.errors,
        }
    }

    /// Usings followed by namespace members, up to `}` (when `braced`) or end of input.
    fn parse_namespace_body(&mut self, braced: bool) {
        while self.at(SyntaxKind::UsingKw) {
            self.parse_using_directive();
        }

        while !self.at(SyntaxKind::Eof) {
            if braced && self.at(SyntaxKind::RBrace) {
                break;
            }
            if self.at(SyntaxKind::NamespaceKw) {
                self.parse_namespace();
            } else if self.at_type_decl_start() {
                self.parse_type_declaration();
            } else {
                self.recover_top_level();
            }
        }
    }

    fn parse_using_directive(&mut self) {
        self.start(SyntaxKind::UsingDirective);
        self.expect(SyntaxKind::UsingKw, "expected `using`");
        if self.at_ident() && self.nth(1) == Some(SyntaxKind::Eq) {
            self.start(SyntaxKind::NameEquals);
            self.parse_identifier_name();
            self.bump(); // =
            self.finish();
        }
        if self.at_type_start() {
            self.parse_type();
        } else {
            self.error_here("expected namespace or type name");
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after using directive");
        self.finish();
    }

    fn parse_namespace(&mut self) {
        self.start(SyntaxKind::NamespaceDeclaration);
        self.expect(SyntaxKind::NamespaceKw, "expected `namespace`");
        if self.at_ident() {
            self.parse_type();
        } else {
            self.error_here("expected namespace name");
        }

        if self.at(SyntaxKind::Semicolon) {
            // File-scoped namespace: the rest of the file belongs to it.
            self.bump();
            self.parse_namespace_body(false);
        } else if self.expect(SyntaxKind::LBrace, "expected `{` or `;` after namespace name") {
            self.parse_namespace_body(true);
            self.expect(SyntaxKind::RBrace, "expected `}` to close namespace");
        }
        self.finish();
    }

    fn parse_type_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        match self.current() {
            SyntaxKind::ClassKw => self.parse_class_like(checkpoint, SyntaxKind::ClassDeclaration),
            SyntaxKind::StructKw => {
                self.parse_class_like(checkpoint, SyntaxKind::StructDeclaration)
            }
            SyntaxKind::InterfaceKw => {
                self.parse_class_like(checkpoint, SyntaxKind::InterfaceDeclaration)
            }
            SyntaxKind::DelegateKw => self.parse_delegate_declaration(checkpoint),
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::Error.into());
                self.error_here("expected type declaration");
                self.recover_to_member_boundary();
                self.finish();
            }
        }
    }

    fn parse_class_like(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
        self.bump(); // class / struct / interface
        self.expect_ident("expected type name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }

        if self.expect(SyntaxKind::LBrace, "expected `{` to start type body") {
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                self.parse_member();
            }
            self.expect(SyntaxKind::RBrace, "expected `}` to close type body");
        }
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        }
        self.finish();
    }

    fn parse_base_list(&mut self) {
        self.start(SyntaxKind::BaseList);
        self.bump(); // :
        loop {
            if self.at_type_start() {
                self.parse_type();
            } else {
                self.error_here("expected base type");
                break;
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.finish();
    }

    fn parse_delegate_declaration(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::DelegateDeclaration.into());
        self.bump(); // delegate
        if self.at_type_start() {
            self.parse_type();
        } else {
            self.error_here("expected delegate return type");
        }
        self.expect_ident("expected delegate name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::LParen) {
            self.parse_parameter_list();
        } else {
            self.error_here("expected `(`");
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after delegate declaration");
        self.finish();
    }

    fn parse_type_parameter_list(&mut self) {
        self.start(SyntaxKind::TypeParameterList);
        self.bump(); // <
        loop {
            self.start(SyntaxKind::TypeParameter);
            self.expect_ident("expected type parameter name");
            self.finish();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::Greater, "expected `>`");
        self.finish();
    }

    fn parse_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();

        match self.current() {
            SyntaxKind::ClassKw => self.parse_class_like(checkpoint, SyntaxKind::ClassDeclaration),
            SyntaxKind::StructKw => {
                self.parse_class_like(checkpoint, SyntaxKind::StructDeclaration)
            }
            SyntaxKind::InterfaceKw => {
                self.parse_class_like(checkpoint, SyntaxKind::InterfaceDeclaration)
            }
            SyntaxKind::DelegateKw => self.parse_delegate_declaration(checkpoint),
            SyntaxKind::EventKw => self.parse_event(checkpoint),
            SyntaxKind::Identifier if self.nth(1) == Some(SyntaxKind::LParen) => {
                self.parse_constructor(checkpoint)
            }
            _ if self.at_type_start() => {
                let type_checkpoint = self.checkpoint();
                self.parse_type();
                if !self.at_ident() {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::Error.into());
                    self.error_here("expected member name");
                    self.recover_to_member_boundary();
                    self.finish();
                    return;
                }
                match self.nth(1) {
                    Some(SyntaxKind::LParen) | Some(SyntaxKind::Less) => {
                        self.parse_method(checkpoint)
                    }
                    Some(SyntaxKind::LBrace) | Some(SyntaxKind::FatArrow) => {
                        self.parse_property(checkpoint)
                    }
                    _ => self.parse_field(checkpoint, type_checkpoint),
                }
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::Error.into());
                self.error_here("expected member declaration");
                if !self.at(SyntaxKind::RBrace) {
                    self.bump_any();
                }
                self.recover_to_member_boundary();
                self.finish();
            }
        }
    }

    fn parse_method(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::MethodDeclaration.into());
        self.bump(); // name
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::LParen) {
            self.parse_parameter_list();
        } else {
            self.error_here("expected `(`");
        }
        self.parse_method_body();
        self.finish();
    }

    fn parse_constructor(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration.into());
        self.bump(); // name
        self.parse_parameter_list();
        self.parse_method_body();
        self.finish();
    }

    fn parse_method_body(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::FatArrow => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::Semicolon, "expected `;` after expression body");
            }
            _ => {
                self.expect(SyntaxKind::Semicolon, "expected method body or `;`");
            }
        }
    }

    fn parse_property(&mut self, checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::PropertyDeclaration.into());
        self.bump(); // name
        if self.at(SyntaxKind::FatArrow) {
            self.parse_arrow_expression_clause();
            self.expect(SyntaxKind::Semicolon, "expected `;` after expression body");
        } else {
            self.parse_accessor_list();
            if self.at(SyntaxKind::Eq) {
                self.start(SyntaxKind::EqualsValueClause);
                self.bump();
                self.parse_expression(0);
                self.finish();
                self.expect(SyntaxKind::Semicolon, "expected `;` after property initializer");
            }
        }
        self.finish();
    }

    fn parse_field(&mut self, checkpoint: Checkpoint, type_checkpoint: Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::FieldDeclaration.into());
        self.builder
            .start_node_at(type_checkpoint, SyntaxKind::VariableDeclaration.into());
        self.parse_variable_declarators();
        self.finish();
        self.expect(SyntaxKind::Semicolon, "expected `;` after field declaration");
        self.finish();
    }

    fn parse_event(&mut self, checkpoint: Checkpoint) {
        self.bump(); // event
        let type_checkpoint = self.checkpoint();
        if self.at_type_start() {
            self.parse_type();
        } else {
            self.error_here("expected event type");
        }

        let is_property_like = self.at_ident()
            && matches!(
                self.nth(1),
                Some(SyntaxKind::LBrace) | Some(SyntaxKind::Dot)
            );
        if is_property_like {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::EventDeclaration.into());
            if self.nth(1) == Some(SyntaxKind::Dot) {
                self.start(SyntaxKind::ExplicitInterfaceSpecifier);
                self.parse_identifier_name();
                self.bump(); // .
                self.finish();
            }
            self.expect_ident("expected event name");
            self.parse_accessor_list();
        } else {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::EventFieldDeclaration.into());
            self.builder
                .start_node_at(type_checkpoint, SyntaxKind::VariableDeclaration.into());
            self.parse_variable_declarators();
            self.finish();
            self.expect(SyntaxKind::Semicolon, "expected `;` after event declaration");
        }
        self.finish();
    }

    fn parse_accessor_list(&mut self) {
        self.start(SyntaxKind::AccessorList);
        if !self.expect(SyntaxKind::LBrace, "expected `{`") {
            self.finish();
            return;
        }
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if !self.at_ident() && !self.current().is_modifier() {
                self.start(SyntaxKind::Error);
                self.error_here("expected accessor");
                self.bump_any();
                self.finish();
                continue;
            }
            self.start(SyntaxKind::AccessorDeclaration);
            self.parse_modifiers();
            self.expect_ident("expected accessor keyword");
            match self.current() {
                SyntaxKind::LBrace => self.parse_block(),
                SyntaxKind::FatArrow => {
                    self.parse_arrow_expression_clause();
                    self.expect(SyntaxKind::Semicolon, "expected `;`");
                }
                _ => {
                    self.expect(SyntaxKind::Semicolon, "expected accessor body or `;`");
                }
            }
            self.finish();
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close accessor list");
        self.finish();
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.start(SyntaxKind::ArrowExpressionClause);
        self.bump(); // =>
        self.parse_expression(0);
        self.finish();
    }

    fn parse_parameter_list(&mut self) {
        self.start(SyntaxKind::ParameterList);
        self.expect(SyntaxKind::LParen, "expected `(`");
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.parse_parameter();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.finish();
    }

    fn parse_parameter(&mut self) {
        self.start(SyntaxKind::Parameter);
        let implicitly_typed = self.at_ident()
            && matches!(
                self.nth(1),
                Some(SyntaxKind::Comma) | Some(SyntaxKind::RParen)
            );
        if implicitly_typed {
            self.bump();
        } else if self.at_type_start() {
            self.parse_type();
            self.expect_ident("expected parameter name");
            if self.at(SyntaxKind::Eq) {
                self.start(SyntaxKind::EqualsValueClause);
                self.bump();
                self.parse_expression(0);
                self.finish();
            }
        } else {
            self.error_here("expected parameter");
        }
        self.finish();
    }

    // --- Statements ---

    fn parse_block(&mut self) {
        self.start(SyntaxKind::Block);
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_statement();
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.finish();
    }

    fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::Semicolon => {
                self.start(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish();
            }
            SyntaxKind::ReturnKw => {
                self.start(SyntaxKind::ReturnStatement);
                self.bump();
                if !self.at(SyntaxKind::Semicolon) {
                    self.parse_expression(0);
                }
                self.expect(SyntaxKind::Semicolon, "expected `;` after return statement");
                self.finish();
            }
            SyntaxKind::IfKw => {
                self.start(SyntaxKind::IfStatement);
                self.bump();
                self.expect(SyntaxKind::LParen, "expected `(` after `if`");
                self.parse_expression(0);
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.parse_statement();
                if self.at(SyntaxKind::ElseKw) {
                    self.start(SyntaxKind::ElseClause);
                    self.bump();
                    self.parse_statement();
                    self.finish();
                }
                self.finish();
            }
            _ if self.at_local_declaration_start() => {
                self.start(SyntaxKind::LocalDeclarationStatement);
                self.parse_modifiers();
                self.start(SyntaxKind::VariableDeclaration);
                self.parse_type();
                self.parse_variable_declarators();
                self.finish();
                self.expect(SyntaxKind::Semicolon, "expected `;` after local declaration");
                self.finish();
            }
            kind if can_start_expression(kind) => {
                self.start(SyntaxKind::ExpressionStatement);
                self.parse_expression(0);
                self.expect(SyntaxKind::Semicolon, "expected `;` after expression");
                self.finish();
            }
            _ => {
                self.start(SyntaxKind::Error);
                self.error_here("expected statement");
                self.bump_any();
                self.finish();
            }
        }
    }

    fn parse_variable_declarators(&mut self) {
        loop {
            self.start(SyntaxKind::VariableDeclarator);
            self.expect_ident("expected variable name");
            if self.at(SyntaxKind::Eq) {
                self.start(SyntaxKind::EqualsValueClause);
                self.bump();
                self.parse_expression(0);
                self.finish();
            }
            self.finish();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
    }

    fn at_local_declaration_start(&mut self) -> bool {
        let mut i = skip_trivia(&self.tokens, 0);
        while self.tokens.get(i).map_or(false, |t| t.kind == SyntaxKind::ConstKw) {
            i = skip_trivia(&self.tokens, i + 1);
        }
        let Some(after_type) = scan_type(&self.tokens, i) else {
            return false;
        };
        let name = skip_trivia(&self.tokens, after_type);
        if kind_at(&self.tokens, name) != SyntaxKind::Identifier {
            return false;
        }
        let next = skip_trivia(&self.tokens, name + 1);
        matches!(
            kind_at(&self.tokens, next),
            SyntaxKind::Eq | SyntaxKind::Semicolon | SyntaxKind::Comma
        )
    }

    // --- Types ---

    fn parse_type(&mut self) {
        let checkpoint = self.checkpoint();
        if self.current().is_predefined_type() {
            self.start(SyntaxKind::PredefinedType);
            self.bump();
            self.finish();
        } else if self.at_ident() {
            self.parse_simple_type_name();
            while self.at(SyntaxKind::Dot) && self.nth(1) == Some(SyntaxKind::Identifier) {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::QualifiedName.into());
                self.bump(); // .
                self.parse_simple_type_name();
                self.finish();
            }
        } else {
            self.error_here("expected type");
            return;
        }

        if self.at(SyntaxKind::LBracket) && self.nth(1) == Some(SyntaxKind::RBracket) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ArrayType.into());
            while self.at(SyntaxKind::LBracket) && self.nth(1) == Some(SyntaxKind::RBracket) {
                self.start(SyntaxKind::ArrayRankSpecifier);
                self.bump();
                self.bump();
                self.finish();
            }
            self.finish();
        }
    }

    fn parse_simple_type_name(&mut self) {
        let first = skip_trivia(&self.tokens, 0);
        let less = skip_trivia(&self.tokens, first + 1);
        if kind_at(&self.tokens, less) == SyntaxKind::Less
            && scan_type_argument_list(&self.tokens, less).is_some()
        {
            self.parse_generic_name();
        } else {
            self.parse_identifier_name();
        }
    }

    fn parse_identifier_name(&mut self) {
        self.start(SyntaxKind::IdentifierName);
        self.expect_ident("expected identifier");
        self.finish();
    }

    fn parse_generic_name(&mut self) {
        self.start(SyntaxKind::GenericName);
        self.bump(); // identifier
        self.start(SyntaxKind::TypeArgumentList);
        self.bump(); // <
        loop {
            if self.at_type_start() {
                self.parse_type();
            } else {
                self.error_here("expected type argument");
                break;
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::Greater, "expected `>`");
        self.finish();
        self.finish();
    }

    // --- Expressions ---

    fn parse_expression(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();

        loop {
            let op = self.current();
            if op.is_assignment_operator() {
                if min_bp > ASSIGNMENT_BP {
                    break;
                }
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::AssignmentExpression.into());
                self.bump();
                // Right associative: `a = b = c` is `a = (b = c)`.
                self.parse_expression(ASSIGNMENT_BP);
                self.finish();
                continue;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.builder
                .start_node_at(checkpoint, SyntaxKind::BinaryExpression.into());
            self.bump();
            self.parse_expression(r_bp);
            self.finish();
        }
    }

    fn parse_unary(&mut self) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::Bang
            | SyntaxKind::Minus
            | SyntaxKind::Plus
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.start(SyntaxKind::PrefixUnaryExpression);
                self.bump();
                self.parse_unary();
                self.finish();
                return;
            }
            SyntaxKind::LParen if self.at_cast() => {
                self.start(SyntaxKind::CastExpression);
                self.bump(); // (
                self.parse_type();
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.parse_unary();
                self.finish();
                return;
            }
            _ => {}
        }

        self.parse_primary();
        self.parse_postfix(checkpoint);
    }

    fn parse_primary(&mut self) {
        let kind = self.current();
        match kind {
            _ if kind.is_literal() => {
                self.start(SyntaxKind::LiteralExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::ThisKw => {
                self.start(SyntaxKind::ThisExpression);
                self.bump();
                self.finish();
            }
            SyntaxKind::NewKw => {
                self.start(SyntaxKind::ObjectCreationExpression);
                self.bump();
                if self.at_type_start() {
                    self.parse_type();
                } else {
                    self.error_here("expected type after `new`");
                }
                if self.at(SyntaxKind::LParen) {
                    self.parse_argument_list();
                } else {
                    self.error_here("expected `(`");
                }
                self.finish();
            }
            SyntaxKind::DelegateKw => {
                self.start(SyntaxKind::AnonymousMethodExpression);
                self.bump();
                if self.at(SyntaxKind::LParen) {
                    self.parse_parameter_list();
                }
                self.parse_block();
                self.finish();
            }
            SyntaxKind::Identifier if self.nth(1) == Some(SyntaxKind::FatArrow) => {
                self.start(SyntaxKind::SimpleLambdaExpression);
                self.start(SyntaxKind::Parameter);
                self.bump();
                self.finish();
                self.bump(); // =>
                self.parse_lambda_body();
                self.finish();
            }
            SyntaxKind::LParen if self.at_parenthesized_lambda() => {
                self.start(SyntaxKind::ParenthesizedLambdaExpression);
                self.parse_parameter_list();
                self.expect(SyntaxKind::FatArrow, "expected `=>`");
                self.parse_lambda_body();
                self.finish();
            }
            SyntaxKind::LParen => {
                self.start(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.parse_expression(0);
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.finish();
            }
            SyntaxKind::Identifier => self.parse_simple_name_expression(),
            _ if kind.is_predefined_type() => {
                // `int.Parse(..)`, `string.Empty`
                self.start(SyntaxKind::PredefinedType);
                self.bump();
                self.finish();
            }
            _ => {
                self.start(SyntaxKind::Error);
                self.error_here("expected expression");
                if !matches!(
                    kind,
                    SyntaxKind::Semicolon
                        | SyntaxKind::RParen
                        | SyntaxKind::RBrace
                        | SyntaxKind::Comma
                        | SyntaxKind::Eof
                ) {
                    self.bump_any();
                }
                self.finish();
            }
        }
    }

    fn parse_postfix(&mut self, checkpoint: Checkpoint) {
        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MemberAccessExpression.into());
                    self.bump();
                    if self.at_ident() {
                        self.parse_simple_name_expression();
                    } else {
                        self.error_here("expected member name after `.`");
                    }
                    self.finish();
                }
                SyntaxKind::LParen => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::InvocationExpression.into());
                    self.parse_argument_list();
                    self.finish();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression.into());
                    self.bump();
                    self.finish();
                }
                _ => break,
            }
        }
    }

    /// `Foo` or `Foo<int>` in expression position.
    ///
    /// `a < b` only becomes a generic name when the closing `>` is followed by a
    /// token that cannot continue a relational expression.
    fn parse_simple_name_expression(&mut self) {
        let first = skip_trivia(&self.tokens, 0);
        let less = skip_trivia(&self.tokens, first + 1);
        let is_generic = kind_at(&self.tokens, less) == SyntaxKind::Less
            && scan_type_argument_list(&self.tokens, less).map_or(false, |end| {
                let follow = skip_trivia(&self.tokens, end);
                matches!(
                    kind_at(&self.tokens, follow),
                    SyntaxKind::LParen
                        | SyntaxKind::RParen
                        | SyntaxKind::RBracket
                        | SyntaxKind::RBrace
                        | SyntaxKind::Colon
                        | SyntaxKind::Semicolon
                        | SyntaxKind::Comma
                        | SyntaxKind::Dot
                        | SyntaxKind::Question
                        | SyntaxKind::EqEq
                        | SyntaxKind::BangEq
                        | SyntaxKind::Eof
                )
            });
        if is_generic {
            self.parse_generic_name();
        } else {
            self.parse_identifier_name();
        }
    }

    fn parse_lambda_body(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.parse_expression(0);
        }
    }

    fn parse_argument_list(&mut self) {
        self.start(SyntaxKind::ArgumentList);
        self.expect(SyntaxKind::LParen, "expected `(`");
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.start(SyntaxKind::Argument);
            self.parse_expression(0);
            self.finish();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.finish();
    }

    fn at_cast(&mut self) -> bool {
        let lparen = skip_trivia(&self.tokens, 0);
        let Some(after_type) = scan_type(&self.tokens, lparen + 1) else {
            return false;
        };
        let rparen = skip_trivia(&self.tokens, after_type);
        if kind_at(&self.tokens, rparen) != SyntaxKind::RParen {
            return false;
        }
        let operand = kind_at(&self.tokens, skip_trivia(&self.tokens, rparen + 1));
        operand == SyntaxKind::Identifier
            || operand.is_literal()
            || matches!(
                operand,
                SyntaxKind::ThisKw
                    | SyntaxKind::NewKw
                    | SyntaxKind::LParen
                    | SyntaxKind::DelegateKw
                    | SyntaxKind::Bang
                    | SyntaxKind::Tilde
            )
    }

    fn at_parenthesized_lambda(&mut self) -> bool {
        let lparen = skip_trivia(&self.tokens, 0);
        let Some(after) = skip_balanced_parens(&self.tokens, lparen) else {
            return false;
        };
        kind_at(&self.tokens, skip_trivia(&self.tokens, after)) == SyntaxKind::FatArrow
    }

    // --- Recovery ---

    fn recover_top_level(&mut self) {
        self.start(SyntaxKind::Error);
        self.error_here("unexpected token at top level");
        self.bump_any();
        self.recover_to(&[
            SyntaxKind::NamespaceKw,
            SyntaxKind::UsingKw,
            SyntaxKind::ClassKw,
            SyntaxKind::StructKw,
            SyntaxKind::InterfaceKw,
            SyntaxKind::DelegateKw,
            SyntaxKind::PublicKw,
            SyntaxKind::InternalKw,
            SyntaxKind::StaticKw,
            SyntaxKind::Eof,
        ]);
        self.finish();
    }

    fn recover_to_member_boundary(&mut self) {
        let mut recovery = vec![
            SyntaxKind::Semicolon,
            SyntaxKind::RBrace,
            SyntaxKind::ClassKw,
            SyntaxKind::StructKw,
            SyntaxKind::InterfaceKw,
            SyntaxKind::DelegateKw,
            SyntaxKind::EventKw,
        ];
        recovery.extend(MODIFIERS);
        self.recover_to(&recovery);
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        }
    }

    fn recover_to(&mut self, recovery: &[SyntaxKind]) {
        while !self.at(SyntaxKind::Eof) {
            if recovery.contains(&self.current()) {
                break;
            }
            self.bump_any();
        }
    }

    // --- Token helpers ---

    fn at_type_decl_start(&mut self) -> bool {
        let kind = self.current();
        kind.is_modifier()
            || matches!(
                kind,
                SyntaxKind::ClassKw
                    | SyntaxKind::StructKw
                    | SyntaxKind::InterfaceKw
                    | SyntaxKind::DelegateKw
            )
    }

    fn at_type_start(&mut self) -> bool {
        let kind = self.current();
        kind == SyntaxKind::Identifier || kind.is_predefined_type()
    }

    fn at_ident(&mut self) -> bool {
        self.at(SyntaxKind::Identifier)
    }

    fn parse_modifiers(&mut self) {
        while self.current().is_modifier() {
            self.bump();
        }
    }

    /// Start a node after attaching pending trivia to the enclosing node.
    fn start(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    fn current(&mut self) -> SyntaxKind {
        self.eat_trivia();
        self.tokens.front().map(|t| t.kind).unwrap_or(SyntaxKind::Eof)
    }

    fn nth(&mut self, n: usize) -> Option<SyntaxKind> {
        let mut idx = 0usize;
        let mut remaining = n;
        while let Some(tok) = self.tokens.get(idx) {
            if tok.kind.is_trivia() {
                idx += 1;
                continue;
            }
            if remaining == 0 {
                return Some(tok.kind);
            }
            remaining -= 1;
            idx += 1;
        }
        None
    }

    fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn eat_trivia(&mut self) {
        while self.tokens.front().map_or(false, |t| t.kind.is_trivia()) {
            self.bump_any();
        }
    }

    fn bump(&mut self) {
        self.eat_trivia();
        self.bump_any();
    }

    fn bump_any(&mut self) {
        if let Some(tok) = self.tokens.pop_front() {
            let text = tok.text(self.input);
            self.builder.token(tok.kind.into(), text);
        }
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_here(message);
            false
        }
    }

    fn expect_ident(&mut self, message: &str) {
        if self.at_ident() {
            self.bump();
        } else {
            self.error_here(message);
        }
    }

    fn error_here(&mut self, message: &str) {
        let range = self.current_range();
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    fn current_range(&mut self) -> TextRange {
        self.eat_trivia();
        self.tokens
            .front()
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(TextSize::of(self.input)))
    }
}

const MODIFIERS: [SyntaxKind; 12] = [
    SyntaxKind::AbstractKw,
    SyntaxKind::ConstKw,
    SyntaxKind::InternalKw,
    SyntaxKind::NewKw,
    SyntaxKind::OverrideKw,
    SyntaxKind::PrivateKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::PublicKw,
    SyntaxKind::ReadonlyKw,
    SyntaxKind::SealedKw,
    SyntaxKind::StaticKw,
    SyntaxKind::VirtualKw,
];

const ASSIGNMENT_BP: u8 = 1;

fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    let bp = match op {
        SyntaxKind::PipePipe => (3, 4),
        SyntaxKind::AmpAmp => (5, 6),
        SyntaxKind::Pipe => (7, 8),
        SyntaxKind::Caret => (9, 10),
        SyntaxKind::Amp => (11, 12),
        SyntaxKind::EqEq | SyntaxKind::BangEq => (13, 14),
        SyntaxKind::Less | SyntaxKind::LessEq | SyntaxKind::Greater | SyntaxKind::GreaterEq => {
            (15, 16)
        }
        SyntaxKind::Plus | SyntaxKind::Minus => (17, 18),
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => (19, 20),
        _ => return None,
    };
    Some(bp)
}

fn can_start_expression(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier
        || kind.is_literal()
        || kind.is_predefined_type()
        || matches!(
            kind,
            SyntaxKind::ThisKw
                | SyntaxKind::NewKw
                | SyntaxKind::DelegateKw
                | SyntaxKind::LParen
                | SyntaxKind::Bang
                | SyntaxKind::Minus
                | SyntaxKind::Plus
                | SyntaxKind::Tilde
                | SyntaxKind::PlusPlus
                | SyntaxKind::MinusMinus
        )
}

fn kind_at(tokens: &VecDeque<Token>, idx: usize) -> SyntaxKind {
    tokens.get(idx).map_or(SyntaxKind::Eof, |t| t.kind)
}

fn skip_trivia(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    while tokens.get(idx).map_or(false, |t| t.kind.is_trivia()) {
        idx += 1;
    }
    idx
}

/// Index just past the `)` matching the `(` at `idx`.
fn skip_balanced_parens(tokens: &VecDeque<Token>, mut idx: usize) -> Option<usize> {
    let mut depth = 0usize;
    while let Some(tok) = tokens.get(idx) {
        match tok.kind {
            SyntaxKind::LParen => depth += 1,
            SyntaxKind::RParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            SyntaxKind::LBrace | SyntaxKind::RBrace | SyntaxKind::Semicolon => return None,
            _ => {}
        }
        idx += 1;
    }
    None
}

/// Speculatively scan a type starting at `idx`; returns the index just past it.
fn scan_type(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut i = skip_trivia(tokens, idx);
    let kind = kind_at(tokens, i);
    if kind.is_predefined_type() {
        i += 1;
    } else if kind == SyntaxKind::Identifier {
        i = scan_simple_type_name(tokens, i);
        loop {
            let dot = skip_trivia(tokens, i);
            let name = skip_trivia(tokens, dot + 1);
            if kind_at(tokens, dot) == SyntaxKind::Dot
                && kind_at(tokens, name) == SyntaxKind::Identifier
            {
                i = scan_simple_type_name(tokens, name);
            } else {
                break;
            }
        }
    } else {
        return None;
    }

    loop {
        let open = skip_trivia(tokens, i);
        let close = skip_trivia(tokens, open + 1);
        if kind_at(tokens, open) == SyntaxKind::LBracket
            && kind_at(tokens, close) == SyntaxKind::RBracket
        {
            i = close + 1;
        } else {
            break;
        }
    }
    Some(i)
}

fn scan_simple_type_name(tokens: &VecDeque<Token>, ident: usize) -> usize {
    let less = skip_trivia(tokens, ident + 1);
    if kind_at(tokens, less) == SyntaxKind::Less {
        if let Some(end) = scan_type_argument_list(tokens, less) {
            return end;
        }
    }
    ident + 1
}

/// Scan `<T, U>` starting at the `<` at `idx`.
fn scan_type_argument_list(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut i = idx + 1;
    loop {
        i = scan_type(tokens, i)?;
        let next = skip_trivia(tokens, i);
        match kind_at(tokens, next) {
            SyntaxKind::Comma => i = next + 1,
            SyntaxKind::Greater => return Some(next + 1),
            _ => return None,
        }
    }
}

/// Render a tree as an indented `Kind@range` listing, one element per line.
pub fn debug_dump(node: &SyntaxNode) -> String {
    fn go(node: &SyntaxNode, indent: usize, out: &mut String) {
        use std::fmt::Write;
        let _ = writeln!(
            out,
            "{:indent$}{:?}@{:?}",
            "",
            node.kind(),
            node.text_range(),
            indent = indent
        );
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => go(&n, indent + 2, out),
                NodeOrToken::Token(t) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?} {:?}",
                        "",
                        t.kind(),
                        t.text(),
                        indent = indent + 2
                    );
                }
            }
        }
    }

    let mut out = String::new();
    go(node, 0, &mut out);
    out
}
