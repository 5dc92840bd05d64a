use crate::ast::{support, AstNode};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

macro_rules! ast_node {
    ($($name:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$name
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    )*};
}

ast_node!(
    CompilationUnit,
    UsingDirective,
    NameEquals,
    NamespaceDeclaration,
    DelegateDeclaration,
    TypeParameterList,
    TypeParameter,
    BaseList,
    MethodDeclaration,
    ConstructorDeclaration,
    FieldDeclaration,
    PropertyDeclaration,
    EventFieldDeclaration,
    EventDeclaration,
    ArrowExpressionClause,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,
    ParameterList,
    Parameter,
    Block,
    LocalDeclarationStatement,
    ExpressionStatement,
    ReturnStatement,
    IdentifierName,
    GenericName,
    TypeArgumentList,
    QualifiedName,
    PredefinedType,
    ArrayType,
    MemberAccessExpression,
    InvocationExpression,
    ArgumentList,
    Argument,
    ObjectCreationExpression,
    AnonymousMethodExpression,
    SimpleLambdaExpression,
    ParenthesizedLambdaExpression,
    AssignmentExpression,
    CastExpression,
    ParenthesizedExpression,
    LiteralExpression,
);

/// A class, struct or interface declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for TypeDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Self::can_cast(syntax.kind()).then_some(Self { syntax })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

/// Any node that spells a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    IdentifierName(IdentifierName),
    GenericName(GenericName),
    QualifiedName(QualifiedName),
    PredefinedType(PredefinedType),
    ArrayType(ArrayType),
}

impl AstNode for Type {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_type()
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        let ty = match syntax.kind() {
            SyntaxKind::IdentifierName => Type::IdentifierName(IdentifierName { syntax }),
            SyntaxKind::GenericName => Type::GenericName(GenericName { syntax }),
            SyntaxKind::QualifiedName => Type::QualifiedName(QualifiedName { syntax }),
            SyntaxKind::PredefinedType => Type::PredefinedType(PredefinedType { syntax }),
            SyntaxKind::ArrayType => Type::ArrayType(ArrayType { syntax }),
            _ => return None,
        };
        Some(ty)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Type::IdentifierName(it) => &it.syntax,
            Type::GenericName(it) => &it.syntax,
            Type::QualifiedName(it) => &it.syntax,
            Type::PredefinedType(it) => &it.syntax,
            Type::ArrayType(it) => &it.syntax,
        }
    }
}

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> + '_ {
        support::children::<UsingDirective>(&self.syntax)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = NamespaceDeclaration> + '_ {
        support::children::<NamespaceDeclaration>(&self.syntax)
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> + '_ {
        support::children::<TypeDeclaration>(&self.syntax)
    }

    pub fn delegates(&self) -> impl Iterator<Item = DelegateDeclaration> + '_ {
        support::children::<DelegateDeclaration>(&self.syntax)
    }
}

impl UsingDirective {
    pub fn alias(&self) -> Option<NameEquals> {
        support::child(&self.syntax)
    }

    /// The imported namespace, or the alias target.
    pub fn target(&self) -> Option<Type> {
        support::child(&self.syntax)
    }
}

impl NameEquals {
    pub fn name(&self) -> Option<IdentifierName> {
        support::child(&self.syntax)
    }
}

impl NamespaceDeclaration {
    pub fn name(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> + '_ {
        support::children::<UsingDirective>(&self.syntax)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = NamespaceDeclaration> + '_ {
        support::children::<NamespaceDeclaration>(&self.syntax)
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> + '_ {
        support::children::<TypeDeclaration>(&self.syntax)
    }

    pub fn delegates(&self) -> impl Iterator<Item = DelegateDeclaration> + '_ {
        support::children::<DelegateDeclaration>(&self.syntax)
    }
}

impl TypeDeclaration {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        support::child(&self.syntax)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDeclaration> + '_ {
        support::children::<MethodDeclaration>(&self.syntax)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDeclaration> + '_ {
        support::children::<FieldDeclaration>(&self.syntax)
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertyDeclaration> + '_ {
        support::children::<PropertyDeclaration>(&self.syntax)
    }

    pub fn event_fields(&self) -> impl Iterator<Item = EventFieldDeclaration> + '_ {
        support::children::<EventFieldDeclaration>(&self.syntax)
    }

    pub fn events(&self) -> impl Iterator<Item = EventDeclaration> + '_ {
        support::children::<EventDeclaration>(&self.syntax)
    }

    pub fn nested_types(&self) -> impl Iterator<Item = TypeDeclaration> + '_ {
        support::children::<TypeDeclaration>(&self.syntax)
    }

    pub fn delegates(&self) -> impl Iterator<Item = DelegateDeclaration> + '_ {
        support::children::<DelegateDeclaration>(&self.syntax)
    }
}

impl DelegateDeclaration {
    pub fn return_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        support::child(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }
}

impl TypeParameterList {
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        support::children::<TypeParameter>(&self.syntax).filter_map(|param| {
            support::token(param.syntax(), SyntaxKind::Identifier).map(|t| t.text().to_string())
        })
    }
}

impl MethodDeclaration {
    pub fn return_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
        support::child(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        support::child(&self.syntax)
    }

    pub fn expression_body(&self) -> Option<ArrowExpressionClause> {
        support::child(&self.syntax)
    }
}

impl ConstructorDeclaration {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }
}

impl FieldDeclaration {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }
}

impl EventFieldDeclaration {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }
}

impl LocalDeclarationStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        support::child(&self.syntax)
    }
}

impl PropertyDeclaration {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl EventDeclaration {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl ArrowExpressionClause {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

impl VariableDeclaration {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        support::children::<VariableDeclarator>(&self.syntax)
    }
}

impl VariableDeclarator {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Identifier)
    }

    pub fn initializer(&self) -> Option<EqualsValueClause> {
        support::child(&self.syntax)
    }
}

impl EqualsValueClause {
    pub fn value(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        support::children::<Parameter>(&self.syntax)
    }
}

impl Parameter {
    /// `None` for implicitly typed lambda parameters.
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children()
    }
}

impl ExpressionStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

impl ReturnStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

impl IdentifierName {
    pub fn token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Identifier)
    }

    /// Identifier text with any `@` verbatim prefix removed.
    pub fn text(&self) -> String {
        self.token()
            .map(|t| t.text().trim_start_matches('@').to_string())
            .unwrap_or_default()
    }
}

impl GenericName {
    pub fn text(&self) -> String {
        support::token(&self.syntax, SyntaxKind::Identifier)
            .map(|t| t.text().trim_start_matches('@').to_string())
            .unwrap_or_default()
    }

    pub fn type_argument_list(&self) -> Option<TypeArgumentList> {
        support::child(&self.syntax)
    }

    pub fn type_arguments(&self) -> Vec<Type> {
        self.type_argument_list()
            .map(|list| list.arguments().collect())
            .unwrap_or_default()
    }
}

impl TypeArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Type> + '_ {
        support::children::<Type>(&self.syntax)
    }
}

impl QualifiedName {
    pub fn left(&self) -> Option<Type> {
        support::children::<Type>(&self.syntax).next()
    }

    pub fn right(&self) -> Option<Type> {
        support::children::<Type>(&self.syntax).nth(1)
    }
}

impl PredefinedType {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind().is_predefined_type())
    }
}

impl ArrayType {
    pub fn element_type(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn rank_count(&self) -> usize {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::ArrayRankSpecifier)
            .count()
    }
}

impl MemberAccessExpression {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 0)
    }

    /// The accessed member: the node right of the `.`.
    pub fn name(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 1)
    }
}

impl InvocationExpression {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 0)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child(&self.syntax)
    }
}

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> + '_ {
        support::children::<Argument>(&self.syntax)
    }
}

impl Argument {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

impl ObjectCreationExpression {
    pub fn ty(&self) -> Option<Type> {
        support::child(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child(&self.syntax)
    }
}

impl AnonymousMethodExpression {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        support::child(&self.syntax)
    }
}

impl SimpleLambdaExpression {
    pub fn parameter(&self) -> Option<Parameter> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 1)
    }
}

impl ParenthesizedLambdaExpression {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 1)
    }
}

impl AssignmentExpression {
    pub fn left(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 0)
    }

    pub fn right(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 1)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind().is_assignment_operator())
    }
}

impl CastExpression {
    pub fn ty(&self) -> Option<Type> {
        support::nth_child(&self.syntax, 0).and_then(Type::cast)
    }

    pub fn expression(&self) -> Option<SyntaxNode> {
        support::nth_child(&self.syntax, 1)
    }
}

impl ParenthesizedExpression {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }
}

impl LiteralExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| !tok.kind().is_trivia())
    }
}
