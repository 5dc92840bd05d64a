use rowan::Language;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Unified syntax kind for both tokens and syntax nodes.
///
/// Node kinds follow the conventional C# syntax model so that shape checks
/// ("is my grandparent an event field declaration?") read the same way they
/// would against a full compiler front-end.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    LineComment,
    BlockComment,

    // --- Identifiers & literals ---
    Identifier,
    IntLiteral,
    RealLiteral,
    CharLiteral,
    StringLiteral,

    // --- Keywords ---
    AbstractKw,
    BoolKw,
    ByteKw,
    CharKw,
    ClassKw,
    ConstKw,
    DecimalKw,
    DelegateKw,
    DoubleKw,
    ElseKw,
    EventKw,
    FalseKw,
    FloatKw,
    IfKw,
    InterfaceKw,
    InternalKw,
    IntKw,
    LongKw,
    NamespaceKw,
    NewKw,
    NullKw,
    ObjectKw,
    OverrideKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReadonlyKw,
    ReturnKw,
    SbyteKw,
    SealedKw,
    ShortKw,
    StaticKw,
    StringKw,
    StructKw,
    ThisKw,
    TrueKw,
    UintKw,
    UlongKw,
    UshortKw,
    UsingKw,
    VirtualKw,
    VoidKw,

    // --- Operators / punctuation ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    FatArrow,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,
    Bang,
    Amp,
    Pipe,
    Caret,

    Eq,
    EqEq,
    BangEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,

    // --- Special ---
    Error,
    Eof,

    // --- Nodes ---
    CompilationUnit,
    UsingDirective,
    NameEquals,
    NamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
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
    ExplicitInterfaceSpecifier,
    AccessorList,
    AccessorDeclaration,
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
    IfStatement,
    ElseClause,
    EmptyStatement,

    // Types
    IdentifierName,
    GenericName,
    TypeArgumentList,
    QualifiedName,
    PredefinedType,
    ArrayType,
    ArrayRankSpecifier,

    // Expressions
    MemberAccessExpression,
    InvocationExpression,
    ArgumentList,
    Argument,
    ObjectCreationExpression,
    AnonymousMethodExpression,
    SimpleLambdaExpression,
    ParenthesizedLambdaExpression,
    AssignmentExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    CastExpression,
    ParenthesizedExpression,
    LiteralExpression,
    ThisExpression,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment
        )
    }

    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::AbstractKw && self <= SyntaxKind::VoidKw
    }

    /// Keywords that spell a predefined type (`int`, `string`, `void`, ...).
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BoolKw
                | SyntaxKind::ByteKw
                | SyntaxKind::CharKw
                | SyntaxKind::DecimalKw
                | SyntaxKind::DoubleKw
                | SyntaxKind::FloatKw
                | SyntaxKind::IntKw
                | SyntaxKind::LongKw
                | SyntaxKind::ObjectKw
                | SyntaxKind::SbyteKw
                | SyntaxKind::ShortKw
                | SyntaxKind::StringKw
                | SyntaxKind::UintKw
                | SyntaxKind::UlongKw
                | SyntaxKind::UshortKw
                | SyntaxKind::VoidKw
        )
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::AbstractKw
                | SyntaxKind::ConstKw
                | SyntaxKind::InternalKw
                | SyntaxKind::NewKw
                | SyntaxKind::OverrideKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::PublicKw
                | SyntaxKind::ReadonlyKw
                | SyntaxKind::SealedKw
                | SyntaxKind::StaticKw
                | SyntaxKind::VirtualKw
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Eq
                | SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
        )
    }

    /// Node kinds that spell a type.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::PredefinedType
                | SyntaxKind::ArrayType
        )
    }

    /// Node kinds produced by the expression parser.
    ///
    /// `IdentifierName`, `GenericName` and `PredefinedType` double as types; callers
    /// that care about the distinction look at the parent.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::PredefinedType
                | SyntaxKind::MemberAccessExpression
                | SyntaxKind::InvocationExpression
                | SyntaxKind::ObjectCreationExpression
                | SyntaxKind::AnonymousMethodExpression
                | SyntaxKind::SimpleLambdaExpression
                | SyntaxKind::ParenthesizedLambdaExpression
                | SyntaxKind::AssignmentExpression
                | SyntaxKind::BinaryExpression
                | SyntaxKind::PrefixUnaryExpression
                | SyntaxKind::PostfixUnaryExpression
                | SyntaxKind::CastExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::LiteralExpression
                | SyntaxKind::ThisExpression
        )
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "bool" => SyntaxKind::BoolKw,
            "byte" => SyntaxKind::ByteKw,
            "char" => SyntaxKind::CharKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "decimal" => SyntaxKind::DecimalKw,
            "delegate" => SyntaxKind::DelegateKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "event" => SyntaxKind::EventKw,
            "false" => SyntaxKind::FalseKw,
            "float" => SyntaxKind::FloatKw,
            "if" => SyntaxKind::IfKw,
            "interface" => SyntaxKind::InterfaceKw,
            "internal" => SyntaxKind::InternalKw,
            "int" => SyntaxKind::IntKw,
            "long" => SyntaxKind::LongKw,
            "namespace" => SyntaxKind::NamespaceKw,
            "new" => SyntaxKind::NewKw,
            "null" => SyntaxKind::NullKw,
            "object" => SyntaxKind::ObjectKw,
            "override" => SyntaxKind::OverrideKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "readonly" => SyntaxKind::ReadonlyKw,
            "return" => SyntaxKind::ReturnKw,
            "sbyte" => SyntaxKind::SbyteKw,
            "sealed" => SyntaxKind::SealedKw,
            "short" => SyntaxKind::ShortKw,
            "static" => SyntaxKind::StaticKw,
            "string" => SyntaxKind::StringKw,
            "struct" => SyntaxKind::StructKw,
            "this" => SyntaxKind::ThisKw,
            "true" => SyntaxKind::TrueKw,
            "uint" => SyntaxKind::UintKw,
            "ulong" => SyntaxKind::UlongKw,
            "ushort" => SyntaxKind::UshortKw,
            "using" => SyntaxKind::UsingKw,
            "virtual" => SyntaxKind::VirtualKw,
            "void" => SyntaxKind::VoidKw,
            _ => return None,
        })
    }

    /// Canonical source text for fixed-text tokens (keywords and punctuation).
    pub fn fixed_text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::AbstractKw => "abstract",
            SyntaxKind::BoolKw => "bool",
            SyntaxKind::ByteKw => "byte",
            SyntaxKind::CharKw => "char",
            SyntaxKind::ClassKw => "class",
            SyntaxKind::ConstKw => "const",
            SyntaxKind::DecimalKw => "decimal",
            SyntaxKind::DelegateKw => "delegate",
            SyntaxKind::DoubleKw => "double",
            SyntaxKind::ElseKw => "else",
            SyntaxKind::EventKw => "event",
            SyntaxKind::FalseKw => "false",
            SyntaxKind::FloatKw => "float",
            SyntaxKind::IfKw => "if",
            SyntaxKind::InterfaceKw => "interface",
            SyntaxKind::InternalKw => "internal",
            SyntaxKind::IntKw => "int",
            SyntaxKind::LongKw => "long",
            SyntaxKind::NamespaceKw => "namespace",
            SyntaxKind::NewKw => "new",
            SyntaxKind::NullKw => "null",
            SyntaxKind::ObjectKw => "object",
            SyntaxKind::OverrideKw => "override",
            SyntaxKind::PrivateKw => "private",
            SyntaxKind::ProtectedKw => "protected",
            SyntaxKind::PublicKw => "public",
            SyntaxKind::ReadonlyKw => "readonly",
            SyntaxKind::ReturnKw => "return",
            SyntaxKind::SbyteKw => "sbyte",
            SyntaxKind::SealedKw => "sealed",
            SyntaxKind::ShortKw => "short",
            SyntaxKind::StaticKw => "static",
            SyntaxKind::StringKw => "string",
            SyntaxKind::StructKw => "struct",
            SyntaxKind::ThisKw => "this",
            SyntaxKind::TrueKw => "true",
            SyntaxKind::UintKw => "uint",
            SyntaxKind::UlongKw => "ulong",
            SyntaxKind::UshortKw => "ushort",
            SyntaxKind::UsingKw => "using",
            SyntaxKind::VirtualKw => "virtual",
            SyntaxKind::VoidKw => "void",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::Dot => ".",
            SyntaxKind::Colon => ":",
            SyntaxKind::Question => "?",
            SyntaxKind::FatArrow => "=>",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Percent => "%",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Bang => "!",
            SyntaxKind::Amp => "&",
            SyntaxKind::Pipe => "|",
            SyntaxKind::Caret => "^",
            SyntaxKind::Eq => "=",
            SyntaxKind::EqEq => "==",
            SyntaxKind::BangEq => "!=",
            SyntaxKind::Less => "<",
            SyntaxKind::LessEq => "<=",
            SyntaxKind::Greater => ">",
            SyntaxKind::GreaterEq => ">=",
            SyntaxKind::AmpAmp => "&&",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::PlusEq => "+=",
            SyntaxKind::MinusEq => "-=",
            SyntaxKind::StarEq => "*=",
            SyntaxKind::SlashEq => "/=",
            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for the C# subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: We've verified the numeric value is within the enum range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_fixed_text() {
        for kw in ["delegate", "event", "int", "void", "using", "namespace"] {
            let kind = SyntaxKind::from_keyword(kw).expect("keyword");
            assert!(kind.is_keyword());
            assert_eq!(kind.fixed_text(), Some(kw));
        }
        assert_eq!(SyntaxKind::from_keyword("var"), None);
    }

    #[test]
    fn raw_kind_conversion_is_total() {
        let raw = rowan::SyntaxKind(SyntaxKind::__Last as u16 + 7);
        assert_eq!(CSharpLanguage::kind_from_raw(raw), SyntaxKind::Error);
        assert_eq!(
            CSharpLanguage::kind_from_raw(SyntaxKind::IdentifierName.into()),
            SyntaxKind::IdentifierName
        );
    }
}
