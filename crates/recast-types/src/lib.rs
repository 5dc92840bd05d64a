//! Type identities and the semantic query contract used by refactoring rules.
//!
//! [`TypeResolver`] is the seam between the rule engine and whatever answers
//! "what is the type of this expression". [`SourceTypeResolver`] is a reference
//! implementation that builds symbol tables straight from a parsed
//! [`recast_syntax::SyntaxTree`] plus a small built-in slice of the base class
//! library.

use std::collections::HashMap;
use std::fmt;

use recast_syntax::{SyntaxKind, SyntaxNode, TextSize};
use serde::{Deserialize, Serialize};

mod def;
mod display;
mod scope;
mod source;
mod well_known;

pub use source::SourceTypeResolver;

/// Identity of a type.
///
/// Predefined types are ordinary named types in `System` (`int` is
/// `System.Int32`); the keyword spelling is a display concern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeSymbol {
    Void,
    Named {
        namespace: String,
        name: String,
        args: Vec<TypeSymbol>,
    },
    TypeParameter(String),
    Array(Box<TypeSymbol>),
}

const PREDEFINED: &[(SyntaxKind, &str, &str)] = &[
    (SyntaxKind::BoolKw, "bool", "Boolean"),
    (SyntaxKind::ByteKw, "byte", "Byte"),
    (SyntaxKind::CharKw, "char", "Char"),
    (SyntaxKind::DecimalKw, "decimal", "Decimal"),
    (SyntaxKind::DoubleKw, "double", "Double"),
    (SyntaxKind::FloatKw, "float", "Single"),
    (SyntaxKind::IntKw, "int", "Int32"),
    (SyntaxKind::LongKw, "long", "Int64"),
    (SyntaxKind::ObjectKw, "object", "Object"),
    (SyntaxKind::SbyteKw, "sbyte", "SByte"),
    (SyntaxKind::ShortKw, "short", "Int16"),
    (SyntaxKind::StringKw, "string", "String"),
    (SyntaxKind::UintKw, "uint", "UInt32"),
    (SyntaxKind::UlongKw, "ulong", "UInt64"),
    (SyntaxKind::UshortKw, "ushort", "UInt16"),
];

impl TypeSymbol {
    pub fn named(
        namespace: impl Into<String>,
        name: impl Into<String>,
        args: Vec<TypeSymbol>,
    ) -> Self {
        TypeSymbol::Named {
            namespace: namespace.into(),
            name: name.into(),
            args,
        }
    }

    /// A non-generic type in the `System` namespace.
    pub fn system(name: impl Into<String>) -> Self {
        TypeSymbol::named("System", name, Vec::new())
    }

    pub fn int() -> Self {
        TypeSymbol::system("Int32")
    }

    pub fn bool() -> Self {
        TypeSymbol::system("Boolean")
    }

    pub fn string() -> Self {
        TypeSymbol::system("String")
    }

    pub fn object() -> Self {
        TypeSymbol::system("Object")
    }

    /// The type spelled by a predefined-type keyword; `void` maps to [`TypeSymbol::Void`].
    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        if kind == SyntaxKind::VoidKw {
            return Some(TypeSymbol::Void);
        }
        PREDEFINED
            .iter()
            .find(|(k, _, _)| *k == kind)
            .map(|(_, _, name)| TypeSymbol::system(*name))
    }

    /// The C# keyword for this type, if it has one.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            TypeSymbol::Void => Some("void"),
            TypeSymbol::Named {
                namespace,
                name,
                args,
            } if namespace == "System" && args.is_empty() => PREDEFINED
                .iter()
                .find(|(_, _, n)| n == name)
                .map(|(_, kw, _)| *kw),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeSymbol::Void)
    }

    /// Namespace-qualified name without type arguments, e.g. `System.Action`.
    pub fn full_name(&self) -> Option<String> {
        match self {
            TypeSymbol::Named {
                namespace, name, ..
            } if namespace.is_empty() => Some(name.clone()),
            TypeSymbol::Named {
                namespace, name, ..
            } => Some(format!("{namespace}.{name}")),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeSymbol] {
        match self {
            TypeSymbol::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Replace type parameters bound in `subst`; unbound ones are left alone.
    pub fn substitute(&self, subst: &HashMap<String, TypeSymbol>) -> TypeSymbol {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            TypeSymbol::Void => TypeSymbol::Void,
            TypeSymbol::TypeParameter(name) => subst
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeSymbol::Array(element) => TypeSymbol::Array(Box::new(element.substitute(subst))),
            TypeSymbol::Named {
                namespace,
                name,
                args,
            } => TypeSymbol::Named {
                namespace: namespace.clone(),
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(subst)).collect(),
            },
        }
    }

    /// Whether any of `params` occurs in this type.
    pub fn mentions_any(&self, params: &[String]) -> bool {
        match self {
            TypeSymbol::Void => false,
            TypeSymbol::TypeParameter(name) => params.contains(name),
            TypeSymbol::Array(element) => element.mentions_any(params),
            TypeSymbol::Named { args, .. } => args.iter().any(|arg| arg.mentions_any(params)),
        }
    }
}

/// Fully qualified rendering (`System.Collections.Generic.List<int>`), with keywords
/// for predefined types.
impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword() {
            return f.write_str(keyword);
        }
        match self {
            TypeSymbol::Void => f.write_str("void"),
            TypeSymbol::TypeParameter(name) => f.write_str(name),
            TypeSymbol::Array(element) => write!(f, "{element}[]"),
            TypeSymbol::Named { args, .. } => {
                if let Some(full) = self.full_name() {
                    f.write_str(&full)?;
                }
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeSymbol,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeSymbol) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The invocation signature of a delegate type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallableSignature {
    pub parameters: Vec<Parameter>,
    pub return_type: TypeSymbol,
}

impl CallableSignature {
    pub fn new(parameters: Vec<Parameter>, return_type: TypeSymbol) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    pub fn substitute(&self, subst: &HashMap<String, TypeSymbol>) -> CallableSignature {
        CallableSignature {
            parameters: self
                .parameters
                .iter()
                .map(|p| Parameter::new(p.name.clone(), p.ty.substitute(subst)))
                .collect(),
            return_type: self.return_type.substitute(subst),
        }
    }
}

/// Semantic queries over one syntax tree.
///
/// Implementations are immutable once built so a single resolver can serve
/// concurrent probes. Every query answers `None` rather than failing when it
/// cannot resolve something.
pub trait TypeResolver: Send + Sync {
    /// The converted type of `node` when an implicit conversion applies at its
    /// position (a method group target-typed to a delegate), otherwise its
    /// natural type.
    fn type_of(&self, node: &SyntaxNode) -> Option<TypeSymbol>;

    /// The invoke signature when `ty` is a delegate type.
    fn callable_signature_of(&self, ty: &TypeSymbol) -> Option<CallableSignature>;

    /// Shortest spelling of `ty` that binds to the same type at `position`.
    fn minimal_display(&self, ty: &TypeSymbol, position: TextSize) -> String {
        let _ = position;
        ty.to_string()
    }
}
