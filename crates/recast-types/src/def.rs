//! Declaration-level symbol tables shared by the source and built-in libraries.

use std::collections::HashMap;

use crate::{CallableSignature, Parameter, TypeSymbol};

/// Identity of a type definition: generic arity distinguishes `Action` from
/// `Action<T>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TypeKey {
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) arity: usize,
}

impl TypeKey {
    pub(crate) fn new(namespace: impl Into<String>, name: impl Into<String>, arity: usize) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            arity,
        }
    }

    pub(crate) fn of(ty: &TypeSymbol) -> Option<TypeKey> {
        match ty {
            TypeSymbol::Named {
                namespace,
                name,
                args,
            } => Some(TypeKey::new(namespace.clone(), name.clone(), args.len())),
            _ => None,
        }
    }

    pub(crate) fn instantiate(&self, args: Vec<TypeSymbol>) -> TypeSymbol {
        TypeSymbol::named(self.namespace.clone(), self.name.clone(), args)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TypeDefKind {
    Class,
    Struct,
    Interface,
    Delegate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MemberKind {
    Field,
    Property,
    Event,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MethodDef {
    pub(crate) name: String,
    pub(crate) type_params: Vec<String>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) return_type: TypeSymbol,
    pub(crate) is_static: bool,
}

impl MethodDef {
    pub(crate) fn signature(&self) -> CallableSignature {
        CallableSignature::new(self.parameters.clone(), self.return_type.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MemberDef {
    pub(crate) name: String,
    pub(crate) ty: TypeSymbol,
    pub(crate) kind: MemberKind,
    pub(crate) is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TypeDef {
    pub(crate) key: TypeKey,
    pub(crate) kind: TypeDefKind,
    pub(crate) type_params: Vec<String>,
    pub(crate) bases: Vec<TypeSymbol>,
    pub(crate) methods: Vec<MethodDef>,
    pub(crate) constructors: Vec<Vec<Parameter>>,
    pub(crate) members: Vec<MemberDef>,
    /// Present for delegate types only.
    pub(crate) invoke: Option<CallableSignature>,
}

impl TypeDef {
    pub(crate) fn new(key: TypeKey, kind: TypeDefKind, type_params: Vec<String>) -> Self {
        Self {
            key,
            kind,
            type_params,
            bases: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            members: Vec::new(),
            invoke: None,
        }
    }

    /// The type as seen from inside its own declaration (`List<T>`).
    pub(crate) fn self_type(&self) -> TypeSymbol {
        self.key.instantiate(
            self.type_params
                .iter()
                .map(|p| TypeSymbol::TypeParameter(p.clone()))
                .collect(),
        )
    }

    /// Binds this definition's type parameters to the arguments of `ty`.
    pub(crate) fn substitution_for(&self, ty: &TypeSymbol) -> Substitution {
        self.type_params
            .iter()
            .cloned()
            .zip(ty.args().iter().cloned())
            .collect()
    }

    pub(crate) fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDef> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub(crate) fn member(&self, name: &str) -> Option<&MemberDef> {
        self.members.iter().find(|m| m.name == name)
    }
}

pub(crate) type Substitution = HashMap<String, TypeSymbol>;
