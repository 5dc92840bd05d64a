//! The slice of the base class library the resolver knows without source.

use crate::def::{MemberDef, MemberKind, MethodDef, TypeDef, TypeDefKind, TypeKey};
use crate::{CallableSignature, Parameter, TypeSymbol};

const SYSTEM: &str = "System";
const GENERIC: &str = "System.Collections.Generic";

fn tp(name: &str) -> TypeSymbol {
    TypeSymbol::TypeParameter(name.to_string())
}

fn param(name: &str, ty: TypeSymbol) -> Parameter {
    Parameter::new(name, ty)
}

fn method(name: &str, parameters: Vec<Parameter>, return_type: TypeSymbol) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: Vec::new(),
        parameters,
        return_type,
        is_static: false,
    }
}

fn static_method(name: &str, parameters: Vec<Parameter>, return_type: TypeSymbol) -> MethodDef {
    MethodDef {
        is_static: true,
        ..method(name, parameters, return_type)
    }
}

fn property(name: &str, ty: TypeSymbol, is_static: bool) -> MemberDef {
    MemberDef {
        name: name.to_string(),
        ty,
        kind: MemberKind::Property,
        is_static,
    }
}

fn delegate(
    namespace: &str,
    name: &str,
    type_params: &[&str],
    parameters: Vec<Parameter>,
    return_type: TypeSymbol,
) -> TypeDef {
    let key = TypeKey::new(namespace, name, type_params.len());
    let mut def = TypeDef::new(
        key,
        TypeDefKind::Delegate,
        type_params.iter().map(|p| p.to_string()).collect(),
    );
    def.invoke = Some(CallableSignature::new(parameters, return_type));
    def
}

fn class(namespace: &str, name: &str, type_params: &[&str], kind: TypeDefKind) -> TypeDef {
    TypeDef::new(
        TypeKey::new(namespace, name, type_params.len()),
        kind,
        type_params.iter().map(|p| p.to_string()).collect(),
    )
}

/// `Action`..`Action<T1..T4>` and `Func<TResult>`..`Func<T1..T4, TResult>`.
fn action_and_func() -> Vec<TypeDef> {
    let mut defs = Vec::new();
    for arity in 0..=4usize {
        let (type_params, names): (Vec<String>, Vec<String>) = match arity {
            0 => (Vec::new(), Vec::new()),
            1 => (vec!["T".to_string()], vec!["obj".to_string()]),
            n => (
                (1..=n).map(|i| format!("T{i}")).collect(),
                (1..=n).map(|i| format!("arg{i}")).collect(),
            ),
        };
        let parameters: Vec<Parameter> = type_params
            .iter()
            .zip(&names)
            .map(|(t, n)| param(n, tp(t)))
            .collect();
        let tps: Vec<&str> = type_params.iter().map(String::as_str).collect();
        defs.push(delegate(SYSTEM, "Action", &tps, parameters, TypeSymbol::Void));

        let func_names: Vec<String> = match arity {
            1 => vec!["arg".to_string()],
            _ => names.clone(),
        };
        let mut func_params: Vec<&str> = tps.clone();
        func_params.push("TResult");
        let parameters = type_params
            .iter()
            .zip(&func_names)
            .map(|(t, n)| param(n, tp(t)))
            .collect();
        defs.push(delegate(SYSTEM, "Func", &func_params, parameters, tp("TResult")));
    }
    defs
}

pub(crate) fn library() -> Vec<TypeDef> {
    let mut defs = action_and_func();

    defs.push(delegate(
        SYSTEM,
        "Predicate",
        &["T"],
        vec![param("obj", tp("T"))],
        TypeSymbol::bool(),
    ));
    defs.push(delegate(
        SYSTEM,
        "Comparison",
        &["T"],
        vec![param("x", tp("T")), param("y", tp("T"))],
        TypeSymbol::int(),
    ));
    defs.push(delegate(
        SYSTEM,
        "EventHandler",
        &[],
        vec![
            param("sender", TypeSymbol::object()),
            param("e", TypeSymbol::system("EventArgs")),
        ],
        TypeSymbol::Void,
    ));
    defs.push(delegate(
        SYSTEM,
        "EventHandler",
        &["TEventArgs"],
        vec![
            param("sender", TypeSymbol::object()),
            param("e", tp("TEventArgs")),
        ],
        TypeSymbol::Void,
    ));

    let mut event_args = class(SYSTEM, "EventArgs", &[], TypeDefKind::Class);
    event_args.constructors.push(Vec::new());
    event_args
        .members
        .push(property("Empty", TypeSymbol::system("EventArgs"), true));
    defs.push(event_args);

    let mut console = class(SYSTEM, "Console", &[], TypeDefKind::Class);
    console.methods = vec![
        static_method("WriteLine", Vec::new(), TypeSymbol::Void),
        static_method(
            "WriteLine",
            vec![param("value", TypeSymbol::string())],
            TypeSymbol::Void,
        ),
        static_method(
            "WriteLine",
            vec![param("value", TypeSymbol::int())],
            TypeSymbol::Void,
        ),
        static_method(
            "WriteLine",
            vec![param("value", TypeSymbol::object())],
            TypeSymbol::Void,
        ),
    ];
    defs.push(console);

    for name in [
        "Boolean", "Byte", "Char", "Decimal", "Double", "Single", "Int32", "Int64", "SByte",
        "Int16", "UInt32", "UInt64", "UInt16",
    ] {
        defs.push(class(SYSTEM, name, &[], TypeDefKind::Struct));
    }
    let mut object = class(SYSTEM, "Object", &[], TypeDefKind::Class);
    object.methods.push(method("ToString", Vec::new(), TypeSymbol::string()));
    object.methods.push(method("GetHashCode", Vec::new(), TypeSymbol::int()));
    defs.push(object);

    let mut string = class(SYSTEM, "String", &[], TypeDefKind::Class);
    string.members.push(property("Length", TypeSymbol::int(), false));
    string.members.push(property("Empty", TypeSymbol::string(), true));
    string.methods.push(static_method(
        "IsNullOrEmpty",
        vec![param("value", TypeSymbol::string())],
        TypeSymbol::bool(),
    ));
    defs.push(string);

    let list_t = TypeSymbol::named(GENERIC, "List", vec![tp("T")]);
    let mut list = class(GENERIC, "List", &["T"], TypeDefKind::Class);
    list.bases
        .push(TypeSymbol::named(GENERIC, "IEnumerable", vec![tp("T")]));
    list.constructors.push(Vec::new());
    list.methods = vec![
        method("Add", vec![param("item", tp("T"))], TypeSymbol::Void),
        method("Remove", vec![param("item", tp("T"))], TypeSymbol::bool()),
        method("Contains", vec![param("item", tp("T"))], TypeSymbol::bool()),
        method(
            "ForEach",
            vec![param(
                "action",
                TypeSymbol::named(SYSTEM, "Action", vec![tp("T")]),
            )],
            TypeSymbol::Void,
        ),
        method(
            "Sort",
            vec![param(
                "comparison",
                TypeSymbol::named(SYSTEM, "Comparison", vec![tp("T")]),
            )],
            TypeSymbol::Void,
        ),
        method(
            "Find",
            vec![param(
                "match",
                TypeSymbol::named(SYSTEM, "Predicate", vec![tp("T")]),
            )],
            tp("T"),
        ),
        method(
            "FindAll",
            vec![param(
                "match",
                TypeSymbol::named(SYSTEM, "Predicate", vec![tp("T")]),
            )],
            list_t,
        ),
    ];
    list.members.push(property("Count", TypeSymbol::int(), false));
    defs.push(list);

    defs.push(class(GENERIC, "IEnumerable", &["T"], TypeDefKind::Interface));

    let mut dictionary = class(GENERIC, "Dictionary", &["TKey", "TValue"], TypeDefKind::Class);
    dictionary.constructors.push(Vec::new());
    dictionary.methods = vec![
        method(
            "Add",
            vec![param("key", tp("TKey")), param("value", tp("TValue"))],
            TypeSymbol::Void,
        ),
        method(
            "ContainsKey",
            vec![param("key", tp("TKey"))],
            TypeSymbol::bool(),
        ),
    ];
    dictionary
        .members
        .push(property("Count", TypeSymbol::int(), false));
    defs.push(dictionary);

    defs
}
