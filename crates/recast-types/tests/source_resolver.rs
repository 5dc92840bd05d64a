use pretty_assertions::assert_eq;
use recast_syntax::{parse, SyntaxKind, SyntaxTree, TextSize};
use recast_test_utils::extract_caret;
use recast_types::{CallableSignature, Parameter, SourceTypeResolver, TypeResolver, TypeSymbol};

fn resolve(fixture: &str) -> (SyntaxTree, SourceTypeResolver, TextSize) {
    let (text, caret) = extract_caret(fixture);
    let parse = parse(&text);
    assert!(parse.ok(), "{:?}", parse.errors);
    let resolver = SourceTypeResolver::new(&parse.tree);
    (parse.tree, resolver, caret.start())
}

#[test]
fn target_typed_method_group_has_a_callable_signature() {
    let (tree, resolver, caret) = resolve(
        r#"
using System;

namespace App
{
    class Program
    {
        static void Foo(int x) { }

        static void Main()
        {
            Action<int> a = /*caret*/Foo;
        }
    }
}
"#,
    );
    let node = tree.find_node_at(caret).unwrap();
    assert_eq!(node.kind(), SyntaxKind::IdentifierName);

    let ty = resolver.type_of(&node).unwrap();
    assert_eq!(resolver.minimal_display(&ty, caret), "Action<int>");

    let signature = resolver.callable_signature_of(&ty).unwrap();
    assert_eq!(
        signature,
        CallableSignature::new(vec![Parameter::new("obj", TypeSymbol::int())], TypeSymbol::Void)
    );
}

#[test]
fn qualified_method_groups_resolve_through_member_access() {
    let (tree, resolver, caret) = resolve(
        r#"
using System;
using System.Collections.Generic;

class Printer
{
    public static void Print(string s) { }
}

class C
{
    void M(List<string> items)
    {
        items.ForEach(Printer./*caret*/Print);
    }
}
"#,
    );
    let name = tree.find_node_at(caret).unwrap();
    let access = name.parent().unwrap();
    assert_eq!(access.kind(), SyntaxKind::MemberAccessExpression);

    let expected = TypeSymbol::named("System", "Action", vec![TypeSymbol::string()]);
    assert_eq!(resolver.type_of(&access), Some(expected.clone()));
    // Asking about the name alone answers for the whole member access.
    assert_eq!(resolver.type_of(&name), Some(expected));
}

#[test]
fn source_delegates_and_event_types() {
    let (tree, resolver, caret) = resolve(
        r#"
namespace Shop
{
    delegate bool Filter(Order order);

    class Order { public decimal Total; }

    class Cart
    {
        public event Filter Changed;

        bool Large(Order order) { return order.Total > 100; }

        void Wire()
        {
            Changed += /*caret*/Large;
        }
    }
}
"#,
    );
    let node = tree.find_node_at(caret).unwrap();
    let filter = TypeSymbol::named("Shop", "Filter", Vec::new());
    assert_eq!(resolver.type_of(&node), Some(filter.clone()));

    let signature = resolver.callable_signature_of(&filter).unwrap();
    assert_eq!(signature.parameters[0].ty, TypeSymbol::named("Shop", "Order", Vec::new()));
    assert_eq!(signature.return_type, TypeSymbol::bool());
    assert_eq!(resolver.minimal_display(&signature.parameters[0].ty, caret), "Order");
}

#[test]
fn unresolvable_nodes_answer_none() {
    let (tree, resolver, caret) = resolve(
        "class C { void M() { Missing(/*caret*/nothing); } }",
    );
    let node = tree.find_node_at(caret).unwrap();
    assert_eq!(resolver.type_of(&node), None);

    let root = tree.root();
    assert_eq!(resolver.type_of(&root), None);
}

#[test]
fn resolver_is_shared_across_threads() {
    let (tree, resolver, caret) = resolve(
        "using System;\nclass C { void Foo() { } void M() { Action a = /*caret*/Foo; } }",
    );
    let expected = Some(TypeSymbol::system("Action"));
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let node = tree.find_node_at(caret).unwrap();
                assert_eq!(resolver.type_of(&node), expected);
            });
        }
    });
}

#[test]
fn type_symbols_serialize_with_serde() {
    let ty = TypeSymbol::named(
        "System.Collections.Generic",
        "Dictionary",
        vec![TypeSymbol::string(), TypeSymbol::Array(Box::new(TypeSymbol::int()))],
    );
    let json = serde_json::to_value(&ty).unwrap();
    assert_eq!(json["Named"]["name"], "Dictionary");
    let back: TypeSymbol = serde_json::from_value(json).unwrap();
    assert_eq!(back, ty);
}
