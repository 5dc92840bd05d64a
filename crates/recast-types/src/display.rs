//! Shortest spelling of a type that still binds to it at a given position.

use recast_syntax::ast::{self, AstNode};
use recast_syntax::{parse_type_name, SyntaxNode, TextSize};

use crate::scope::{join, Scope};
use crate::{SourceTypeResolver, TypeSymbol};

impl SourceTypeResolver {
    pub(crate) fn display_at(&self, ty: &TypeSymbol, position: TextSize) -> String {
        let scope = match self.tree().find_node_at(position) {
            Ok(node) => self.scope(&node),
            Err(_) => self.scope(&self.tree().root()),
        };
        self.display_in(ty, &scope)
    }

    fn display_in(&self, ty: &TypeSymbol, scope: &Scope) -> String {
        if let Some(keyword) = ty.keyword() {
            return keyword.to_string();
        }
        let (namespace, name, args) = match ty {
            TypeSymbol::Void => return "void".to_string(),
            TypeSymbol::TypeParameter(name) => return name.clone(),
            TypeSymbol::Array(element) => return format!("{}[]", self.display_in(element, scope)),
            TypeSymbol::Named {
                namespace,
                name,
                args,
            } => (namespace, name, args),
        };

        if let Some(alias) = self.alias_for(ty, scope) {
            return alias;
        }

        let args_text = if args.is_empty() {
            String::new()
        } else {
            let args: Vec<String> = args.iter().map(|arg| self.display_in(arg, scope)).collect();
            format!("<{}>", args.join(", "))
        };

        // `List<int>`, then `Generic.List<int>`, ... up to the fully qualified name.
        let segments: Vec<&str> = namespace.split('.').filter(|s| !s.is_empty()).collect();
        for taken in 0..=segments.len() {
            let qualifier = segments[segments.len() - taken..].join(".");
            let candidate = format!("{}{args_text}", join(&qualifier, name));
            if self.binds_to(&candidate, ty, scope) {
                return candidate;
            }
        }
        format!("{}{args_text}", join(namespace, name))
    }

    /// A `using` alias visible in `scope` that names exactly `ty`.
    fn alias_for(&self, ty: &TypeSymbol, scope: &Scope) -> Option<String> {
        scope
            .namespaces
            .iter()
            .enumerate()
            .flat_map(|(idx, ns)| ns.aliases.iter().map(move |alias| (idx, alias)))
            .find(|(idx, (alias, target))| {
                self.resolve_type(target, &scope.for_alias_target(*idx)).as_ref() == Some(ty)
                    && self.lookup_type(alias, Vec::new(), scope).as_ref() == Some(ty)
            })
            .map(|(_, (alias, _))| alias.clone())
    }

    fn binds_to(&self, text: &str, ty: &TypeSymbol, scope: &Scope) -> bool {
        let Ok(green) = parse_type_name(text) else {
            return false;
        };
        ast::Type::cast(SyntaxNode::new_root(green))
            .and_then(|candidate| self.resolve_type(&candidate, scope))
            .as_ref()
            == Some(ty)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recast_syntax::parse;

    use crate::{TypeResolver, TypeSymbol};

    use super::*;

    fn display(text: &str, needle: &str, ty: &TypeSymbol) -> String {
        let tree = parse(text).tree;
        let resolver = SourceTypeResolver::new(&tree);
        let position = TextSize::from(text.find(needle).unwrap() as u32);
        resolver.minimal_display(ty, position)
    }

    fn list_of(arg: TypeSymbol) -> TypeSymbol {
        TypeSymbol::named("System.Collections.Generic", "List", vec![arg])
    }

    #[test]
    fn predefined_types_use_keywords() {
        let text = "class C { void M() { Foo; } }";
        assert_eq!(display(text, "Foo", &TypeSymbol::int()), "int");
        assert_eq!(
            display(text, "Foo", &TypeSymbol::Array(Box::new(TypeSymbol::string()))),
            "string[]"
        );
        assert_eq!(
            display(text, "Foo", &TypeSymbol::TypeParameter("T".into())),
            "T"
        );
    }

    #[test]
    fn imported_namespaces_allow_simple_names() {
        let ty = list_of(TypeSymbol::string());
        let with_using = "using System.Collections.Generic;\nclass C { void M() { Foo; } }";
        assert_eq!(display(with_using, "Foo", &ty), "List<string>");

        let without = "class C { void M() { Foo; } }";
        assert_eq!(
            display(without, "Foo", &ty),
            "System.Collections.Generic.List<string>"
        );
    }

    #[test]
    fn aliases_are_preferred() {
        let text = "using Handler = System.EventHandler;\nclass C { void M() { Foo; } }";
        assert_eq!(
            display(text, "Foo", &TypeSymbol::system("EventHandler")),
            "Handler"
        );
    }

    #[test]
    fn enclosing_namespaces_shorten_qualification() {
        let text = "namespace N.Models { class Item { } }\nnamespace N.Views { class V { void M() { Foo; } } }";
        let item = TypeSymbol::named("N.Models", "Item", Vec::new());
        assert_eq!(display(text, "Foo", &item), "Models.Item");
        assert_eq!(display(text, "Item", &item), "Item");
    }
}
