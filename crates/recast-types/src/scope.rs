//! Lexical scopes: which namespaces, imports, aliases, enclosing types and type
//! parameters are visible at a node.

use std::collections::HashMap;

use recast_syntax::ast::{self, AstNode};
use recast_syntax::{SyntaxKind, SyntaxNode, TextRange};

use crate::def::TypeKey;

#[derive(Clone, Debug)]
pub(crate) struct NamespaceScope {
    /// Fully qualified; empty for the global namespace.
    pub(crate) name: String,
    pub(crate) imports: Vec<String>,
    pub(crate) aliases: Vec<(String, ast::Type)>,
}

impl NamespaceScope {
    fn bare(name: String) -> Self {
        Self {
            name,
            imports: Vec::new(),
            aliases: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Scope {
    /// Innermost first; the global namespace is always last.
    pub(crate) namespaces: Vec<NamespaceScope>,
    /// Enclosing type declarations, innermost first.
    pub(crate) types: Vec<TypeKey>,
    pub(crate) type_params: Vec<String>,
}

impl Scope {
    pub(crate) fn at(node: &SyntaxNode, declared: &HashMap<TextRange, TypeKey>) -> Scope {
        let mut scope = Scope::default();
        let mut namespace_decls = Vec::new();
        let mut unit = None;

        for ancestor in node.ancestors() {
            match ancestor.kind() {
                SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration => {
                    if let Some(key) = declared.get(&ancestor.text_range()) {
                        scope.types.push(key.clone());
                    }
                    scope.type_params.extend(type_params_of(&ancestor));
                }
                SyntaxKind::DelegateDeclaration | SyntaxKind::MethodDeclaration => {
                    scope.type_params.extend(type_params_of(&ancestor));
                }
                SyntaxKind::NamespaceDeclaration => {
                    namespace_decls.extend(ast::NamespaceDeclaration::cast(ancestor));
                }
                SyntaxKind::CompilationUnit => {
                    unit = ast::CompilationUnit::cast(ancestor);
                }
                _ => {}
            }
        }

        let mut prefix = String::new();
        let mut outermost_first = Vec::new();
        for decl in namespace_decls.iter().rev() {
            let name = decl
                .name()
                .and_then(|name| type_path(&name))
                .unwrap_or_default();
            let parts: Vec<&str> = name.split('.').filter(|p| !p.is_empty()).collect();
            for (idx, part) in parts.iter().enumerate() {
                prefix = join(&prefix, part);
                let mut ns = NamespaceScope::bare(prefix.clone());
                if idx + 1 == parts.len() {
                    collect_usings(decl.usings(), &mut ns);
                }
                outermost_first.push(ns);
            }
        }

        let mut global = NamespaceScope::bare(String::new());
        if let Some(unit) = unit {
            collect_usings(unit.usings(), &mut global);
        }
        scope.namespaces = outermost_first.into_iter().rev().collect();
        scope.namespaces.push(global);
        scope
    }

    pub(crate) fn current_namespace(&self) -> &str {
        self.namespaces.first().map_or("", |ns| ns.name.as_str())
    }

    /// The context an alias declared in `namespaces[idx]` is resolved in: its
    /// namespace and the enclosing ones, without any using directives of that
    /// declaration.
    pub(crate) fn for_alias_target(&self, idx: usize) -> Scope {
        let mut namespaces = Vec::new();
        if let Some(ns) = self.namespaces.get(idx) {
            namespaces.push(NamespaceScope::bare(ns.name.clone()));
        }
        namespaces.extend(self.namespaces.iter().skip(idx + 1).cloned());
        Scope {
            namespaces,
            types: Vec::new(),
            type_params: Vec::new(),
        }
    }
}

fn collect_usings(usings: impl Iterator<Item = ast::UsingDirective>, ns: &mut NamespaceScope) {
    for using in usings {
        let Some(target) = using.target() else {
            continue;
        };
        match using.alias().and_then(|alias| alias.name()) {
            Some(alias) => ns.aliases.push((alias.text(), target)),
            None => ns.imports.extend(type_path(&target)),
        }
    }
}

fn type_params_of(node: &SyntaxNode) -> Vec<String> {
    node.children()
        .find_map(ast::TypeParameterList::cast)
        .map(|list| list.names().collect())
        .unwrap_or_default()
}

/// Dotted spelling of a simple or qualified name (`System.Collections`).
pub(crate) fn type_path(ty: &ast::Type) -> Option<String> {
    match ty {
        ast::Type::IdentifierName(name) => Some(name.text()),
        ast::Type::QualifiedName(qualified) => {
            let left = type_path(&qualified.left()?)?;
            let right = type_path(&qualified.right()?)?;
            Some(format!("{left}.{right}"))
        }
        _ => None,
    }
}

pub(crate) fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recast_syntax::parse;

    use super::*;

    fn scope_at(text: &str, needle: &str) -> Scope {
        let tree = parse(text).tree;
        let offset = text.find(needle).unwrap() as u32;
        let node = tree.find_node_at(offset.into()).unwrap();
        Scope::at(&node, &HashMap::new())
    }

    #[test]
    fn dotted_and_nested_namespaces_expand_innermost_first() {
        let text = "using System;\nnamespace A.B { using X = System.Action; namespace C { class K { void M() { Foo; } } } }";
        let scope = scope_at(text, "Foo");
        let names: Vec<&str> = scope.namespaces.iter().map(|ns| ns.name.as_str()).collect();
        assert_eq!(names, vec!["A.B.C", "A.B", "A", ""]);
        assert_eq!(scope.current_namespace(), "A.B.C");
        assert_eq!(scope.namespaces[1].aliases[0].0, "X");
        assert_eq!(scope.namespaces[3].imports, vec!["System".to_string()]);
    }

    #[test]
    fn type_parameters_of_methods_and_types_are_visible() {
        let text = "class K<T> { void M<U>(U u) { Foo; } }";
        let scope = scope_at(text, "Foo");
        assert_eq!(scope.type_params, vec!["U".to_string(), "T".to_string()]);
    }

    #[test]
    fn alias_targets_skip_their_own_directives() {
        let text = "namespace A { using X = B.C; class K { } }";
        let scope = scope_at(text, "K");
        let alias_scope = scope.for_alias_target(0);
        let names: Vec<&str> = alias_scope
            .namespaces
            .iter()
            .map(|ns| ns.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", ""]);
        assert!(alias_scope.namespaces[0].aliases.is_empty());
    }
}
