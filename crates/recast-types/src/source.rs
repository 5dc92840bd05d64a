use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use recast_syntax::ast::{self, AstNode};
use recast_syntax::{SyntaxKind, SyntaxNode, SyntaxTree, TextRange, TextSize};

use crate::def::{
    MemberDef, MemberKind, MethodDef, Substitution, TypeDef, TypeDefKind, TypeKey,
};
use crate::scope::{join, type_path, Scope};
use crate::{well_known, CallableSignature, Parameter, TypeResolver, TypeSymbol};

/// Bound on mutually recursive evaluation (lambda parameters typed from their
/// target, which is typed from an enclosing call, ...).
const MAX_DEPTH: u32 = 48;

/// A [`TypeResolver`] backed by declarations found in one syntax tree plus the
/// built-in library.
///
/// All symbol tables are computed up front; queries only read them, so a
/// resolver can be shared freely between threads.
#[derive(Debug)]
pub struct SourceTypeResolver {
    tree: SyntaxTree,
    pub(crate) types: BTreeMap<TypeKey, TypeDef>,
    pub(crate) declared: HashMap<TextRange, TypeKey>,
    namespaces: BTreeSet<String>,
}

/// What an expression denotes.
#[derive(Clone, Debug)]
enum Eval {
    Value(TypeSymbol),
    Type(TypeSymbol),
    Namespace(String),
    Methods(MethodGroup),
    AnonymousFunction,
}

#[derive(Clone, Debug)]
struct MethodGroup {
    /// Each candidate with the substitution for its declaring type's parameters.
    candidates: Vec<(MethodDef, Substitution)>,
    type_args: Vec<TypeSymbol>,
}

impl SourceTypeResolver {
    pub fn new(tree: &SyntaxTree) -> Self {
        let mut resolver = SourceTypeResolver {
            tree: tree.clone(),
            types: BTreeMap::new(),
            declared: HashMap::new(),
            namespaces: BTreeSet::new(),
        };
        for def in well_known::library() {
            resolver.add_namespace(&def.key.namespace);
            resolver.types.insert(def.key.clone(), def);
        }

        let root = tree.root();
        let decls = resolver.declare_types(&root);
        resolver.define_members(&decls);

        tracing::debug!(
            target = "recast.types",
            declared = decls.len(),
            types = resolver.types.len(),
            "built source type resolver"
        );
        resolver
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    fn add_namespace(&mut self, namespace: &str) {
        let mut prefix = String::new();
        for part in namespace.split('.').filter(|p| !p.is_empty()) {
            prefix = join(&prefix, part);
            self.namespaces.insert(prefix.clone());
        }
    }

    pub(crate) fn scope(&self, node: &SyntaxNode) -> Scope {
        Scope::at(node, &self.declared)
    }

    // --- Declarations ---

    fn declare_types(&mut self, root: &SyntaxNode) -> Vec<(SyntaxNode, TypeKey)> {
        let mut decls = Vec::new();
        for node in root.descendants() {
            let kind = match node.kind() {
                SyntaxKind::ClassDeclaration => TypeDefKind::Class,
                SyntaxKind::StructDeclaration => TypeDefKind::Struct,
                SyntaxKind::InterfaceDeclaration => TypeDefKind::Interface,
                SyntaxKind::DelegateDeclaration => TypeDefKind::Delegate,
                SyntaxKind::NamespaceDeclaration => {
                    let scope = self.scope(&node);
                    self.add_namespace(scope.current_namespace());
                    continue;
                }
                _ => continue,
            };
            let Some(name) = declared_name(&node) else {
                continue;
            };
            let type_params: Vec<String> = node
                .children()
                .find_map(ast::TypeParameterList::cast)
                .map(|list| list.names().collect())
                .unwrap_or_default();

            let outer = node
                .ancestors()
                .skip(1)
                .find(|a| ast::TypeDeclaration::can_cast(a.kind()));
            let namespace = match outer {
                Some(outer) => match self.declared.get(&outer.text_range()) {
                    Some(key) => join(&key.namespace, &key.name),
                    None => continue,
                },
                None => self.scope(&node).current_namespace().to_string(),
            };

            let key = TypeKey::new(namespace, name, type_params.len());
            self.declared.insert(node.text_range(), key.clone());
            self.types
                .entry(key.clone())
                .or_insert_with(|| TypeDef::new(key.clone(), kind, type_params));
            decls.push((node, key));
        }
        decls
    }

    fn define_members(&mut self, decls: &[(SyntaxNode, TypeKey)]) {
        let collected: Vec<(TypeKey, TypeDef)> = decls
            .iter()
            .map(|(node, key)| (key.clone(), self.collect_members(node, key)))
            .collect();

        for (key, members) in collected {
            let Some(def) = self.types.get_mut(&key) else {
                continue;
            };
            def.bases.extend(members.bases);
            def.methods.extend(members.methods);
            def.constructors.extend(members.constructors);
            def.members.extend(members.members);
            if members.invoke.is_some() {
                def.invoke = members.invoke;
            }
        }
    }

    /// Signatures declared directly in `node`, returned as a detached definition.
    fn collect_members(&self, node: &SyntaxNode, key: &TypeKey) -> TypeDef {
        let mut def = TypeDef::new(key.clone(), TypeDefKind::Class, Vec::new());
        let scope = self.scope(node);

        if let Some(delegate) = ast::DelegateDeclaration::cast(node.clone()) {
            let return_type = delegate
                .return_type()
                .and_then(|ty| self.resolve_type(&ty, &scope));
            let parameters = delegate
                .parameter_list()
                .and_then(|list| self.parameters(&list, &scope));
            if let (Some(return_type), Some(parameters)) = (return_type, parameters) {
                def.invoke = Some(CallableSignature::new(parameters, return_type));
            }
            return def;
        }

        let Some(decl) = ast::TypeDeclaration::cast(node.clone()) else {
            return def;
        };

        if let Some(bases) = node.children().find(|n| n.kind() == SyntaxKind::BaseList) {
            def.bases = bases
                .children()
                .filter_map(ast::Type::cast)
                .filter_map(|ty| self.resolve_type(&ty, &scope))
                .collect();
        }

        for method in decl.methods() {
            let method_scope = self.scope(method.syntax());
            let Some(name) = method.name_token().map(|t| token_name(t.text())) else {
                continue;
            };
            let return_type = method
                .return_type()
                .and_then(|ty| self.resolve_type(&ty, &method_scope));
            let parameters = method
                .parameter_list()
                .and_then(|list| self.parameters(&list, &method_scope));
            let (Some(return_type), Some(parameters)) = (return_type, parameters) else {
                tracing::trace!(target = "recast.types", method = %name, "skipping method with unresolved signature");
                continue;
            };
            def.methods.push(MethodDef {
                name,
                type_params: method
                    .type_parameter_list()
                    .map(|list| list.names().collect())
                    .unwrap_or_default(),
                parameters,
                return_type,
                is_static: has_modifier(method.syntax(), SyntaxKind::StaticKw),
            });
        }

        for ctor in node.children().filter_map(ast::ConstructorDeclaration::cast) {
            if let Some(parameters) = ctor
                .parameter_list()
                .and_then(|list| self.parameters(&list, &scope))
            {
                def.constructors.push(parameters);
            }
        }

        let variables = decl
            .fields()
            .map(|f| (f.syntax().clone(), f.declaration(), MemberKind::Field))
            .chain(
                decl.event_fields()
                    .map(|e| (e.syntax().clone(), e.declaration(), MemberKind::Event)),
            );
        for (owner, declaration, kind) in variables {
            let Some(declaration) = declaration else {
                continue;
            };
            let Some(ty) = declaration
                .ty()
                .and_then(|ty| self.resolve_type(&ty, &scope))
            else {
                continue;
            };
            let is_static = has_modifier(&owner, SyntaxKind::StaticKw);
            for declarator in declaration.declarators() {
                if let Some(name) = declarator.name_token() {
                    def.members.push(MemberDef {
                        name: token_name(name.text()),
                        ty: ty.clone(),
                        kind,
                        is_static,
                    });
                }
            }
        }

        let properties = decl
            .properties()
            .map(|p| (p.syntax().clone(), p.ty(), p.name_token(), MemberKind::Property))
            .chain(
                decl.events()
                    .map(|e| (e.syntax().clone(), e.ty(), e.name_token(), MemberKind::Event)),
            );
        for (owner, ty, name, kind) in properties {
            let (Some(ty), Some(name)) = (ty, name) else {
                continue;
            };
            if let Some(ty) = self.resolve_type(&ty, &scope) {
                def.members.push(MemberDef {
                    name: token_name(name.text()),
                    ty,
                    kind,
                    is_static: has_modifier(&owner, SyntaxKind::StaticKw),
                });
            }
        }

        def
    }

    fn parameters(&self, list: &ast::ParameterList, scope: &Scope) -> Option<Vec<Parameter>> {
        list.parameters()
            .map(|param| {
                let ty = self.resolve_type(&param.ty()?, scope)?;
                let name = token_name(param.name_token()?.text());
                Some(Parameter::new(name, ty))
            })
            .collect()
    }

    // --- Type syntax ---

    pub(crate) fn resolve_type(&self, ty: &ast::Type, scope: &Scope) -> Option<TypeSymbol> {
        match ty {
            ast::Type::PredefinedType(predefined) => {
                TypeSymbol::from_keyword(predefined.keyword()?.kind())
            }
            ast::Type::ArrayType(array) => {
                let mut resolved = self.resolve_type(&array.element_type()?, scope)?;
                for _ in 0..array.rank_count().max(1) {
                    resolved = TypeSymbol::Array(Box::new(resolved));
                }
                Some(resolved)
            }
            ast::Type::IdentifierName(name) => self.lookup_type(&name.text(), Vec::new(), scope),
            ast::Type::GenericName(generic) => {
                let args = self.resolve_type_args(generic, scope)?;
                self.lookup_type(&generic.text(), args, scope)
            }
            ast::Type::QualifiedName(qualified) => {
                let (name, args) = match qualified.right()? {
                    ast::Type::IdentifierName(name) => (name.text(), Vec::new()),
                    ast::Type::GenericName(generic) => {
                        (generic.text(), self.resolve_type_args(&generic, scope)?)
                    }
                    _ => return None,
                };
                self.lookup_qualified(&qualified.left()?, &name, args, scope)
            }
        }
    }

    fn resolve_type_args(&self, generic: &ast::GenericName, scope: &Scope) -> Option<Vec<TypeSymbol>> {
        generic
            .type_arguments()
            .iter()
            .map(|arg| self.resolve_type(arg, scope))
            .collect()
    }

    /// Simple name lookup: type parameters, nested types of enclosing types, then
    /// each enclosing namespace with its aliases and imports.
    pub(crate) fn lookup_type(
        &self,
        name: &str,
        args: Vec<TypeSymbol>,
        scope: &Scope,
    ) -> Option<TypeSymbol> {
        let arity = args.len();
        if arity == 0 && scope.type_params.iter().any(|p| p == name) {
            return Some(TypeSymbol::TypeParameter(name.to_string()));
        }

        for outer in &scope.types {
            let key = TypeKey::new(join(&outer.namespace, &outer.name), name, arity);
            if self.types.contains_key(&key) {
                return Some(key.instantiate(args));
            }
        }

        for (idx, ns) in scope.namespaces.iter().enumerate() {
            let key = TypeKey::new(ns.name.clone(), name, arity);
            if self.types.contains_key(&key) {
                return Some(key.instantiate(args));
            }
            if arity == 0 {
                if let Some((_, target)) = ns.aliases.iter().find(|(alias, _)| alias == name) {
                    return self.resolve_type(target, &scope.for_alias_target(idx));
                }
            }
            for import in &ns.imports {
                let key = TypeKey::new(import.clone(), name, arity);
                if self.types.contains_key(&key) {
                    return Some(key.instantiate(args));
                }
            }
        }
        None
    }

    fn lookup_qualified(
        &self,
        left: &ast::Type,
        name: &str,
        args: Vec<TypeSymbol>,
        scope: &Scope,
    ) -> Option<TypeSymbol> {
        if let Some(container) = self.resolve_type(left, scope) {
            let key = TypeKey::new(container.full_name()?, name, args.len());
            return self.types.contains_key(&key).then(|| key.instantiate(args));
        }
        let namespace = self.resolve_namespace(left, scope)?;
        let key = TypeKey::new(namespace, name, args.len());
        self.types.contains_key(&key).then(|| key.instantiate(args))
    }

    fn resolve_namespace(&self, ty: &ast::Type, scope: &Scope) -> Option<String> {
        let path = type_path(ty)?;
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path.as_str(), None),
        };

        for (idx, ns) in scope.namespaces.iter().enumerate() {
            let Some((_, target)) = ns.aliases.iter().find(|(alias, _)| alias == head) else {
                continue;
            };
            let aliased = self.resolve_namespace(target, &scope.for_alias_target(idx))?;
            let full = match rest {
                Some(rest) => join(&aliased, rest),
                None => aliased,
            };
            return self.namespaces.contains(&full).then_some(full);
        }

        scope
            .namespaces
            .iter()
            .map(|ns| join(&ns.name, &path))
            .find(|full| self.namespaces.contains(full))
    }

    // --- Members ---

    /// `ty` and its base types, each with the substitution binding that
    /// definition's type parameters. `System.Object` always comes last.
    fn hierarchy(&self, ty: &TypeSymbol) -> Vec<(&TypeDef, Substitution)> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            let Some(key) = TypeKey::of(&current) else {
                continue;
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            let Some(def) = self.types.get(&key) else {
                continue;
            };
            let subst = def.substitution_for(&current);
            queue.extend(def.bases.iter().map(|base| base.substitute(&subst)));
            out.push((def, subst));
        }

        let object = TypeKey::new("System", "Object", 0);
        if !seen.contains(&object) {
            if let Some(def) = self.types.get(&object) {
                out.push((def, Substitution::new()));
            }
        }
        out
    }

    fn member_type(&self, ty: &TypeSymbol, name: &str, is_static: Option<bool>) -> Option<TypeSymbol> {
        if let TypeSymbol::Array(_) = ty {
            if name == "Length" && is_static != Some(true) {
                return Some(TypeSymbol::int());
            }
        }
        self.hierarchy(ty).into_iter().find_map(|(def, subst)| {
            def.member(name)
                .filter(|m| is_static.map_or(true, |s| m.is_static == s))
                .map(|m| m.ty.substitute(&subst))
        })
    }

    fn methods(
        &self,
        ty: &TypeSymbol,
        name: &str,
        is_static: Option<bool>,
    ) -> Vec<(MethodDef, Substitution)> {
        self.hierarchy(ty)
            .into_iter()
            .flat_map(|(def, subst)| {
                def.methods_named(name)
                    .filter(|m| is_static.map_or(true, |s| m.is_static == s))
                    .map(move |m| (m.clone(), subst.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn is_reference_type(&self, ty: &TypeSymbol) -> bool {
        match ty {
            TypeSymbol::Array(_) => true,
            TypeSymbol::Void | TypeSymbol::TypeParameter(_) => false,
            TypeSymbol::Named { .. } => TypeKey::of(ty)
                .and_then(|key| self.types.get(&key))
                .map_or(false, |def| def.kind != TypeDefKind::Struct),
        }
    }

    // --- Expressions ---

    fn eval(&self, node: &SyntaxNode, depth: u32) -> Option<Eval> {
        if depth > MAX_DEPTH {
            return None;
        }
        let depth = depth + 1;

        match node.kind() {
            SyntaxKind::LiteralExpression => literal_type(node).map(Eval::Value),
            SyntaxKind::ThisExpression => {
                let scope = self.scope(node);
                let def = self.types.get(scope.types.first()?)?;
                Some(Eval::Value(def.self_type()))
            }
            SyntaxKind::IdentifierName | SyntaxKind::GenericName
                if ast::is_type_syntax(node) =>
            {
                let ty = ast::Type::cast(node.clone())?;
                self.resolve_type(&ty, &self.scope(node)).map(Eval::Type)
            }
            SyntaxKind::PredefinedType | SyntaxKind::QualifiedName | SyntaxKind::ArrayType => {
                let ty = ast::Type::cast(node.clone())?;
                self.resolve_type(&ty, &self.scope(node)).map(Eval::Type)
            }
            SyntaxKind::IdentifierName | SyntaxKind::GenericName => {
                let (name, type_args) = self.simple_name(node)?;
                self.eval_simple_name(node, &name, type_args, depth)
            }
            SyntaxKind::MemberAccessExpression => self.eval_member_access(node, depth),
            SyntaxKind::InvocationExpression => self.eval_invocation(node, depth),
            SyntaxKind::ObjectCreationExpression => {
                let creation = ast::ObjectCreationExpression::cast(node.clone())?;
                self.resolve_type(&creation.ty()?, &self.scope(node))
                    .map(Eval::Value)
            }
            SyntaxKind::CastExpression => {
                let cast = ast::CastExpression::cast(node.clone())?;
                self.resolve_type(&cast.ty()?, &self.scope(node))
                    .map(Eval::Value)
            }
            SyntaxKind::ParenthesizedExpression => self.eval(&node.first_child()?, depth),
            SyntaxKind::AssignmentExpression => {
                let assign = ast::AssignmentExpression::cast(node.clone())?;
                self.value_type(&assign.left()?, depth).map(Eval::Value)
            }
            SyntaxKind::BinaryExpression => self.eval_binary(node, depth),
            SyntaxKind::PrefixUnaryExpression => {
                if first_operator(node) == Some(SyntaxKind::Bang) {
                    return Some(Eval::Value(TypeSymbol::bool()));
                }
                self.value_type(&node.first_child()?, depth).map(Eval::Value)
            }
            SyntaxKind::PostfixUnaryExpression => {
                self.value_type(&node.first_child()?, depth).map(Eval::Value)
            }
            SyntaxKind::AnonymousMethodExpression
            | SyntaxKind::SimpleLambdaExpression
            | SyntaxKind::ParenthesizedLambdaExpression => Some(Eval::AnonymousFunction),
            _ => None,
        }
    }

    fn value_type(&self, node: &SyntaxNode, depth: u32) -> Option<TypeSymbol> {
        match self.eval(node, depth)? {
            Eval::Value(ty) => Some(ty),
            _ => None,
        }
    }

    /// Name and resolved type arguments of an `IdentifierName` or `GenericName`.
    fn simple_name(&self, node: &SyntaxNode) -> Option<(String, Vec<TypeSymbol>)> {
        if let Some(name) = ast::IdentifierName::cast(node.clone()) {
            return Some((name.text(), Vec::new()));
        }
        let generic = ast::GenericName::cast(node.clone())?;
        let args = self.resolve_type_args(&generic, &self.scope(node))?;
        Some((generic.text(), args))
    }

    fn eval_simple_name(
        &self,
        node: &SyntaxNode,
        name: &str,
        type_args: Vec<TypeSymbol>,
        depth: u32,
    ) -> Option<Eval> {
        if type_args.is_empty() {
            if let Some(ty) = self.lookup_local(node, name, depth) {
                return Some(Eval::Value(ty));
            }
        }

        let scope = self.scope(node);
        for key in &scope.types {
            let Some(def) = self.types.get(key) else {
                continue;
            };
            let self_type = def.self_type();
            if type_args.is_empty() {
                if let Some(ty) = self.member_type(&self_type, name, None) {
                    return Some(Eval::Value(ty));
                }
            }
            let candidates = self.methods(&self_type, name, None);
            if !candidates.is_empty() {
                return Some(Eval::Methods(MethodGroup {
                    candidates,
                    type_args,
                }));
            }
        }

        if let Some(ty) = self.lookup_type(name, type_args, &scope) {
            return Some(Eval::Type(ty));
        }
        scope
            .namespaces
            .iter()
            .map(|ns| join(&ns.name, name))
            .find(|full| self.namespaces.contains(full))
            .map(Eval::Namespace)
    }

    /// Locals declared earlier in enclosing blocks and parameters of enclosing
    /// functions, innermost first.
    fn lookup_local(&self, node: &SyntaxNode, name: &str, depth: u32) -> Option<TypeSymbol> {
        let offset = node.text_range().start();
        for ancestor in node.ancestors().skip(1) {
            match ancestor.kind() {
                SyntaxKind::Block => {
                    let Some(block) = ast::Block::cast(ancestor.clone()) else {
                        continue;
                    };
                    let earlier: Vec<SyntaxNode> = block
                        .statements()
                        .filter(|stmt| stmt.text_range().end() <= offset)
                        .collect();
                    for stmt in earlier.into_iter().rev() {
                        let Some(local) = ast::LocalDeclarationStatement::cast(stmt) else {
                            continue;
                        };
                        if let Some(ty) = self.local_type(&local, name, depth) {
                            return Some(ty);
                        }
                    }
                }
                SyntaxKind::SimpleLambdaExpression
                | SyntaxKind::ParenthesizedLambdaExpression
                | SyntaxKind::AnonymousMethodExpression => {
                    if let Some(ty) = self.anonymous_function_parameter(&ancestor, offset, name, depth) {
                        return Some(ty);
                    }
                }
                SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
                    let list = ancestor.children().find_map(ast::ParameterList::cast)?;
                    let param = list
                        .parameters()
                        .find(|p| p.name_token().map_or(false, |t| token_name(t.text()) == name));
                    if let Some(param) = param {
                        return self.resolve_type(&param.ty()?, &self.scope(&ancestor));
                    }
                }
                SyntaxKind::AccessorDeclaration if name == "value" => {
                    if let Some(ty) = self.accessor_value_type(&ancestor) {
                        return Some(ty);
                    }
                }
                SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration => break,
                _ => {}
            }
        }
        None
    }

    fn local_type(
        &self,
        local: &ast::LocalDeclarationStatement,
        name: &str,
        depth: u32,
    ) -> Option<TypeSymbol> {
        let declaration = local.declaration()?;
        let declarator = declaration
            .declarators()
            .find(|d| d.name_token().map_or(false, |t| token_name(t.text()) == name))?;
        let ty = declaration.ty()?;
        let scope = self.scope(local.syntax());
        if let Some(resolved) = self.resolve_type(&ty, &scope) {
            return Some(resolved);
        }
        if is_var(&ty) {
            let value = declarator.initializer()?.value()?;
            return self.value_type(&value, depth);
        }
        None
    }

    fn anonymous_function_parameter(
        &self,
        function: &SyntaxNode,
        offset: TextSize,
        name: &str,
        depth: u32,
    ) -> Option<TypeSymbol> {
        let (parameters, body) = match function.kind() {
            SyntaxKind::SimpleLambdaExpression => {
                let lambda = ast::SimpleLambdaExpression::cast(function.clone())?;
                (lambda.parameter().into_iter().collect::<Vec<_>>(), lambda.body()?)
            }
            SyntaxKind::ParenthesizedLambdaExpression => {
                let lambda = ast::ParenthesizedLambdaExpression::cast(function.clone())?;
                let params = lambda.parameter_list()?.parameters().collect();
                (params, lambda.body()?)
            }
            _ => {
                let method = ast::AnonymousMethodExpression::cast(function.clone())?;
                let params = method
                    .parameter_list()
                    .map(|list| list.parameters().collect())
                    .unwrap_or_default();
                (params, method.body()?.syntax().clone())
            }
        };
        if !body.text_range().contains(offset) {
            return None;
        }

        let (index, param) = parameters
            .iter()
            .enumerate()
            .find(|(_, p)| p.name_token().map_or(false, |t| token_name(t.text()) == name))?;
        if let Some(ty) = param.ty() {
            return self.resolve_type(&ty, &self.scope(function));
        }
        let target = self.conversion_target(function, depth)?;
        let signature = self.callable_signature_of(&target)?;
        signature.parameters.get(index).map(|p| p.ty.clone())
    }

    /// Type of `value` inside a `set`, `add` or `remove` accessor.
    fn accessor_value_type(&self, accessor: &SyntaxNode) -> Option<TypeSymbol> {
        let keyword = accessor_keyword(accessor)?;
        if !matches!(keyword.as_str(), "set" | "add" | "remove") {
            return None;
        }
        let owner = accessor.parent()?.parent()?;
        let ty = owner.children().find_map(ast::Type::cast)?;
        self.resolve_type(&ty, &self.scope(&owner))
    }

    fn eval_member_access(&self, node: &SyntaxNode, depth: u32) -> Option<Eval> {
        let access = ast::MemberAccessExpression::cast(node.clone())?;
        let receiver = access.expression()?;
        let (name, type_args) = self.simple_name(&access.name()?)?;

        match self.eval(&receiver, depth)? {
            Eval::Value(ty) => {
                if type_args.is_empty() {
                    if let Some(member) = self.member_type(&ty, &name, Some(false)) {
                        return Some(Eval::Value(member));
                    }
                }
                let candidates = self.methods(&ty, &name, Some(false));
                (!candidates.is_empty()).then(|| {
                    Eval::Methods(MethodGroup {
                        candidates,
                        type_args,
                    })
                })
            }
            Eval::Type(ty) => {
                if let Some(full) = ty.full_name() {
                    let key = TypeKey::new(full, name.clone(), type_args.len());
                    if self.types.contains_key(&key) {
                        return Some(Eval::Type(key.instantiate(type_args)));
                    }
                }
                if type_args.is_empty() {
                    if let Some(member) = self.member_type(&ty, &name, Some(true)) {
                        return Some(Eval::Value(member));
                    }
                }
                let candidates = self.methods(&ty, &name, Some(true));
                (!candidates.is_empty()).then(|| {
                    Eval::Methods(MethodGroup {
                        candidates,
                        type_args,
                    })
                })
            }
            Eval::Namespace(namespace) => {
                let key = TypeKey::new(namespace.clone(), name.clone(), type_args.len());
                if self.types.contains_key(&key) {
                    return Some(Eval::Type(key.instantiate(type_args)));
                }
                let full = join(&namespace, &name);
                (type_args.is_empty() && self.namespaces.contains(&full))
                    .then_some(Eval::Namespace(full))
            }
            Eval::Methods(_) | Eval::AnonymousFunction => None,
        }
    }

    fn eval_invocation(&self, node: &SyntaxNode, depth: u32) -> Option<Eval> {
        let call = ast::InvocationExpression::cast(node.clone())?;
        let args = argument_expressions(call.argument_list()?.syntax());
        match self.eval(&call.expression()?, depth)? {
            Eval::Methods(group) => {
                let (method, subst) = self.pick_overload(&group, &args, depth)?;
                Some(Eval::Value(method.return_type.substitute(&subst)))
            }
            Eval::Value(ty) => Some(Eval::Value(self.callable_signature_of(&ty)?.return_type)),
            _ => None,
        }
    }

    /// First candidate whose parameters accept the arguments' natural types, or the
    /// first one with the right arity.
    fn pick_overload(
        &self,
        group: &MethodGroup,
        args: &[SyntaxNode],
        depth: u32,
    ) -> Option<(MethodDef, Substitution)> {
        let arg_types: Vec<Option<TypeSymbol>> =
            args.iter().map(|arg| self.value_type(arg, depth)).collect();

        let mut fallback = None;
        for (method, receiver) in &group.candidates {
            if method.parameters.len() != args.len() {
                continue;
            }
            let observed: Vec<(TypeSymbol, TypeSymbol)> = method
                .parameters
                .iter()
                .zip(&arg_types)
                .filter_map(|(p, arg)| Some((p.ty.clone(), arg.clone()?)))
                .collect();
            let Some(subst) = method_substitution(method, receiver, &group.type_args, &observed)
            else {
                continue;
            };
            let accepts = method.parameters.iter().zip(&arg_types).all(|(p, arg)| {
                arg.as_ref().map_or(true, |arg| {
                    let expected = p.ty.substitute(&subst);
                    &expected == arg || expected == TypeSymbol::object()
                })
            });
            if accepts {
                return Some((method.clone(), subst));
            }
            fallback.get_or_insert((method.clone(), subst));
        }
        fallback
    }

    fn eval_binary(&self, node: &SyntaxNode, depth: u32) -> Option<Eval> {
        let op = first_operator(node)?;
        let bool_result = matches!(
            op,
            SyntaxKind::EqEq
                | SyntaxKind::BangEq
                | SyntaxKind::Less
                | SyntaxKind::LessEq
                | SyntaxKind::Greater
                | SyntaxKind::GreaterEq
                | SyntaxKind::AmpAmp
                | SyntaxKind::PipePipe
        );
        if bool_result {
            return Some(Eval::Value(TypeSymbol::bool()));
        }

        let mut operands = node.children();
        let left = operands.next().and_then(|n| self.value_type(&n, depth));
        if op == SyntaxKind::Plus {
            let right = operands.next().and_then(|n| self.value_type(&n, depth));
            let string = TypeSymbol::string();
            if left.as_ref() == Some(&string) || right.as_ref() == Some(&string) {
                return Some(Eval::Value(string));
            }
        }
        left.map(Eval::Value)
    }

    // --- Conversions ---

    fn converted_type(&self, node: &SyntaxNode, eval: &Eval, depth: u32) -> Option<TypeSymbol> {
        let target = self.conversion_target(node, depth)?;
        self.converts_to(eval, &target).then_some(target)
    }

    fn converts_to(&self, eval: &Eval, target: &TypeSymbol) -> bool {
        match eval {
            Eval::Methods(group) => self
                .callable_signature_of(target)
                .map_or(false, |signature| self.group_converts(group, &signature)),
            Eval::AnonymousFunction => self.callable_signature_of(target).is_some(),
            Eval::Value(ty) => ty == target,
            Eval::Type(_) | Eval::Namespace(_) => false,
        }
    }

    /// A method group converts when some candidate takes exactly the delegate's
    /// parameter types and returns a compatible type.
    fn group_converts(&self, group: &MethodGroup, signature: &CallableSignature) -> bool {
        group.candidates.iter().any(|(method, receiver)| {
            if method.parameters.len() != signature.parameters.len() {
                return false;
            }
            let mut observed: Vec<(TypeSymbol, TypeSymbol)> = method
                .parameters
                .iter()
                .zip(&signature.parameters)
                .map(|(p, target)| (p.ty.clone(), target.ty.clone()))
                .collect();
            observed.push((method.return_type.clone(), signature.return_type.clone()));
            let Some(subst) = method_substitution(method, receiver, &group.type_args, &observed)
            else {
                return false;
            };

            let parameters_match = method
                .parameters
                .iter()
                .zip(&signature.parameters)
                .all(|(p, target)| p.ty.substitute(&subst) == target.ty);
            parameters_match
                && self.return_compatible(&method.return_type.substitute(&subst), &signature.return_type)
        })
    }

    fn return_compatible(&self, method: &TypeSymbol, delegate: &TypeSymbol) -> bool {
        if method == delegate {
            return true;
        }
        !method.is_void() && *delegate == TypeSymbol::object() && self.is_reference_type(method)
    }

    /// The type an expression at `node` is converted to by its context, if any.
    fn conversion_target(&self, node: &SyntaxNode, depth: u32) -> Option<TypeSymbol> {
        if depth > MAX_DEPTH {
            return None;
        }
        let depth = depth + 1;

        let mut expr = node.clone();
        let mut parent = expr.parent()?;
        while parent.kind() == SyntaxKind::ParenthesizedExpression {
            expr = parent;
            parent = expr.parent()?;
        }

        let target = match parent.kind() {
            SyntaxKind::EqualsValueClause => self.initializer_target(&parent)?,
            SyntaxKind::AssignmentExpression => {
                let assign = ast::AssignmentExpression::cast(parent.clone())?;
                if assign.right()? != expr {
                    return None;
                }
                self.value_type(&assign.left()?, depth)?
            }
            SyntaxKind::Argument => self.argument_target(&parent, &expr, depth)?,
            SyntaxKind::ReturnStatement | SyntaxKind::ArrowExpressionClause => {
                self.return_target(&parent, depth)?
            }
            SyntaxKind::SimpleLambdaExpression | SyntaxKind::ParenthesizedLambdaExpression => {
                if parent.children().nth(1).as_ref() != Some(&expr) {
                    return None;
                }
                let delegate = self.conversion_target(&parent, depth)?;
                self.callable_signature_of(&delegate)?.return_type
            }
            SyntaxKind::CastExpression => {
                let cast = ast::CastExpression::cast(parent.clone())?;
                if cast.expression()? != expr {
                    return None;
                }
                self.resolve_type(&cast.ty()?, &self.scope(&parent))?
            }
            _ => return None,
        };
        (!target.is_void()).then_some(target)
    }

    /// Declared type of the variable, parameter or property an `= value` belongs to.
    fn initializer_target(&self, clause: &SyntaxNode) -> Option<TypeSymbol> {
        let owner = clause.parent()?;
        let ty = match owner.kind() {
            SyntaxKind::VariableDeclarator => {
                let declaration = ast::VariableDeclaration::cast(owner.parent()?)?;
                declaration.ty()?
            }
            SyntaxKind::Parameter => ast::Parameter::cast(owner.clone())?.ty()?,
            SyntaxKind::PropertyDeclaration => ast::PropertyDeclaration::cast(owner.clone())?.ty()?,
            _ => return None,
        };
        self.resolve_type(&ty, &self.scope(&owner))
    }

    fn argument_target(&self, argument: &SyntaxNode, expr: &SyntaxNode, depth: u32) -> Option<TypeSymbol> {
        let list = argument.parent()?;
        let args = argument_expressions(&list);
        let index = list
            .children()
            .filter(|n| n.kind() == SyntaxKind::Argument)
            .position(|a| &a == argument)?;
        let owner = list.parent()?;

        match owner.kind() {
            SyntaxKind::InvocationExpression => {
                let call = ast::InvocationExpression::cast(owner)?;
                match self.eval(&call.expression()?, depth)? {
                    Eval::Methods(group) => self.argument_target_in_group(&group, &args, index, expr, depth),
                    Eval::Value(ty) => self
                        .callable_signature_of(&ty)?
                        .parameters
                        .get(index)
                        .map(|p| p.ty.clone()),
                    _ => None,
                }
            }
            SyntaxKind::ObjectCreationExpression => {
                let creation = ast::ObjectCreationExpression::cast(owner.clone())?;
                let ty = self.resolve_type(&creation.ty()?, &self.scope(&owner))?;
                let def = self.types.get(&TypeKey::of(&ty)?)?;
                if def.kind == TypeDefKind::Delegate {
                    return (args.len() == 1).then_some(ty);
                }
                let subst = def.substitution_for(&ty);
                def.constructors
                    .iter()
                    .find(|params| params.len() == args.len())
                    .and_then(|params| params.get(index))
                    .map(|p| p.ty.substitute(&subst))
            }
            _ => None,
        }
    }

    fn argument_target_in_group(
        &self,
        group: &MethodGroup,
        args: &[SyntaxNode],
        index: usize,
        expr: &SyntaxNode,
        depth: u32,
    ) -> Option<TypeSymbol> {
        let mut targets: Vec<TypeSymbol> = Vec::new();
        for (method, receiver) in &group.candidates {
            if method.parameters.len() != args.len() {
                continue;
            }
            let observed: Vec<(TypeSymbol, TypeSymbol)> = args
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .filter_map(|(i, arg)| {
                    Some((method.parameters[i].ty.clone(), self.value_type(arg, depth)?))
                })
                .collect();
            let Some(subst) = method_substitution(method, receiver, &group.type_args, &observed)
            else {
                continue;
            };
            let ty = method.parameters[index].ty.substitute(&subst);
            if ty.mentions_any(&method.type_params) || targets.contains(&ty) {
                continue;
            }
            targets.push(ty);
        }

        if targets.len() <= 1 {
            return targets.pop();
        }
        let own = self.eval(expr, depth)?;
        targets.into_iter().find(|ty| self.converts_to(&own, ty))
    }

    /// Return type of the function a `return` or `=>` body belongs to.
    fn return_target(&self, from: &SyntaxNode, depth: u32) -> Option<TypeSymbol> {
        for ancestor in from.ancestors() {
            match ancestor.kind() {
                SyntaxKind::MethodDeclaration => {
                    let method = ast::MethodDeclaration::cast(ancestor.clone())?;
                    return self.resolve_type(&method.return_type()?, &self.scope(&ancestor));
                }
                SyntaxKind::SimpleLambdaExpression
                | SyntaxKind::ParenthesizedLambdaExpression
                | SyntaxKind::AnonymousMethodExpression => {
                    let delegate = self.conversion_target(&ancestor, depth)?;
                    return Some(self.callable_signature_of(&delegate)?.return_type);
                }
                SyntaxKind::AccessorDeclaration => {
                    if accessor_keyword(&ancestor)?.as_str() != "get" {
                        return None;
                    }
                }
                SyntaxKind::PropertyDeclaration => {
                    let property = ast::PropertyDeclaration::cast(ancestor.clone())?;
                    return self.resolve_type(&property.ty()?, &self.scope(&ancestor));
                }
                SyntaxKind::ConstructorDeclaration
                | SyntaxKind::EventDeclaration
                | SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration => return None,
                _ => {}
            }
        }
        None
    }
}

impl TypeResolver for SourceTypeResolver {
    fn type_of(&self, node: &SyntaxNode) -> Option<TypeSymbol> {
        if !self.tree.contains(node) {
            tracing::trace!(target = "recast.types", range = ?node.text_range(), "node from another tree");
            return None;
        }
        let node = member_access_of_name(node).unwrap_or_else(|| node.clone());
        let ty = match self.eval(&node, 0)? {
            Eval::Value(ty) | Eval::Type(ty) => Some(ty),
            Eval::Namespace(_) => None,
            eval @ (Eval::Methods(_) | Eval::AnonymousFunction) => {
                self.converted_type(&node, &eval, 0)
            }
        };
        tracing::trace!(
            target = "recast.types",
            kind = ?node.kind(),
            range = ?node.text_range(),
            ty = ?ty,
            "type_of"
        );
        ty
    }

    fn callable_signature_of(&self, ty: &TypeSymbol) -> Option<CallableSignature> {
        let def = self.types.get(&TypeKey::of(ty)?)?;
        if def.kind != TypeDefKind::Delegate {
            return None;
        }
        let invoke = def.invoke.as_ref()?;
        Some(invoke.substitute(&def.substitution_for(ty)))
    }

    fn minimal_display(&self, ty: &TypeSymbol, position: TextSize) -> String {
        self.display_at(ty, position)
    }
}

/// Type substitution for one candidate method: the receiver's bindings plus the
/// method's own type parameters, taken from explicit type arguments or inferred
/// from `observed` (declared type, actual type) pairs.
fn method_substitution(
    method: &MethodDef,
    receiver: &Substitution,
    explicit: &[TypeSymbol],
    observed: &[(TypeSymbol, TypeSymbol)],
) -> Option<Substitution> {
    let mut subst = receiver.clone();
    if !explicit.is_empty() {
        if explicit.len() != method.type_params.len() {
            return None;
        }
        subst.extend(method.type_params.iter().cloned().zip(explicit.iter().cloned()));
        return Some(subst);
    }
    let mut inferred = Substitution::new();
    for (declared, actual) in observed {
        unify(&declared.substitute(receiver), actual, &method.type_params, &mut inferred);
    }
    subst.extend(inferred);
    Some(subst)
}

fn unify(pattern: &TypeSymbol, actual: &TypeSymbol, params: &[String], subst: &mut Substitution) {
    match (pattern, actual) {
        (TypeSymbol::TypeParameter(name), _) if params.contains(name) => {
            subst.entry(name.clone()).or_insert_with(|| actual.clone());
        }
        (TypeSymbol::Array(pattern), TypeSymbol::Array(actual)) => {
            unify(pattern, actual, params, subst)
        }
        (
            TypeSymbol::Named {
                namespace: pattern_ns,
                name: pattern_name,
                args: pattern_args,
            },
            TypeSymbol::Named {
                namespace,
                name,
                args,
            },
        ) if pattern_ns == namespace && pattern_name == name && pattern_args.len() == args.len() => {
            for (pattern, actual) in pattern_args.iter().zip(args) {
                unify(pattern, actual, params, subst);
            }
        }
        _ => {}
    }
}

fn literal_type(node: &SyntaxNode) -> Option<TypeSymbol> {
    let token = ast::LiteralExpression::cast(node.clone())?.token()?;
    let text = token.text().to_ascii_lowercase();
    let name = match token.kind() {
        SyntaxKind::IntLiteral => {
            if text.ends_with("ul") || text.ends_with("lu") {
                "UInt64"
            } else if text.ends_with('l') {
                "Int64"
            } else if text.ends_with('u') {
                "UInt32"
            } else {
                "Int32"
            }
        }
        SyntaxKind::RealLiteral => {
            if text.ends_with('f') {
                "Single"
            } else if text.ends_with('m') {
                "Decimal"
            } else {
                "Double"
            }
        }
        SyntaxKind::CharLiteral => "Char",
        SyntaxKind::StringLiteral => "String",
        SyntaxKind::TrueKw | SyntaxKind::FalseKw => "Boolean",
        _ => return None,
    };
    Some(TypeSymbol::system(name))
}

/// The member access when `node` is the name to the right of its `.`.
fn member_access_of_name(node: &SyntaxNode) -> Option<SyntaxNode> {
    if !matches!(node.kind(), SyntaxKind::IdentifierName | SyntaxKind::GenericName) {
        return None;
    }
    let parent = node.parent()?;
    (parent.kind() == SyntaxKind::MemberAccessExpression
        && parent.children().nth(1).as_ref() == Some(node))
    .then_some(parent)
}

fn argument_expressions(list: &SyntaxNode) -> Vec<SyntaxNode> {
    list.children()
        .filter_map(ast::Argument::cast)
        .filter_map(|arg| arg.expression())
        .collect()
}

fn first_operator(node: &SyntaxNode) -> Option<SyntaxKind> {
    node.children_with_tokens()
        .filter_map(|el| el.into_token())
        .map(|tok| tok.kind())
        .find(|kind| !kind.is_trivia())
}

fn accessor_keyword(accessor: &SyntaxNode) -> Option<String> {
    accessor
        .children_with_tokens()
        .filter_map(|el| el.into_token())
        .find(|tok| tok.kind() == SyntaxKind::Identifier)
        .map(|tok| tok.text().to_string())
}

fn has_modifier(node: &SyntaxNode, modifier: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|el| el.into_token())
        .any(|tok| tok.kind() == modifier)
}

fn declared_name(node: &SyntaxNode) -> Option<String> {
    let token = match ast::DelegateDeclaration::cast(node.clone()) {
        Some(delegate) => delegate.name_token()?,
        None => ast::TypeDeclaration::cast(node.clone())?.name_token()?,
    };
    Some(token_name(token.text()))
}

fn token_name(text: &str) -> String {
    text.trim_start_matches('@').to_string()
}

fn is_var(ty: &ast::Type) -> bool {
    matches!(ty, ast::Type::IdentifierName(name) if name.text() == "var")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recast_syntax::parse;
    use recast_test_utils::extract_caret;

    use super::*;

    fn type_at(fixture: &str) -> Option<TypeSymbol> {
        let (text, caret) = extract_caret(fixture);
        let tree = parse(&text).tree;
        let resolver = SourceTypeResolver::new(&tree);
        let node = tree.find_node_at(caret.start()).unwrap();
        resolver.type_of(&node)
    }

    fn type_of_first(text: &str, kind: SyntaxKind) -> Option<TypeSymbol> {
        let tree = parse(text).tree;
        let resolver = SourceTypeResolver::new(&tree);
        let node = tree.root().descendants().find(|n| n.kind() == kind).unwrap();
        resolver.type_of(&node)
    }

    fn action_of(args: Vec<TypeSymbol>) -> TypeSymbol {
        TypeSymbol::named("System", "Action", args)
    }

    #[test]
    fn method_group_converts_to_declared_delegate_type() {
        let ty = type_at(
            "using System;\nclass C { void Foo(int x) { } void M() { Action<int> a = /*caret*/Foo; } }",
        );
        assert_eq!(ty, Some(action_of(vec![TypeSymbol::int()])));
    }

    #[test]
    fn method_group_without_matching_overload_has_no_type() {
        let ty = type_at(
            "using System;\nclass C { void Foo(string x) { } void M() { Action<int> a = /*caret*/Foo; } }",
        );
        assert_eq!(ty, None);

        let ty = type_at("class C { void Foo() { } void M() { var a = /*caret*/Foo; } }");
        assert_eq!(ty, None);
    }

    #[test]
    fn return_types_must_match() {
        let ty = type_at(
            "using System;\nclass C { int Foo() { return 1; } void M() { Action a = /*caret*/Foo; } }",
        );
        assert_eq!(ty, None);

        let ty = type_at(
            "using System;\nclass C { string Foo() { return \"\"; } void M() { Func<object> f = /*caret*/Foo; } }",
        );
        assert_eq!(
            ty,
            Some(TypeSymbol::named("System", "Func", vec![TypeSymbol::object()]))
        );
    }

    #[test]
    fn generic_methods_infer_type_arguments_from_the_delegate() {
        let ty = type_at(
            "using System;\nclass C { void Log<T>(T value) { } void M() { Action<string> a = /*caret*/Log; } }",
        );
        assert_eq!(ty, Some(action_of(vec![TypeSymbol::string()])));
    }

    #[test]
    fn arguments_take_the_parameter_type() {
        let ty = type_at(
            "using System.Collections.Generic;\nclass C { void Print(int x) { } void M(List<int> xs) { xs.ForEach(/*caret*/Print); } }",
        );
        assert_eq!(ty, Some(action_of(vec![TypeSymbol::int()])));
    }

    #[test]
    fn event_subscription_converts_to_the_event_type() {
        let ty = type_at(
            "using System;\nclass C { event EventHandler Changed; void OnChanged(object sender, EventArgs e) { } void M() { Changed += /*caret*/OnChanged; } }",
        );
        assert_eq!(ty, Some(TypeSymbol::system("EventHandler")));
    }

    #[test]
    fn locals_and_parameters_resolve() {
        assert_eq!(
            type_at("class C { void M(string s) { int n = 1; var t = n; Use(/*caret*/t); } }"),
            Some(TypeSymbol::int())
        );
        assert_eq!(
            type_at("class C { void M(string s) { Use(/*caret*/s); } }"),
            Some(TypeSymbol::string())
        );
    }

    #[test]
    fn implicitly_typed_lambda_parameters_take_the_target_signature() {
        let ty = type_at(
            "using System;\nclass C { void M() { Func<string, int> f = s => s./*caret*/Length; } }",
        );
        assert_eq!(ty, Some(TypeSymbol::int()));
    }

    #[test]
    fn member_access_on_types_and_instances() {
        assert_eq!(
            type_at("using System;\nclass C { void M() { var e = EventArgs./*caret*/Empty; } }"),
            Some(TypeSymbol::system("EventArgs"))
        );
        assert_eq!(
            type_at("class C { void M(int[] xs) { Use(xs./*caret*/Length); } }"),
            Some(TypeSymbol::int())
        );
    }

    #[test]
    fn invocations_substitute_generic_returns() {
        let ty = type_of_first(
            "using System.Collections.Generic;\nclass C { void M(List<string> xs) { xs.Find(null); } }",
            SyntaxKind::InvocationExpression,
        );
        assert_eq!(ty, Some(TypeSymbol::string()));
    }

    #[test]
    fn literals_and_operators() {
        assert_eq!(type_at("class C { object o = /*caret*/10L; }"), Some(TypeSymbol::system("Int64")));
        assert_eq!(type_at("class C { object o = /*caret*/1.5f; }"), Some(TypeSymbol::system("Single")));
        assert_eq!(
            type_of_first("class C { object o = \"a\" + 1; }", SyntaxKind::BinaryExpression),
            Some(TypeSymbol::string())
        );
        assert_eq!(
            type_of_first("class C { object o = 1 < 2; }", SyntaxKind::BinaryExpression),
            Some(TypeSymbol::bool())
        );
        assert_eq!(type_at("class C { object o = /*caret*/null; }"), None);
    }

    #[test]
    fn delegate_declarations_expose_their_signature() {
        let text = "namespace N { delegate int Combine(int a, int b); }";
        let tree = parse(text).tree;
        let resolver = SourceTypeResolver::new(&tree);
        let signature = resolver
            .callable_signature_of(&TypeSymbol::named("N", "Combine", Vec::new()))
            .unwrap();
        assert_eq!(
            signature,
            CallableSignature::new(
                vec![
                    Parameter::new("a", TypeSymbol::int()),
                    Parameter::new("b", TypeSymbol::int())
                ],
                TypeSymbol::int()
            )
        );
        assert_eq!(resolver.callable_signature_of(&TypeSymbol::int()), None);
    }

    #[test]
    fn nodes_of_other_trees_are_not_resolved() {
        let text = "class C { int x = 1; }";
        let tree = parse(text).tree;
        let other = parse(text).tree;
        let resolver = SourceTypeResolver::new(&tree);
        let offset = TextSize::from(text.find('1').unwrap() as u32);
        let foreign = other.find_node_at(offset).unwrap();
        assert_eq!(resolver.type_of(&foreign), None);
        let own = tree.find_node_at(offset).unwrap();
        assert_eq!(resolver.type_of(&own), Some(TypeSymbol::int()));
    }
}
