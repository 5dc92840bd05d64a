#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use recast_core::CancellationToken;
use recast_refactor::{commit, IdentityFormatter, RefactorContext, RefactorDriver};
use recast_syntax::{parse, SyntaxNode, SyntaxTree, TextRange, TextSize};
use recast_test_utils::extract_selection;
use recast_types::{CallableSignature, SourceTypeResolver, TypeResolver, TypeSymbol};

pub struct Fixture {
    pub text: String,
    pub tree: SyntaxTree,
    pub resolver: SourceTypeResolver,
    pub selection: TextRange,
}

pub fn fixture(marked: &str) -> Fixture {
    let (text, selection) = extract_selection(marked);
    let parse = parse(&text);
    assert!(parse.ok(), "{:?}", parse.errors);
    let resolver = SourceTypeResolver::new(&parse.tree);
    Fixture {
        text,
        tree: parse.tree,
        resolver,
        selection,
    }
}

/// Runs the built-in rules at the marker and returns the committed text.
pub fn rewrite(marked: &str) -> Option<String> {
    let fixture = fixture(marked);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let driver = RefactorDriver::with_builtin_rules();
    let pending = driver.compute_edit(&fixture.tree, fixture.selection, &ctx)?;
    let committed = commit(&fixture.tree, &pending, &ctx, &IdentityFormatter).unwrap();
    Some(committed.tree.text())
}

/// Counts every semantic query before forwarding it.
pub struct Counting<R> {
    pub inner: R,
    calls: AtomicUsize,
}

impl<R> Counting<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<R: TypeResolver> TypeResolver for Counting<R> {
    fn type_of(&self, node: &SyntaxNode) -> Option<TypeSymbol> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.type_of(node)
    }

    fn callable_signature_of(&self, ty: &TypeSymbol) -> Option<CallableSignature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.callable_signature_of(ty)
    }

    fn minimal_display(&self, ty: &TypeSymbol, position: TextSize) -> String {
        self.inner.minimal_display(ty, position)
    }
}

/// Answers every identifier with one fixed delegate type.
pub struct FixedResolver {
    pub ty: TypeSymbol,
    pub signature: CallableSignature,
}

impl TypeResolver for FixedResolver {
    fn type_of(&self, node: &SyntaxNode) -> Option<TypeSymbol> {
        (node.kind() == recast_syntax::SyntaxKind::IdentifierName).then(|| self.ty.clone())
    }

    fn callable_signature_of(&self, ty: &TypeSymbol) -> Option<CallableSignature> {
        (ty == &self.ty).then(|| self.signature.clone())
    }
}

pub fn range_of(text: &str, needle: &str) -> TextRange {
    let start = text.find(needle).unwrap();
    TextRange::at(
        TextSize::from(start as u32),
        TextSize::from(needle.len() as u32),
    )
}
