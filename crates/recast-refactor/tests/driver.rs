mod common;

use std::cell::Cell;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use recast_config::{RecastConfig, RefactorConfig};
use recast_core::{apply_text_edits, CancellationToken};
use recast_refactor::{
    commit, CodeActionKind, FormatAnnotation, Formatter, IdentityFormatter, MatchData,
    RefactorContext, RefactorDriver, RefactorError, RefactoringRule, RuleId, RuleMatch,
    METHOD_GROUP_TO_ANONYMOUS_METHOD,
};
use recast_syntax::{make, parse, GreenNode, NodeHandle, SyntaxNode, SyntaxTree, TextRange, TreeError};
use recast_types::CallableSignature;

use common::fixture;

const ACTION_OF_INT: &str = r#"using System;

class Program
{
    static void Foo(int x) { }

    static void Main()
    {
        Action<int> a = /*caret*/Foo;
    }
}
"#;

/// Records the annotation it was handed.
#[derive(Default)]
struct Recording {
    seen: Cell<Option<FormatAnnotation>>,
}

impl Formatter for Recording {
    fn format(&self, tree: SyntaxTree, annotation: FormatAnnotation) -> SyntaxTree {
        self.seen.set(Some(annotation));
        tree
    }
}

/// Replaces any identifier with `Renamed`; registered to observe ordering.
struct RenameEverything;

impl RefactoringRule for RenameEverything {
    fn id(&self) -> RuleId {
        RuleId::new("rename-everything")
    }

    fn default_title(&self) -> &'static str {
        "Rename everything"
    }

    fn probe(
        &self,
        _ctx: &RefactorContext<'_>,
        node: &SyntaxNode,
        _selection: TextRange,
    ) -> Option<RuleMatch> {
        (node.kind() == recast_syntax::SyntaxKind::IdentifierName).then(|| RuleMatch {
            target: NodeHandle::new(node),
            data: MatchData::Callable(CallableSignature::new(
                Vec::new(),
                recast_types::TypeSymbol::Void,
            )),
        })
    }

    fn build(
        &self,
        _ctx: &RefactorContext<'_>,
        _matched: &RuleMatch,
    ) -> Result<GreenNode, RefactorError> {
        Ok(make::identifier_name("Renamed"))
    }
}

#[test]
fn commit_hands_the_inserted_range_to_the_formatter() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = RefactorDriver::default()
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();

    let formatter = Recording::default();
    let committed = commit(&fixture.tree, &pending, &ctx, &formatter).unwrap();
    let annotation = formatter.seen.get().unwrap();
    assert_eq!(annotation, committed.annotation);

    let text = committed.tree.text();
    assert_eq!(&text[annotation.range], "delegate(int obj) { Foo(obj); }");
    assert_eq!(annotation.range.start(), fixture.selection.start());
}

#[test]
fn text_edit_matches_tree_edit() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = RefactorDriver::default()
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    let edit = pending.realize(&ctx).unwrap();

    let via_tree = edit.apply(&fixture.tree).unwrap().text();
    let via_text = apply_text_edits(&fixture.text, &[edit.to_text_edit()]).unwrap();
    assert_eq!(via_tree, via_text);
    assert_eq!(edit.to_text_edit().range, edit.replaced_range);
}

#[test]
fn applied_tree_reparses_to_the_same_structure() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = RefactorDriver::default()
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    let committed = commit(&fixture.tree, &pending, &ctx, &IdentityFormatter).unwrap();

    let reparsed = parse(&committed.tree.text());
    assert!(reparsed.ok(), "{:?}", reparsed.errors);
    assert_eq!(reparsed.tree.debug_dump(), committed.tree.debug_dump());
}

#[test]
fn edits_are_rejected_by_other_tree_versions() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = RefactorDriver::default()
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    let edit = pending.realize(&ctx).unwrap();

    let newer = edit.apply(&fixture.tree).unwrap();
    let err = edit.apply(&newer).unwrap_err();
    assert_eq!(
        err,
        RefactorError::StructuralInconsistency(TreeError::NodeNotFound {
            range: edit.replaced_range
        })
    );

    // Same text, different version.
    let reparsed = parse(&fixture.text).tree;
    assert!(matches!(
        edit.apply(&reparsed),
        Err(RefactorError::StructuralInconsistency(_))
    ));
    assert!(commit(&reparsed, &pending, &ctx, &IdentityFormatter).is_err());
}

#[test]
fn untouched_subtrees_are_shared_after_commit() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = RefactorDriver::default()
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    let committed = commit(&fixture.tree, &pending, &ctx, &IdentityFormatter).unwrap();

    let using_before = fixture.tree.root().first_child().unwrap();
    let using_after = committed.tree.root().first_child().unwrap();
    assert_eq!(using_before.kind(), recast_syntax::SyntaxKind::UsingDirective);
    assert!(std::ptr::eq(
        &*using_before.green(),
        &*using_after.green()
    ));
}

#[test]
fn preview_renders_a_unified_diff() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = RefactorDriver::default()
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    let edit = pending.realize(&ctx).unwrap();

    let diff = edit.preview(&fixture.tree, "Program.cs").unwrap();
    assert!(diff.starts_with("--- a/Program.cs\n+++ b/Program.cs\n"), "{diff}");
    assert!(diff
        .lines()
        .any(|line| line.starts_with('-') && line.contains("Action<int> a = Foo;")));
    assert!(diff.lines().any(|line| line.starts_with('+')
        && line.contains("Action<int> a = delegate(int obj) { Foo(obj); };")));
}

#[test]
fn disabled_rules_are_not_registered() {
    let config = RecastConfig::load_from_str(
        "[refactor]\ndisabled_rules = [\"method-group-to-anonymous-method\"]\n",
    )
    .unwrap();
    let driver = RefactorDriver::from_config(&config.refactor);
    assert!(driver.rule_ids().is_empty());

    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    assert!(driver
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .is_none());
}

#[test]
fn configured_titles_override_defaults() {
    let mut config = RefactorConfig::default();
    config.titles.insert(
        METHOD_GROUP_TO_ANONYMOUS_METHOD.to_string(),
        "Convert to delegate".to_string(),
    );
    let driver = RefactorDriver::from_config(&config);
    assert_eq!(
        driver.rule_ids(),
        vec![RuleId::new(METHOD_GROUP_TO_ANONYMOUS_METHOD)]
    );

    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let pending = driver
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    assert_eq!(pending.title, "Convert to delegate");
    assert_eq!(pending.kind, CodeActionKind::RefactorRewrite);
}

#[test]
fn first_registered_rule_wins() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);

    let mut driver = RefactorDriver::with_builtin_rules();
    driver.register(Arc::new(RenameEverything));
    let pending = driver
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    assert_eq!(pending.rule_id.as_str(), METHOD_GROUP_TO_ANONYMOUS_METHOD);

    let all = driver.available_refactorings(&fixture.tree, fixture.selection, &ctx);
    let ids: Vec<&str> = all.iter().map(|p| p.rule_id.as_str()).collect();
    assert_eq!(ids, vec![METHOD_GROUP_TO_ANONYMOUS_METHOD, "rename-everything"]);

    let mut reversed = RefactorDriver::new(Default::default());
    reversed.register(Arc::new(RenameEverything));
    reversed.register(Arc::new(recast_refactor::MethodGroupToAnonymousMethod));
    let pending = reversed
        .compute_edit(&fixture.tree, fixture.selection, &ctx)
        .unwrap();
    assert_eq!(pending.title, "Rename everything");
    let committed = commit(&fixture.tree, &pending, &ctx, &IdentityFormatter).unwrap();
    assert!(committed.tree.text().contains("Action<int> a = Renamed;"));
}

#[test]
fn offsets_outside_the_tree_yield_nothing() {
    let fixture = fixture(ACTION_OF_INT);
    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let past_end = TextRange::empty(fixture.tree.text_len() + recast_syntax::TextSize::from(5));
    assert!(RefactorDriver::default()
        .compute_edit(&fixture.tree, past_end, &ctx)
        .is_none());
}

#[test]
fn probes_run_concurrently_over_one_tree() {
    let fixture = fixture(ACTION_OF_INT);
    let driver = RefactorDriver::default();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let cancel = CancellationToken::new();
                    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
                    driver.compute_edit(&fixture.tree, fixture.selection, &ctx)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    let cancel = CancellationToken::new();
    let ctx = RefactorContext::new(&fixture.resolver, &cancel);
    let expected = results[0].realize(&ctx).unwrap();
    for pending in &results {
        assert_eq!(pending.matched, results[0].matched);
        // Pending refactorings found on another thread still apply here.
        let edit = pending.realize(&ctx).unwrap();
        assert_eq!(edit, expected);
        assert!(edit.apply(&fixture.tree).is_ok());
    }
}
