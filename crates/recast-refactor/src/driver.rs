use std::fmt;
use std::sync::Arc;

use recast_config::RefactorConfig;
use recast_syntax::{SyntaxNode, SyntaxTree, TextRange};

use crate::catalog::TitleCatalog;
use crate::edit::RefactoringEdit;
use crate::format::{FormatAnnotation, Formatter};
use crate::rule::{CodeActionKind, RefactoringRule, RuleId, RuleMatch};
use crate::{MethodGroupToAnonymousMethod, RefactorContext, RefactorError};

/// Runs registered rules against a caret position.
///
/// The driver holds no per-request state, so one instance can serve any number
/// of concurrent requests.
#[derive(Clone)]
pub struct RefactorDriver {
    rules: Vec<Arc<dyn RefactoringRule>>,
    titles: TitleCatalog,
}

fn builtin_rules() -> Vec<Arc<dyn RefactoringRule>> {
    vec![Arc::new(MethodGroupToAnonymousMethod)]
}

impl RefactorDriver {
    /// A driver with no rules.
    pub fn new(titles: TitleCatalog) -> Self {
        Self {
            rules: Vec::new(),
            titles,
        }
    }

    pub fn with_builtin_rules() -> Self {
        let mut driver = Self::new(TitleCatalog::new());
        for rule in builtin_rules() {
            driver.register(rule);
        }
        driver
    }

    /// Built-in rules minus the disabled ones, titled by the configured overrides.
    pub fn from_config(config: &RefactorConfig) -> Self {
        let titles = config
            .titles
            .iter()
            .map(|(id, title)| (id.as_str(), title.as_str()))
            .collect();
        let mut driver = Self::new(titles);
        for rule in builtin_rules() {
            let id = rule.id();
            if config.is_enabled(id.as_str()) {
                driver.register(rule);
            } else {
                tracing::debug!(target = "recast.refactor", rule = %id, "rule disabled");
            }
        }
        driver
    }

    /// Rules are probed in registration order.
    pub fn register(&mut self, rule: Arc<dyn RefactoringRule>) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// The first applicable refactoring at `selection`, if any.
    pub fn compute_edit(
        &self,
        tree: &SyntaxTree,
        selection: TextRange,
        ctx: &RefactorContext<'_>,
    ) -> Option<PendingRefactoring> {
        let node = self.node_at(tree, selection, ctx)?;
        self.rules
            .iter()
            .find_map(|rule| self.probe(rule, &node, selection, ctx))
    }

    /// Every applicable refactoring at `selection`, in registration order.
    pub fn available_refactorings(
        &self,
        tree: &SyntaxTree,
        selection: TextRange,
        ctx: &RefactorContext<'_>,
    ) -> Vec<PendingRefactoring> {
        let Some(node) = self.node_at(tree, selection, ctx) else {
            return Vec::new();
        };
        self.rules
            .iter()
            .filter_map(|rule| self.probe(rule, &node, selection, ctx))
            .collect()
    }

    fn node_at(
        &self,
        tree: &SyntaxTree,
        selection: TextRange,
        ctx: &RefactorContext<'_>,
    ) -> Option<SyntaxNode> {
        if ctx.is_cancelled() {
            tracing::trace!(target = "recast.refactor", "request cancelled");
            return None;
        }
        match tree.find_node_at(selection.start()) {
            Ok(node) => Some(node),
            Err(err) => {
                tracing::trace!(target = "recast.refactor", error = %err, "no node at selection");
                None
            }
        }
    }

    fn probe(
        &self,
        rule: &Arc<dyn RefactoringRule>,
        node: &SyntaxNode,
        selection: TextRange,
        ctx: &RefactorContext<'_>,
    ) -> Option<PendingRefactoring> {
        let matched = rule.probe(ctx, node, selection)?;
        Some(PendingRefactoring {
            rule_id: rule.id(),
            title: self.titles.title_for(rule.as_ref()),
            kind: rule.kind(),
            target_range: matched.target_range(),
            matched,
            rule: Arc::clone(rule),
        })
    }
}

impl Default for RefactorDriver {
    fn default() -> Self {
        Self::with_builtin_rules()
    }
}

impl fmt::Debug for RefactorDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefactorDriver")
            .field("rules", &self.rule_ids())
            .field("titles", &self.titles)
            .finish()
    }
}

/// An applicable refactoring whose edit has not been built yet.
#[derive(Clone)]
pub struct PendingRefactoring {
    pub rule_id: RuleId,
    pub title: String,
    pub kind: CodeActionKind,
    pub target_range: TextRange,
    pub matched: RuleMatch,
    rule: Arc<dyn RefactoringRule>,
}

impl PendingRefactoring {
    /// Build the edit. Runs to completion once started; cancellation is not
    /// consulted here.
    pub fn realize(&self, ctx: &RefactorContext<'_>) -> Result<RefactoringEdit, RefactorError> {
        let new_node = self.rule.build(ctx, &self.matched)?;
        let edit = RefactoringEdit::new(self.matched.target.clone(), new_node);
        tracing::debug!(
            target = "recast.refactor",
            rule = %self.rule_id,
            range = ?edit.replaced_range,
            "edit built"
        );
        Ok(edit)
    }
}

impl fmt::Debug for PendingRefactoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRefactoring")
            .field("rule_id", &self.rule_id)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("target_range", &self.target_range)
            .finish_non_exhaustive()
    }
}

/// Result of [`commit`].
#[derive(Debug, Clone)]
pub struct Committed {
    pub tree: SyntaxTree,
    pub edit: RefactoringEdit,
    pub annotation: FormatAnnotation,
}

/// Realize `pending`, apply it to `tree` and let `formatter` tidy the result.
pub fn commit(
    tree: &SyntaxTree,
    pending: &PendingRefactoring,
    ctx: &RefactorContext<'_>,
    formatter: &dyn Formatter,
) -> Result<Committed, RefactorError> {
    let edit = pending.realize(ctx)?;
    let edited = edit.apply(tree)?;
    let annotation = FormatAnnotation {
        range: TextRange::at(edit.replaced_range.start(), edit.new_node.text_len()),
    };
    let tree = formatter.format(edited, annotation);
    Ok(Committed {
        tree,
        edit,
        annotation,
    })
}
