//! Convert a method group (or any delegate-typed expression) into an equivalent
//! anonymous method: `Action<int> a = Foo;` becomes
//! `Action<int> a = delegate(int obj) { Foo(obj); };`.

use recast_syntax::ast::{AstNode, IdentifierName};
use recast_syntax::{GreenNode, NodeHandle, SyntaxNode, TextRange};

use crate::builder::build_anonymous_method;
use crate::rule::{MatchData, RefactoringRule, RuleId, RuleMatch};
use crate::{RefactorContext, RefactorError, WorkspaceKind};

pub const METHOD_GROUP_TO_ANONYMOUS_METHOD: &str = "method-group-to-anonymous-method";

#[derive(Debug, Clone, Copy, Default)]
pub struct MethodGroupToAnonymousMethod;

fn reject(reason: &'static str, node: &SyntaxNode) -> Option<RuleMatch> {
    tracing::trace!(
        target = "recast.refactor",
        rule = METHOD_GROUP_TO_ANONYMOUS_METHOD,
        reason,
        range = ?node.text_range(),
        "not applicable"
    );
    None
}

/// The identifier at `node`, or the reason it is not a candidate.
///
/// The value-position check runs last and goes beyond the event gate: it also
/// keeps the rule off type names and assignment targets, which never denote a
/// method group even when they resolve to a delegate type.
fn value_read_name(node: &SyntaxNode) -> Result<IdentifierName, &'static str> {
    let Some(name) = IdentifierName::cast(node.clone()) else {
        return Err("not an identifier name");
    };
    if name.in_event_declaration() {
        return Err("event declaration");
    }
    if name.is_type_syntax() || name.is_assignment_target() {
        return Err("not a value read");
    }
    Ok(name)
}

impl RefactoringRule for MethodGroupToAnonymousMethod {
    fn id(&self) -> RuleId {
        RuleId::new(METHOD_GROUP_TO_ANONYMOUS_METHOD)
    }

    fn default_title(&self) -> &'static str {
        "To anonymous method"
    }

    /// Gates run in order: empty selection, project workspace, hand-written
    /// code, identifier name, outside an event declaration. After those comes
    /// an extra value-position gate (`is_type_syntax() || is_assignment_target()`)
    /// and only then is the type resolved.
    fn probe(
        &self,
        ctx: &RefactorContext<'_>,
        node: &SyntaxNode,
        selection: TextRange,
    ) -> Option<RuleMatch> {
        if !selection.is_empty() {
            return reject("selection is not empty", node);
        }
        if ctx.workspace_kind == WorkspaceKind::Miscellaneous {
            return reject("miscellaneous workspace", node);
        }
        if ctx.is_generated_code {
            return reject("generated code", node);
        }
        let name = match value_read_name(node) {
            Ok(name) => name,
            Err(reason) => return reject(reason, node),
        };

        let target = name
            .member_access_parent()
            .unwrap_or_else(|| name.syntax().clone());

        if ctx.is_cancelled() {
            return reject("cancelled", &target);
        }
        let Some(ty) = ctx.resolver.type_of(&target) else {
            return reject("type unavailable", &target);
        };
        let Some(signature) = ctx.resolver.callable_signature_of(&ty) else {
            return reject("type is not callable", &target);
        };

        tracing::debug!(
            target = "recast.refactor",
            rule = METHOD_GROUP_TO_ANONYMOUS_METHOD,
            ty = %ty,
            parameters = signature.parameters.len(),
            range = ?target.text_range(),
            "applicable"
        );
        Some(RuleMatch {
            target: NodeHandle::new(&target),
            data: MatchData::Callable(signature),
        })
    }

    fn build(
        &self,
        ctx: &RefactorContext<'_>,
        matched: &RuleMatch,
    ) -> Result<GreenNode, RefactorError> {
        match &matched.data {
            MatchData::Callable(signature) => {
                build_anonymous_method(signature, &matched.target, ctx.resolver)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use recast_syntax::{parse, TextSize};

    use super::*;

    fn node_at(text: &str, needle: &str) -> SyntaxNode {
        let offset = text.find(needle).unwrap();
        parse(text)
            .tree
            .find_node_at(TextSize::from(offset as u32))
            .unwrap()
    }

    #[test]
    fn event_type_names_stop_at_the_event_gate() {
        let text = "class C { event Handler E; }";
        assert_eq!(
            value_read_name(&node_at(text, "Handler")).err(),
            Some("event declaration")
        );

        let text = "class C { event System.Handler E { add { } remove { } } }";
        assert_eq!(
            value_read_name(&node_at(text, "Handler E")).err(),
            Some("event declaration")
        );
    }

    #[test]
    fn other_type_names_stop_at_the_value_position_gate() {
        let text = "class C { Handler h; }";
        assert_eq!(
            value_read_name(&node_at(text, "Handler")).err(),
            Some("not a value read")
        );

        let text = "class C { void M() { h = Foo; } }";
        assert_eq!(
            value_read_name(&node_at(text, "h =")).err(),
            Some("not a value read")
        );
    }

    #[test]
    fn method_group_reads_pass() {
        let text = "class C { void M() { h = Foo; } }";
        let name = value_read_name(&node_at(text, "Foo")).unwrap();
        assert_eq!(name.syntax().text().to_string(), "Foo");
    }
}
