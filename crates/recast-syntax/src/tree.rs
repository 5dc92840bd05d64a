use std::ptr;

use rowan::{GreenNode, GreenNodeData, NodeOrToken};
use text_size::{TextRange, TextSize};
use thiserror::Error;

use crate::parser::{debug_dump, SyntaxNode};
use crate::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("offset {offset:?} lies outside the syntax tree")]
    NotFound { offset: TextSize },
    #[error("node {range:?} does not belong to this syntax tree")]
    NodeNotFound { range: TextRange },
}

/// An immutable syntax tree.
///
/// The tree only owns its green root. Red [`SyntaxNode`]s are materialized on demand
/// by [`SyntaxTree::root`], which keeps the tree itself `Send + Sync` and cheap to
/// clone. Edits never mutate a tree; [`SyntaxTree::replace`] returns a new one that
/// shares every untouched green subtree with its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    green: GreenNode,
}

impl SyntaxTree {
    pub fn new(green: GreenNode) -> Self {
        Self { green }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn text(&self) -> String {
        self.root().to_string()
    }

    pub fn text_len(&self) -> TextSize {
        self.green.text_len()
    }

    /// Innermost node whose range contains `offset`.
    ///
    /// Ranges are treated as half-open, so at the boundary between two siblings the
    /// one starting at `offset` wins. The end-of-file offset belongs to the root.
    pub fn find_node_at(&self, offset: TextSize) -> Result<SyntaxNode, TreeError> {
        if offset > self.text_len() {
            return Err(TreeError::NotFound { offset });
        }

        let mut node = self.root();
        loop {
            let child = node
                .children_with_tokens()
                .find(|child| child.text_range().contains(offset));
            match child {
                Some(NodeOrToken::Node(child)) => node = child,
                Some(NodeOrToken::Token(_)) | None => return Ok(node),
            }
        }
    }

    /// Smallest node covering the whole of `range`.
    pub fn covering_node(&self, range: TextRange) -> Result<SyntaxNode, TreeError> {
        if range.end() > self.text_len() {
            return Err(TreeError::NotFound {
                offset: range.end(),
            });
        }
        let node = match self.root().covering_element(range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token
                .parent()
                .ok_or(TreeError::NotFound {
                    offset: range.start(),
                })?,
        };
        Ok(node)
    }

    /// Whether `node` was materialized from this exact tree version.
    pub fn contains(&self, node: &SyntaxNode) -> bool {
        let root = node.ancestors().last().unwrap_or_else(|| node.clone());
        let root_green = root.green();
        ptr::eq::<GreenNodeData>(&*root_green, &*self.green)
    }

    /// Substitute `target` with `replacement`, rebuilding only its ancestors.
    pub fn replace(
        &self,
        target: &SyntaxNode,
        replacement: GreenNode,
    ) -> Result<SyntaxTree, TreeError> {
        if !self.contains(target) {
            return Err(TreeError::NodeNotFound {
                range: target.text_range(),
            });
        }

        let green = match target.parent() {
            None => replacement,
            Some(parent) => {
                let new_parent = parent
                    .green()
                    .replace_child(target.index(), replacement.into());
                parent.replace_with(new_parent)
            }
        };
        Ok(SyntaxTree::new(green))
    }

    pub fn debug_dump(&self) -> String {
        debug_dump(&self.root())
    }
}

/// A node pinned to one tree version without holding red pointers.
///
/// Handles are `Send + Sync`, so a node found by one thread can be carried to
/// another and resolved there. Resolving against any other tree version fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    root: GreenNode,
    path: Vec<usize>,
    range: TextRange,
    green: GreenNode,
}

impl NodeHandle {
    pub fn new(node: &SyntaxNode) -> Self {
        let mut path: Vec<usize> = node
            .ancestors()
            .take_while(|n| n.parent().is_some())
            .map(|n| n.index())
            .collect();
        path.reverse();
        let root = node.ancestors().last().unwrap_or_else(|| node.clone());
        Self {
            root: root.green().into_owned(),
            path,
            range: node.text_range(),
            green: node.green().into_owned(),
        }
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn kind(&self) -> SyntaxKind {
        SyntaxNode::new_root(self.green.clone()).kind()
    }

    /// The node's own subtree, shared with the tree it came from.
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn resolve(&self, tree: &SyntaxTree) -> Result<SyntaxNode, TreeError> {
        let stale = TreeError::NodeNotFound { range: self.range };
        if !ptr::eq::<GreenNodeData>(&*self.root, &**tree.green()) {
            return Err(stale);
        }
        let mut node = tree.root();
        for &idx in &self.path {
            node = node
                .children_with_tokens()
                .nth(idx)
                .and_then(|el| el.into_node())
                .ok_or(stale)?;
        }
        Ok(node)
    }
}

pub fn parent_of(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.parent()
}

pub fn grandparent_of(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.parent()?.parent()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{parse, SyntaxKind};

    fn tree(text: &str) -> SyntaxTree {
        parse(text).tree
    }

    fn offset_of(text: &str, needle: &str) -> TextSize {
        TextSize::from(text.find(needle).unwrap() as u32)
    }

    #[test]
    fn find_node_at_returns_innermost_node() {
        let text = "class C { void M() { Action<int> a = Foo; } }";
        let tree = tree(text);
        let node = tree.find_node_at(offset_of(text, "Foo")).unwrap();
        assert_eq!(node.kind(), SyntaxKind::IdentifierName);
        assert_eq!(node.to_string(), "Foo");

        let parent = parent_of(&node).unwrap();
        assert_eq!(parent.kind(), SyntaxKind::EqualsValueClause);
        assert_eq!(
            grandparent_of(&node).map(|n| n.kind()),
            Some(SyntaxKind::VariableDeclarator)
        );
    }

    #[test]
    fn find_node_at_prefers_element_starting_at_offset() {
        let text = "class C { void M() { F(a.B); } }";
        let tree = tree(text);
        // `.` starts where `a` ends.
        let node = tree.find_node_at(offset_of(text, ".B")).unwrap();
        assert_eq!(node.kind(), SyntaxKind::MemberAccessExpression);

        let node = tree.find_node_at(offset_of(text, "B)")).unwrap();
        assert_eq!(node.kind(), SyntaxKind::IdentifierName);
        assert_eq!(node.to_string(), "B");
    }

    #[test]
    fn find_node_at_end_of_file_and_beyond() {
        let text = "class C { }";
        let tree = tree(text);
        let eof = TextSize::of(text);
        assert_eq!(
            tree.find_node_at(eof).unwrap().kind(),
            SyntaxKind::CompilationUnit
        );
        assert_eq!(
            tree.find_node_at(eof + TextSize::from(1)),
            Err(TreeError::NotFound {
                offset: eof + TextSize::from(1)
            })
        );
    }

    #[test]
    fn covering_node_spans_the_range() {
        let text = "class C { void M() { x = a + b; } }";
        let tree = tree(text);
        let start = offset_of(text, "a + b");
        let range = TextRange::at(start, TextSize::of("a + b"));
        let node = tree.covering_node(range).unwrap();
        assert_eq!(node.kind(), SyntaxKind::BinaryExpression);
    }

    #[test]
    fn replace_shares_untouched_subtrees() {
        let text = "class A { void M() { F(x); } }\nclass B { void N() { } }";
        let tree = tree(text);
        let target = tree.find_node_at(offset_of(text, "x)")).unwrap();
        let replacement = crate::make::identifier_name("y");

        let new_tree = tree.replace(&target, replacement).unwrap();
        assert_eq!(
            new_tree.text(),
            "class A { void M() { F(y); } }\nclass B { void N() { } }"
        );
        assert_eq!(tree.text(), text, "the old tree is unchanged");

        let old_b = tree.root().children().nth(1).unwrap();
        let new_b = new_tree.root().children().nth(1).unwrap();
        assert!(ptr::eq::<GreenNodeData>(&*old_b.green(), &*new_b.green()));
    }

    #[test]
    fn replace_rejects_nodes_from_other_tree_versions() {
        let text = "class C { void M() { F(x); } }";
        let tree = tree(text);
        let target = tree.find_node_at(offset_of(text, "x)")).unwrap();
        let new_tree = tree
            .replace(&target, crate::make::identifier_name("y"))
            .unwrap();

        let stale = new_tree.replace(&target, crate::make::identifier_name("z"));
        assert!(matches!(stale, Err(TreeError::NodeNotFound { .. })));

        // A re-parse of identical text is a different tree, too.
        let other = self::tree(text);
        assert!(!other.contains(&target));
    }

    #[test]
    fn replace_may_change_node_kind() {
        let text = "class C { void M() { F(x); } }";
        let tree = tree(text);
        let target = tree.find_node_at(offset_of(text, "x)")).unwrap();
        let call = crate::make::invocation(
            crate::make::identifier_name("G"),
            crate::make::argument_list(Vec::new()),
        );
        let new_tree = tree.replace(&target, call).unwrap();
        assert_eq!(new_tree.text(), "class C { void M() { F(G()); } }");
    }

    #[test]
    fn trees_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyntaxTree>();
        assert_send_sync::<NodeHandle>();
    }

    #[test]
    fn node_handles_resolve_only_in_their_tree() {
        let text = "class C { void M() { F(a.B); } }";
        let tree = tree(text);
        let node = tree.find_node_at(offset_of(text, "a.B")).unwrap();
        let access = node.parent().unwrap();
        let handle = NodeHandle::new(&access);
        assert_eq!(handle.kind(), SyntaxKind::MemberAccessExpression);
        assert_eq!(handle.range(), access.text_range());

        let resolved = std::thread::scope(|s| {
            s.spawn(|| handle.resolve(&tree).map(|n| n.text_range()))
                .join()
                .unwrap()
        });
        assert_eq!(resolved, Ok(access.text_range()));

        let edited = tree
            .replace(&node, crate::make::identifier_name("b"))
            .unwrap();
        assert_eq!(
            handle.resolve(&edited),
            Err(TreeError::NodeNotFound {
                range: access.text_range()
            })
        );
    }
}
