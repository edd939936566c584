//! Depth-first traversal helpers over tree-sitter syntax trees.
//!
//! Both walkers visit nodes in pre-order, children left to right, using an
//! explicit stack so that deeply nested sources cannot overflow the call stack.

use crate::span::SourceLines;
use tree_sitter::Node;

/// Returns the direct children of `node`, in order.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Returns the first direct child whose kind is one of `kinds`.
pub fn child_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    children(node)
        .into_iter()
        .find(|child| kinds.contains(&child.kind()))
}

/// Collects the leaves of `node` in document order.
///
/// Nodes whose kind is listed in `atomic_kinds` (string literals, typically) are
/// treated as leaves even though the grammar gives them children.
pub fn collect_leaf_tokens<'t>(node: Node<'t>, atomic_kinds: &[&str]) -> Vec<Node<'t>> {
    let mut leaves = Vec::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if atomic_kinds.contains(&current.kind()) || current.child_count() == 0 {
            leaves.push(current);
            continue;
        }
        let mut kids = children(current);
        kids.reverse();
        stack.extend(kids);
    }

    leaves
}

/// Collects every named node under (and including) `node` whose kind is in `kinds`.
///
/// Matching a node does not stop the descent, so nested matches are reported too.
/// Anonymous tokens are never reported: Ruby's `class` keyword shares its kind
/// with the `class` node it opens.
pub fn collect_by_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if current.is_named() && kinds.contains(&current.kind()) {
            found.push(current);
        }
        let mut kids = children(current);
        kids.reverse();
        stack.extend(kids);
    }

    found
}

/// Tokenizes the code under `node` into the text of its leaves.
///
/// Leaves listed in `exclude` (compared by node identity) are dropped.
pub fn tokenize_code(
    node: Node<'_>,
    lines: &SourceLines<'_>,
    atomic_kinds: &[&str],
    exclude: &[Node<'_>],
) -> Vec<String> {
    collect_leaf_tokens(node, atomic_kinds)
        .into_iter()
        .filter(|leaf| !exclude.iter().any(|skip| skip.id() == leaf.id()))
        .map(|leaf| lines.node_text(&leaf))
        .collect()
}
