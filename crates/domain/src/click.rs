//! Click dispatch: direct clicks and nearest-clickable-ancestor escalation.

use crate::node::UiNode;

/// Walk from `node` (inclusive) up through its parents and return the first
/// node satisfying `predicate`.
///
/// Independent of the node backend: anything implementing [`UiNode`] can
/// share it.
pub fn find_ancestor_or_self<N, F>(node: &N, predicate: F) -> Option<N>
where
    N: UiNode,
    F: Fn(&N) -> bool,
{
    std::iter::successors(Some(node.clone()), N::parent).find(|candidate| predicate(candidate))
}

/// Click the nearest clickable ancestor of `node`, `node` itself included.
///
/// Returns `false` when no node on the path to the root is clickable or
/// when the host rejects the click.
pub fn escalate_click<N: UiNode>(node: &N) -> bool {
    find_ancestor_or_self(node, N::is_clickable).is_some_and(|target| target.perform_click())
}

/// Click exactly `node`, without escalation.
pub fn direct_click<N: UiNode>(node: &N) -> bool {
    node.perform_click()
}
