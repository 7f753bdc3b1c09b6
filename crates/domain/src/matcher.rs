//! Node matchers: pure, read-only searches over a UI tree.
//!
//! Every search is a depth-first pre-order walk; when several nodes match,
//! the first one in that order wins.

use crate::keyword::KeywordSet;
use crate::node::UiNode;

/// Return the first node (pre-order) satisfying `predicate`.
pub fn find_first<N, F>(root: &N, predicate: F) -> Option<N>
where
    N: UiNode,
    F: Fn(&N) -> bool,
{
    fn walk<N: UiNode>(node: &N, predicate: &dyn Fn(&N) -> bool) -> Option<N> {
        if predicate(node) {
            return Some(node.clone());
        }
        node.children()
            .iter()
            .find_map(|child| walk(child, predicate))
    }

    walk(root, &predicate)
}

/// Return the first node whose text contains `needle` (case-sensitive).
pub fn find_by_text<N: UiNode>(root: &N, needle: &str) -> Option<N> {
    find_first(root, |node| node.text().is_some_and(|text| text.contains(needle)))
}

/// Return the first node whose lower-cased text contains any lower-cased
/// keyword, testing keywords in list order at each node.
///
/// Always `None` for an empty keyword set.
pub fn find_matching_keyword<N: UiNode>(root: &N, keywords: &KeywordSet) -> Option<N> {
    if keywords.is_empty() {
        return None;
    }
    let lowered: Vec<String> = keywords.iter().map(str::to_lowercase).collect();
    find_first(root, |node| {
        let text = node.text().unwrap_or_default().to_lowercase();
        lowered.iter().any(|keyword| text.contains(keyword.as_str()))
    })
}

/// Collect every clickable node, in pre-order.
pub fn collect_clickable<N: UiNode>(root: &N) -> Vec<N> {
    fn walk<N: UiNode>(node: &N, out: &mut Vec<N>) {
        if node.is_clickable() {
            out.push(node.clone());
        }
        for child in node.children() {
            walk(&child, out);
        }
    }

    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

/// Whether [`find_by_text`] succeeds for at least one indicator.
pub fn any_indicator_present<N, S>(root: &N, indicators: &[S]) -> bool
where
    N: UiNode,
    S: AsRef<str>,
{
    indicators
        .iter()
        .any(|indicator| find_by_text(root, indicator.as_ref()).is_some())
}

/// Whether the node's lower-cased accessible description contains any of
/// the lower-cased `markers`.
pub fn description_contains_any<N, S>(node: &N, markers: &[S]) -> bool
where
    N: UiNode,
    S: AsRef<str>,
{
    let Some(description) = node.description() else {
        return false;
    };
    let description = description.to_lowercase();
    markers
        .iter()
        .any(|marker| description.contains(&marker.as_ref().to_lowercase()))
}

/// Among visible `candidates` of class `class_name`, return the one with the
/// highest [`top_right_score`](crate::node::Bounds::top_right_score).
/// Candidates with empty bounds are skipped. Ties resolve to the earliest
/// candidate.
pub fn best_top_right_of_class<'c, N: UiNode>(candidates: &'c [N], class_name: &str) -> Option<&'c N> {
    let mut best: Option<(&N, i64)> = None;
    for node in candidates {
        let bounds = node.bounds();
        if node.class_name() != Some(class_name) || bounds.is_empty() {
            continue;
        }
        let score = bounds.top_right_score();
        if best.is_none_or(|(_, max)| score > max) {
            best = Some((node, score));
        }
    }
    best.map(|(node, _)| node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::fixture::{Spec, Tree};

    const ICON: &str = "android.widget.ImageView";

    fn group_list() -> Tree {
        Tree::build(
            Spec::new()
                .text("Servers")
                .child(
                    Spec::new()
                        .clickable()
                        .child(Spec::new().text("Cooking Club"))
                        .child(Spec::new().text("Foo Group Chat")),
                )
                .child(Spec::new().clickable().child(Spec::new().text("foo group archive"))),
        )
    }

    fn texts<N: UiNode>(nodes: &[N]) -> Vec<Option<String>> {
        nodes.iter().map(|n| n.text().map(str::to_string)).collect()
    }

    #[test]
    fn should_find_first_preorder_text_match() {
        let tree = group_list();
        let found = find_by_text(&tree.root(), "Foo").unwrap();
        assert_eq!(found.text(), Some("Foo Group Chat"));
    }

    #[test]
    fn should_match_text_case_sensitively() {
        let tree = group_list();
        let found = find_by_text(&tree.root(), "foo").unwrap();
        assert_eq!(found.text(), Some("foo group archive"));
        assert!(find_by_text(&tree.root(), "FOO").is_none());
    }

    #[test]
    fn should_match_root_itself() {
        let tree = group_list();
        let found = find_by_text(&tree.root(), "Servers").unwrap();
        assert_eq!(found.index, 0);
    }

    #[test]
    fn should_match_keyword_case_insensitively() {
        let tree = group_list();
        let keywords = KeywordSet::parse("FOO GROUP");
        let found = find_matching_keyword(&tree.root(), &keywords).unwrap();
        assert_eq!(found.text(), Some("Foo Group Chat"));
    }

    #[test]
    fn should_return_first_node_in_traversal_order_not_first_keyword() {
        let tree = group_list();
        let keywords = KeywordSet::parse("archive, cooking");
        let found = find_matching_keyword(&tree.root(), &keywords).unwrap();
        assert_eq!(found.text(), Some("Cooking Club"));
    }

    #[test]
    fn should_return_none_for_empty_keywords() {
        let tree = group_list();
        assert!(find_matching_keyword(&tree.root(), &KeywordSet::parse(" , ")).is_none());
    }

    #[test]
    fn should_return_none_when_no_keyword_matches() {
        let tree = group_list();
        let keywords = KeywordSet::parse("Gardening");
        assert!(find_matching_keyword(&tree.root(), &keywords).is_none());
    }

    #[test]
    fn should_skip_nodes_without_text_when_matching_keywords() {
        let tree = Tree::build(Spec::new().child(Spec::new().description("Foo Group")));
        let keywords = KeywordSet::parse("foo");
        assert!(find_matching_keyword(&tree.root(), &keywords).is_none());
    }

    #[test]
    fn should_collect_clickable_in_preorder() {
        let tree = Tree::build(
            Spec::new()
                .clickable()
                .text("a")
                .child(Spec::new().text("b").child(Spec::new().clickable().text("c")))
                .child(Spec::new().clickable().text("d")),
        );
        let clickable = collect_clickable(&tree.root());
        assert_eq!(
            texts(&clickable),
            vec![Some("a".into()), Some("c".into()), Some("d".into())]
        );
    }

    #[test]
    fn should_detect_any_indicator() {
        let tree = Tree::build(Spec::new().child(Spec::new().text("12 Members")));
        assert!(any_indicator_present(&tree.root(), &["Pinned", "Members"]));
        assert!(!any_indicator_present(&tree.root(), &["Pinned", "Media"]));
        assert!(!any_indicator_present::<_, &str>(&tree.root(), &[]));
    }

    #[test]
    fn should_match_description_markers_ignoring_case() {
        let tree = Tree::build(Spec::new().description("More Options"));
        let root = tree.root();
        assert!(description_contains_any(&root, &["その他", "more"]));
        assert!(!description_contains_any(&root, &["menu"]));
    }

    #[test]
    fn should_not_match_markers_without_description() {
        let tree = Tree::build(Spec::new().text("more"));
        assert!(!description_contains_any(&tree.root(), &["more"]));
    }

    #[test]
    fn should_pick_highest_top_right_score_of_class() {
        let tree = Tree::build(
            Spec::new()
                .child(Spec::new().clickable().class_name(ICON).text("back").bounds(0, 40, 100, 120))
                .child(Spec::new().clickable().class_name(ICON).text("overflow").bounds(950, 40, 1050, 120))
                .child(Spec::new().clickable().class_name("android.widget.Button").text("wide").bounds(0, 0, 1080, 60))
                .child(Spec::new().clickable().class_name(ICON).text("low").bounds(950, 1800, 1050, 1900)),
        );
        let candidates = collect_clickable(&tree.root());
        let best = best_top_right_of_class(&candidates, ICON).unwrap();
        assert_eq!(best.text(), Some("overflow"));
    }

    #[test]
    fn should_resolve_score_ties_to_first_candidate() {
        let tree = Tree::build(
            Spec::new()
                .child(Spec::new().clickable().class_name(ICON).text("first").bounds(900, 100, 1000, 150))
                .child(Spec::new().clickable().class_name(ICON).text("second").bounds(950, 200, 1050, 250)),
        );
        // 2*1000-100 == 2*1050-200
        let candidates = collect_clickable(&tree.root());
        let best = best_top_right_of_class(&candidates, ICON).unwrap();
        assert_eq!(best.text(), Some("first"));
    }

    #[test]
    fn should_skip_icons_with_empty_bounds() {
        let tree = Tree::build(
            Spec::new()
                .child(Spec::new().clickable().class_name(ICON).text("collapsed").bounds(1080, 0, 1080, 0))
                .child(Spec::new().clickable().class_name(ICON).text("unplaced"))
                .child(Spec::new().clickable().class_name(ICON).text("overflow").bounds(960, 40, 1060, 120)),
        );
        let candidates = collect_clickable(&tree.root());
        let best = best_top_right_of_class(&candidates, ICON).unwrap();
        assert_eq!(best.text(), Some("overflow"));
    }

    #[test]
    fn should_return_none_when_only_empty_icons_exist() {
        let tree = Tree::build(Spec::new().clickable().class_name(ICON));
        let candidates = collect_clickable(&tree.root());
        assert!(best_top_right_of_class(&candidates, ICON).is_none());
    }

    #[test]
    fn should_return_none_when_no_candidate_has_class() {
        let tree = Tree::build(Spec::new().clickable().class_name("android.widget.Button"));
        let candidates = collect_clickable(&tree.root());
        assert!(best_top_right_of_class(&candidates, ICON).is_none());
    }
}
