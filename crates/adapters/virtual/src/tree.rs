//! Declarative node specs and the immutable arena trees built from them.

use serde::{Deserialize, Serialize};

use autoleave_domain::node::Bounds;

/// Declarative description of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub text: Option<String>,
    pub description: Option<String>,
    pub class_name: Option<String>,
    pub bounds: Bounds,
    pub clickable: bool,
    pub enabled: bool,
    /// Screen shown after a successful click on this node.
    pub navigates_to: Option<usize>,
    pub children: Vec<NodeSpec>,
}

impl Default for NodeSpec {
    fn default() -> Self {
        Self {
            text: None,
            description: None,
            class_name: None,
            bounds: Bounds::default(),
            clickable: false,
            enabled: true,
            navigates_to: None,
            children: Vec::new(),
        }
    }
}

impl NodeSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A node carrying only `text`.
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn bounds(mut self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        self.bounds = Bounds::new(left, top, right, bottom);
        self
    }

    #[must_use]
    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[must_use]
    pub fn navigates_to(mut self, screen: usize) -> Self {
        self.navigates_to = Some(screen);
        self
    }

    #[must_use]
    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    fn navigation_targets(&self, out: &mut Vec<usize>) {
        out.extend(self.navigates_to);
        for child in &self.children {
            child.navigation_targets(out);
        }
    }
}

/// One screen of a script: the foreground package and its tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSpec {
    pub package: String,
    pub root: NodeSpec,
}

impl ScreenSpec {
    #[must_use]
    pub fn new(package: impl Into<String>, root: NodeSpec) -> Self {
        Self {
            package: package.into(),
            root,
        }
    }

    /// Every `navigates_to` target declared anywhere on this screen.
    #[must_use]
    pub fn navigation_targets(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.root.navigation_targets(&mut out);
        out
    }
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) text: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) class_name: Option<String>,
    pub(crate) bounds: Bounds,
    pub(crate) clickable: bool,
    pub(crate) enabled: bool,
    pub(crate) navigates_to: Option<usize>,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

/// Immutable arena built from a [`ScreenSpec`]. Index 0 is the root.
#[derive(Debug)]
pub struct VirtualTree {
    package: String,
    nodes: Vec<NodeData>,
}

impl VirtualTree {
    #[must_use]
    pub fn build(screen: &ScreenSpec) -> Self {
        let mut tree = Self {
            package: screen.package.clone(),
            nodes: Vec::new(),
        };
        tree.insert(&screen.root, None);
        tree
    }

    fn insert(&mut self, spec: &NodeSpec, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            text: spec.text.clone(),
            description: spec.description.clone(),
            class_name: spec.class_name.clone(),
            bounds: spec.bounds,
            clickable: spec.clickable,
            enabled: spec.enabled,
            navigates_to: spec.navigates_to,
            parent,
            children: Vec::with_capacity(spec.children.len()),
        });
        for child in &spec.children {
            let child_index = self.insert(child, Some(index));
            self.nodes[index].children.push(child_index);
        }
        index
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, index: usize) -> &NodeData {
        &self.nodes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScreenSpec {
        ScreenSpec::new(
            "com.example",
            NodeSpec::new()
                .child(NodeSpec::label("a").child(NodeSpec::label("b").navigates_to(2)))
                .child(NodeSpec::label("c").clickable().navigates_to(1)),
        )
    }

    #[test]
    fn should_build_arena_in_preorder() {
        let tree = VirtualTree::build(&sample());
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node(1).text.as_deref(), Some("a"));
        assert_eq!(tree.node(2).text.as_deref(), Some("b"));
        assert_eq!(tree.node(3).text.as_deref(), Some("c"));
        assert_eq!(tree.node(0).children, vec![1, 3]);
        assert_eq!(tree.node(2).parent, Some(1));
    }

    #[test]
    fn should_list_navigation_targets() {
        assert_eq!(sample().navigation_targets(), vec![2, 1]);
    }

    #[test]
    fn should_default_nodes_to_enabled() {
        assert!(NodeSpec::new().enabled);
        assert!(!NodeSpec::new().disabled().enabled);
    }

    #[test]
    fn should_deserialize_sparse_json_with_defaults() {
        let json = r#"{
            "package": "com.example",
            "root": {
                "children": [
                    { "text": "Yes", "clickable": true, "navigates_to": 0 },
                    { "class_name": "android.widget.ImageView",
                      "bounds": { "left": 0, "top": 0, "right": 10, "bottom": 10 } }
                ]
            }
        }"#;
        let screen: ScreenSpec = serde_json::from_str(json).unwrap();
        let yes = &screen.root.children[0];
        assert_eq!(yes.text.as_deref(), Some("Yes"));
        assert!(yes.clickable);
        assert!(yes.enabled);
        assert_eq!(yes.navigates_to, Some(0));
        assert_eq!(screen.root.children[1].bounds, Bounds::new(0, 0, 10, 10));
    }
}
