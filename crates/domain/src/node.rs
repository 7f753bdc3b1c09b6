//! UI node abstraction over an externally owned accessibility tree.
//!
//! A [`UiNode`] is a cheap handle into a tree snapshot owned by the host.
//! Handles borrow the snapshot they came from, so they cannot outlive the
//! poll tick that produced them.

use serde::{Deserialize, Serialize};

/// On-screen rectangle of a node, in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the rectangle covers no pixels (off-screen or collapsed).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Score favouring controls in the top-right corner: `2×right − top`.
    ///
    /// Used to pick an unlabeled overflow icon among same-class candidates.
    #[must_use]
    pub fn top_right_score(&self) -> i64 {
        2 * i64::from(self.right) - i64::from(self.top)
    }
}

/// Read-only view of one node in a host UI tree, plus the host's click
/// primitive for that node.
///
/// Implementations are handles: cloning one must be cheap and must not
/// copy the underlying subtree.
pub trait UiNode: Clone {
    /// Visible text, if any.
    fn text(&self) -> Option<&str>;

    /// Accessible (content) description, if any.
    fn description(&self) -> Option<&str>;

    /// Widget class identifier (e.g. `android.widget.ImageView`).
    fn class_name(&self) -> Option<&str>;

    /// On-screen bounds.
    fn bounds(&self) -> Bounds;

    /// Whether the host reports the node as clickable.
    fn is_clickable(&self) -> bool;

    /// Whether the host reports the node as enabled.
    fn is_enabled(&self) -> bool;

    /// Parent node, `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// Children in host order.
    fn children(&self) -> Vec<Self>;

    /// Ask the host to click exactly this node. Returns whether the host
    /// accepted the action.
    fn perform_click(&self) -> bool;
}
