//! Tree source port: tick-scoped snapshots of the host UI tree.
//!
//! A [`Snapshot`] is an owned value; the nodes it hands out borrow it. The
//! step machine drops the snapshot before a tick returns, which releases
//! every node handle on every return path. Implementations that must return
//! handles to the host do so in `Drop`.

use autoleave_domain::error::AutomationError;
use autoleave_domain::node::UiNode;

/// The foreground UI tree as captured for one tick.
pub trait Snapshot: Send + Sync {
    /// Node handle type, bound to the lifetime of the snapshot.
    type Node<'a>: UiNode
    where
        Self: 'a;

    /// Package identifier of the application owning the foreground surface.
    fn package_name(&self) -> Option<&str>;

    /// Root of the captured tree.
    fn root(&self) -> Self::Node<'_>;
}

/// Host primitive producing snapshots of the foreground surface.
pub trait TreeSource: Send + Sync {
    type Snapshot: Snapshot;

    /// Capture the current foreground tree.
    ///
    /// Returns `Ok(None)` when there is no foreground surface or it belongs
    /// to a context the host does not expose.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Host`] when the host primitive fails.
    fn snapshot(&self) -> Result<Option<Self::Snapshot>, AutomationError>;
}
