//! Keyword store port: the persisted list of groups to leave.

use std::future::Future;

use autoleave_domain::error::AutomationError;
use autoleave_domain::keyword::KeywordSet;

/// Read access to the configured keywords.
///
/// The step machine calls [`load_keywords`](Self::load_keywords) on every
/// detection tick, so edits take effect without a restart and
/// implementations must not cache.
pub trait KeywordStore: Send + Sync {
    /// Load the current keyword set.
    fn load_keywords(&self) -> impl Future<Output = Result<KeywordSet, AutomationError>> + Send;
}
