//! Step machine: drives the leave-group cycle one tick at a time.
//!
//! Each tick captures a fresh snapshot, re-checks that the target
//! application is in the foreground, and attempts the action of the
//! current [`Step`]. A missing node or a rejected click never fails the
//! tick: the step is simply retried on the next eligible tick.

use std::time::Instant;

use autoleave_domain::click::{direct_click, escalate_click};
use autoleave_domain::error::AutomationError;
use autoleave_domain::keyword::KeywordSet;
use autoleave_domain::matcher::{
    any_indicator_present, best_top_right_of_class, collect_clickable, description_contains_any,
    find_by_text, find_matching_keyword,
};
use autoleave_domain::node::UiNode;
use autoleave_domain::profile::TargetProfile;
use autoleave_domain::state::AutomationState;
use autoleave_domain::step::Step;
use autoleave_domain::time::has_elapsed;

use crate::ports::{KeywordStore, Snapshot, TreeSource};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The host had no foreground surface to snapshot.
    NoSurface,
    /// The foreground surface belongs to another application.
    ForeignApp,
    /// The debounce window after the last transition has not elapsed.
    Debouncing,
    /// A matching group was seen for the first time; no click yet.
    GroupDetected,
    /// A matching group is still settling; no click yet.
    Settling,
    /// The step was attempted but could not complete this tick.
    Held,
    /// The step completed and the machine moved on.
    Advanced { from: Step, to: Step },
}

/// Orchestrates snapshot → match → click → state mutation.
pub struct StepMachine<TS, KS> {
    tree_source: TS,
    keyword_store: KS,
    profile: TargetProfile,
}

impl<TS, KS> StepMachine<TS, KS>
where
    TS: TreeSource,
    KS: KeywordStore,
{
    /// Create a new machine for the given target profile.
    pub fn new(tree_source: TS, keyword_store: KS, profile: TargetProfile) -> Self {
        Self {
            tree_source,
            keyword_store,
            profile,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    #[must_use]
    pub fn tree_source(&self) -> &TS {
        &self.tree_source
    }

    #[must_use]
    pub fn keyword_store(&self) -> &KS {
        &self.keyword_store
    }

    /// Run one tick against `state` at monotonic time `now`.
    ///
    /// The snapshot, and with it every node handle, is released before
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the host snapshot or the keyword store fails.
    /// `state` is not modified in that case.
    pub async fn tick(
        &self,
        state: &mut AutomationState,
        now: Instant,
    ) -> Result<TickOutcome, AutomationError> {
        let Some(snapshot) = self.tree_source.snapshot()? else {
            tracing::trace!("no foreground surface");
            return Ok(TickOutcome::NoSurface);
        };

        if snapshot.package_name() != Some(self.profile.package.as_str()) {
            tracing::trace!(package = ?snapshot.package_name(), "foreground is not the target");
            return Ok(TickOutcome::ForeignApp);
        }

        let outcome = match state.step {
            Step::Detect => {
                let keywords = self.keyword_store.load_keywords().await?;
                tracing::debug!(%keywords, "loaded keywords");
                self.detect(&snapshot, &keywords, state, now)
            }
            Step::Complete => {
                state.clear_detection();
                advance(state, now)
            }
            step if !has_elapsed(now, state.last_step_time, self.profile.step_delay()) => {
                tracing::trace!(%step, "debouncing");
                TickOutcome::Debouncing
            }
            Step::OpenDetail => self.open_detail(&snapshot, state, now),
            Step::OpenMenu => self.open_menu(&snapshot, state, now),
            Step::Leave => self.leave(&snapshot, state, now),
            Step::Confirm => self.confirm(&snapshot, state, now),
        };

        drop(snapshot);
        Ok(outcome)
    }

    /// Step 0: find a group matching a keyword, let it settle, then open it.
    fn detect<S: Snapshot>(
        &self,
        snapshot: &S,
        keywords: &KeywordSet,
        state: &mut AutomationState,
        now: Instant,
    ) -> TickOutcome {
        let root = snapshot.root();
        let Some(group) = find_matching_keyword(&root, keywords) else {
            if state.group_detected_time.take().is_some() {
                tracing::debug!(step = %Step::Detect, "matching group vanished, detection reset");
            }
            return TickOutcome::Held;
        };

        let Some(detected_at) = state.group_detected_time else {
            tracing::info!(
                group = group.text().unwrap_or_default(),
                "matching group detected, waiting for list to settle"
            );
            state.group_detected_time = Some(now);
            return TickOutcome::GroupDetected;
        };

        if !has_elapsed(now, Some(detected_at), self.profile.group_click_delay()) {
            return TickOutcome::Settling;
        }

        if escalate_click(&group) {
            state.clear_detection();
            advance(state, now)
        } else {
            tracing::debug!(step = %Step::Detect, "click on matching group failed");
            TickOutcome::Held
        }
    }

    /// Step 1: best-effort click on the group header, then wait for the
    /// detail screen.
    fn open_detail<S: Snapshot>(
        &self,
        snapshot: &S,
        state: &mut AutomationState,
        now: Instant,
    ) -> TickOutcome {
        let root = snapshot.root();
        let header = self
            .profile
            .group_link_markers
            .iter()
            .find_map(|marker| find_by_text(&root, marker));

        match header {
            Some(header) if !escalate_click(&header) => {
                tracing::debug!(step = %Step::OpenDetail, "click on group header failed");
            }
            Some(_) => {}
            None => tracing::debug!(step = %Step::OpenDetail, "group header not found"),
        }

        if any_indicator_present(&root, &self.profile.detail_indicators) {
            advance(state, now)
        } else {
            tracing::debug!(step = %Step::OpenDetail, "detail screen not visible yet");
            TickOutcome::Held
        }
    }

    /// Step 2: open the overflow menu, by description marker or, failing
    /// that, by the top-right icon heuristic.
    fn open_menu<S: Snapshot>(
        &self,
        snapshot: &S,
        state: &mut AutomationState,
        now: Instant,
    ) -> TickOutcome {
        let root = snapshot.root();
        let candidates = collect_clickable(&root);

        for node in candidates
            .iter()
            .filter(|node| description_contains_any(*node, &self.profile.menu_markers))
        {
            if direct_click(node) {
                return advance(state, now);
            }
            tracing::debug!(
                step = %Step::OpenMenu,
                description = node.description().unwrap_or_default(),
                "click on overflow marker failed"
            );
        }

        match best_top_right_of_class(&candidates, &self.profile.icon_class) {
            Some(icon) if direct_click(icon) => advance(state, now),
            Some(_) => {
                tracing::debug!(step = %Step::OpenMenu, "click on overflow icon failed");
                TickOutcome::Held
            }
            None => {
                tracing::debug!(step = %Step::OpenMenu, "overflow button not found");
                TickOutcome::Held
            }
        }
    }

    /// Step 3: press the leave entry.
    fn leave<S: Snapshot>(
        &self,
        snapshot: &S,
        state: &mut AutomationState,
        now: Instant,
    ) -> TickOutcome {
        let root = snapshot.root();
        match find_by_text(&root, &self.profile.leave_label) {
            Some(node) if escalate_click(&node) => advance(state, now),
            Some(_) => {
                tracing::debug!(step = %Step::Leave, "leave entry found but click failed");
                TickOutcome::Held
            }
            None => {
                tracing::debug!(step = %Step::Leave, label = %self.profile.leave_label, "leave entry not found");
                TickOutcome::Held
            }
        }
    }

    /// Step 4: press the confirmation button itself.
    fn confirm<S: Snapshot>(
        &self,
        snapshot: &S,
        state: &mut AutomationState,
        now: Instant,
    ) -> TickOutcome {
        let root = snapshot.root();
        match find_by_text(&root, &self.profile.confirm_label) {
            Some(node) if direct_click(&node) => advance(state, now),
            Some(_) => {
                tracing::debug!(step = %Step::Confirm, "confirm button found but click failed");
                TickOutcome::Held
            }
            None => {
                tracing::debug!(step = %Step::Confirm, label = %self.profile.confirm_label, "confirm button not found");
                TickOutcome::Held
            }
        }
    }
}

fn advance(state: &mut AutomationState, now: Instant) -> TickOutcome {
    let from = state.step;
    let to = from.next();
    state.advance_to(to, now);
    tracing::info!(%from, %to, "step advanced");
    TickOutcome::Advanced { from, to }
}
