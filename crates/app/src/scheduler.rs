//! Poll scheduler: runs the step machine on a timer, one tick at a time.
//!
//! The scheduler owns the only [`AutomationState`]. The next tick is
//! scheduled only after the current one has fully returned, whatever its
//! outcome, so ticks never overlap. Tick errors and panics are logged and
//! dropped: the state from before the failed tick is kept.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use autoleave_domain::state::AutomationState;
use autoleave_domain::step::Step;
use autoleave_domain::time::{Timestamp, now};

use crate::interval::IntervalPolicy;
use crate::ports::{KeywordStore, TreeSource};
use crate::step_machine::{StepMachine, TickOutcome};

/// Observable summary of a running automation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationStatus {
    /// Current step.
    pub step: Step,
    /// Ticks run so far, failed ones included.
    pub ticks: u64,
    /// Ticks that returned an error or panicked.
    pub failed_ticks: u64,
    /// Leave cycles confirmed so far.
    pub completed_cycles: u64,
    /// Wall-clock time of the last confirmed leave.
    pub last_completed_at: Option<Timestamp>,
    /// Outcome of the last successful tick.
    pub last_outcome: Option<TickOutcome>,
}

/// Drives a [`StepMachine`] with an injected [`IntervalPolicy`].
pub struct PollScheduler<TS, KS, P> {
    machine: StepMachine<TS, KS>,
    policy: P,
    state: AutomationState,
    status: AutomationStatus,
}

impl<TS, KS, P> PollScheduler<TS, KS, P>
where
    TS: TreeSource,
    KS: KeywordStore,
    P: IntervalPolicy,
{
    /// Create a scheduler starting from the initial (detect) state.
    pub fn new(machine: StepMachine<TS, KS>, policy: P) -> Self {
        Self {
            machine,
            policy,
            state: AutomationState::default(),
            status: AutomationStatus::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AutomationState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> &AutomationStatus {
        &self.status
    }

    #[must_use]
    pub fn machine(&self) -> &StepMachine<TS, KS> {
        &self.machine
    }

    /// Run a single tick at monotonic time `at` and return the delay
    /// before the next one.
    ///
    /// The tick works on a copy of the state which is committed only when
    /// the tick succeeds. A panic inside the tick counts as a failed tick.
    pub async fn tick_once(&mut self, at: std::time::Instant) -> Duration {
        let mut next = self.state.clone();
        self.status.ticks += 1;

        let result = AssertUnwindSafe(self.machine.tick(&mut next, at))
            .catch_unwind()
            .await;
        match result {
            Ok(Ok(outcome)) => {
                self.state = next;
                self.record(outcome);
            }
            Ok(Err(err)) => {
                self.status.failed_ticks += 1;
                tracing::warn!(%err, step = %self.state.step, "tick failed, state unchanged");
            }
            Err(payload) => {
                self.status.failed_ticks += 1;
                tracing::warn!(
                    panic = panic_message(payload.as_ref()),
                    step = %self.state.step,
                    "tick panicked, state unchanged"
                );
            }
        }

        let delay = self.policy.next_interval();
        self.state.poll_interval = delay;
        delay
    }

    fn record(&mut self, outcome: TickOutcome) {
        if let TickOutcome::Advanced {
            to: Step::Complete, ..
        } = outcome
        {
            self.status.completed_cycles += 1;
            self.status.last_completed_at = Some(now());
            tracing::info!(
                completed_cycles = self.status.completed_cycles,
                "leave confirmed"
            );
        }
        self.status.step = self.state.step;
        self.status.last_outcome = Some(outcome);
    }

    async fn run(mut self, cancel: CancellationToken, status_tx: watch::Sender<AutomationStatus>) {
        tracing::info!("poll scheduler started");
        while !cancel.is_cancelled() {
            let delay = self
                .tick_once(tokio::time::Instant::now().into_std())
                .await;
            status_tx.send_replace(self.status.clone());

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }
        tracing::info!(ticks = self.status.ticks, "poll scheduler stopped");
    }
}

impl<TS, KS, P> PollScheduler<TS, KS, P>
where
    TS: TreeSource + 'static,
    TS::Snapshot: 'static,
    KS: KeywordStore + 'static,
    P: IntervalPolicy + 'static,
{
    /// Spawn the polling loop onto the current tokio runtime.
    ///
    /// The first tick runs immediately.
    #[must_use]
    pub fn spawn(self) -> SchedulerHandle {
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(self.status.clone());
        let join = tokio::spawn(self.run(cancel.clone(), status_tx));

        SchedulerHandle {
            cancel,
            status: status_rx,
            join,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Control handle of a spawned [`PollScheduler`].
pub struct SchedulerHandle {
    cancel: CancellationToken,
    status: watch::Receiver<AutomationStatus>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Latest published status.
    #[must_use]
    pub fn status(&self) -> AutomationStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified after every tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AutomationStatus> {
        self.status.clone()
    }

    /// Prevent any further tick from being scheduled.
    ///
    /// Safe to call at any time: a tick already running finishes and
    /// commits normally.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Wait for the polling loop to exit.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`](tokio::task::JoinError) if the loop panicked.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.join.await
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Arc;

    use tokio::sync::Notify;

    use autoleave_domain::error::AutomationError;
    use autoleave_domain::keyword::KeywordSet;
    use autoleave_domain::profile::TargetProfile;

    use super::*;
    use crate::interval::FixedInterval;
    use crate::step_machine::fake::{FakeHost, FakeKeywords, Screen, node, row, text};

    const PKG: &str = "com.example.chat";

    fn profile() -> TargetProfile {
        TargetProfile {
            package: PKG.to_string(),
            group_link_markers: vec!["chat.example/".to_string()],
            detail_indicators: vec!["Members".to_string()],
            menu_markers: vec!["More options".to_string()],
            leave_label: "Leave Group".to_string(),
            confirm_label: "Yes".to_string(),
            ..TargetProfile::default()
        }
    }

    /// Every step's target on one screen, so a cycle can complete without
    /// any navigation.
    fn everything_screen() -> Arc<Screen> {
        Screen::new(
            PKG,
            node()
                .child(row("group row").child(text("Foo Group")))
                .child(text("chat.example/foo"))
                .child(text("Members"))
                .child(row("More options"))
                .child(row("leave row").child(text("Leave Group")))
                .child(text("Yes").clickable()),
        )
    }

    fn scheduler(
        keywords: &str,
        interval_ms: u64,
    ) -> PollScheduler<FakeHost, FakeKeywords, FixedInterval> {
        let machine = StepMachine::new(FakeHost::default(), FakeKeywords::new(keywords), profile());
        PollScheduler::new(machine, FixedInterval(Duration::from_millis(interval_ms)))
    }

    #[tokio::test]
    async fn should_keep_state_when_tick_fails() {
        let mut s = scheduler("foo", 500);
        s.machine().tree_source().show(everything_screen());
        s.machine().keyword_store().fail(true);

        let delay = s.tick_once(std::time::Instant::now()).await;

        assert_eq!(delay, Duration::from_millis(500));
        assert_eq!(s.state().step, Step::Detect);
        assert!(s.state().group_detected_time.is_none());
        assert_eq!(s.status().ticks, 1);
        assert_eq!(s.status().failed_ticks, 1);
        assert!(s.status().last_outcome.is_none());
    }

    /// Keyword store whose loads block until the test releases them.
    #[derive(Default)]
    struct GatedKeywords {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl KeywordStore for GatedKeywords {
        fn load_keywords(
            &self,
        ) -> impl Future<Output = Result<KeywordSet, AutomationError>> + Send {
            let entered = Arc::clone(&self.entered);
            let release = Arc::clone(&self.release);
            async move {
                entered.notify_one();
                release.notified().await;
                Ok(KeywordSet::parse("foo group"))
            }
        }
    }

    #[tokio::test]
    async fn should_keep_state_when_tick_panics() {
        let mut s = scheduler("foo group", 500);
        s.machine().tree_source().show(everything_screen());
        s.machine().tree_source().panic_next(1);
        let start = std::time::Instant::now();

        let delay = s.tick_once(start).await;

        assert_eq!(delay, Duration::from_millis(500));
        assert_eq!(s.state().step, Step::Detect);
        assert!(s.state().group_detected_time.is_none());
        assert_eq!(s.status().ticks, 1);
        assert_eq!(s.status().failed_ticks, 1);
        assert!(s.status().last_outcome.is_none());

        s.tick_once(start + delay).await;
        assert_eq!(s.status().failed_ticks, 1);
        assert_eq!(s.status().last_outcome, Some(TickOutcome::GroupDetected));
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_polling_after_panicking_tick() {
        let s = scheduler("foo", 500);
        s.machine().tree_source().panic_next(1);
        let handle = s.spawn();

        tokio::time::sleep(Duration::from_millis(5_000)).await;
        let status = handle.status();
        handle.stop();
        handle.join().await.unwrap();

        assert!(status.ticks >= 9, "only {} ticks", status.ticks);
        assert_eq!(status.failed_ticks, 1);
        assert_eq!(status.last_outcome, Some(TickOutcome::NoSurface));
    }

    #[tokio::test(start_paused = true)]
    async fn should_finish_running_tick_when_stopped_mid_tick() {
        let keywords = GatedKeywords::default();
        let entered = Arc::clone(&keywords.entered);
        let release = Arc::clone(&keywords.release);
        let machine = StepMachine::new(FakeHost::default(), keywords, profile());
        machine.tree_source().show(everything_screen());
        let handle =
            PollScheduler::new(machine, FixedInterval(Duration::from_millis(500))).spawn();
        let rx = handle.subscribe();

        entered.notified().await;
        handle.stop();
        release.notify_one();
        handle.join().await.unwrap();

        let status = rx.borrow().clone();
        assert_eq!(status.ticks, 1);
        assert_eq!(status.failed_ticks, 0);
        assert_eq!(status.step, Step::Detect);
        assert_eq!(status.last_outcome, Some(TickOutcome::GroupDetected));
    }

    #[tokio::test]
    async fn should_record_poll_interval_in_state() {
        let mut s = scheduler("foo", 750);
        s.tick_once(std::time::Instant::now()).await;
        assert_eq!(s.state().poll_interval, Duration::from_millis(750));
        assert_eq!(s.status().last_outcome, Some(TickOutcome::NoSurface));
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_repeatedly_until_stopped() {
        let s = scheduler("foo", 500);
        let handle = s.spawn();
        let mut rx = handle.subscribe();

        for _ in 0..3 {
            rx.changed().await.unwrap();
        }
        handle.stop();
        let ticks = handle.status().ticks;
        handle.join().await.unwrap();

        assert!(ticks >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_continue_scheduling_after_failures() {
        let s = scheduler("foo", 500);
        s.machine().tree_source().fail_snapshots(true);
        let handle = s.spawn();

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        let status = handle.status();
        handle.stop();
        handle.join().await.unwrap();

        assert!(status.ticks >= 4, "only {} ticks", status.ticks);
        assert_eq!(status.failed_ticks, status.ticks);
        assert_eq!(status.step, Step::Detect);
    }

    #[tokio::test(start_paused = true)]
    async fn should_complete_cycle_and_start_over() {
        let s = scheduler("foo group", 600);
        s.machine().tree_source().show(everything_screen());
        let handle = s.spawn();

        // detect, settle+click, detail, menu, leave, confirm, reset
        tokio::time::sleep(Duration::from_millis(3_700)).await;
        let status = handle.status();
        handle.stop();
        handle.join().await.unwrap();

        assert_eq!(status.completed_cycles, 1);
        assert!(status.last_completed_at.is_some());
        assert_eq!(status.step, Step::Detect);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_before_first_tick_when_cancelled_early() {
        let s = scheduler("foo", 500);
        let token = CancellationToken::new();
        token.cancel();
        let (tx, rx) = watch::channel(AutomationStatus::default());

        s.run(token, tx).await;

        assert_eq!(rx.borrow().ticks, 0);
    }
}
