//! Coalescing of document changes into refresh cycles.
//!
//! At most one refresh cycle runs at a time, and at most one more is queued
//! behind it. Any number of changes that arrive while a cycle is running
//! collapse into that single queued cycle, which reads the document only
//! once it starts and therefore sees the latest text.
//!
//! ```text
//!            change                       change
//!   Idle ────────────► Running ─────────────────► RunningWithPending
//!    ▲                   │  ▲                          │      ▲  │
//!    └── cycle complete ─┘  └──── cycle complete ──────┘      └──┘ change
//! ```

use std::time::Duration;

use log::{debug, warn};

/// State of the update scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// No cycle is running.
    #[default]
    Idle,
    /// A cycle is running and no change arrived since it started.
    Running,
    /// A cycle is running and another one must follow it.
    RunningWithPending,
}

impl SchedulerState {
    /// Returns the state after a document change, and whether a cycle must start.
    pub fn on_change(self) -> (Self, bool) {
        match self {
            Self::Idle => (Self::Running, true),
            Self::Running | Self::RunningWithPending => (Self::RunningWithPending, false),
        }
    }

    /// Returns the state after a cycle finished, and whether a cycle must start.
    pub fn on_cycle_complete(self) -> (Self, bool) {
        match self {
            Self::Idle => (Self::Idle, false),
            Self::Running => (Self::Idle, false),
            Self::RunningWithPending => (Self::Running, true),
        }
    }

    /// Returns `true` while a cycle is running.
    pub fn is_running(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Tracks the scheduler state and the settle delay.
///
/// The scheduler decides when cycles start; running them is up to the
/// caller, which reports back through [`UpdateScheduler::cycle_completed`].
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use spright_preview::scheduler::UpdateScheduler;
/// let mut scheduler = UpdateScheduler::new(Duration::from_millis(100));
///
/// assert!(scheduler.notify_changed());
/// assert!(!scheduler.notify_changed());
/// assert!(!scheduler.notify_changed());
///
/// // The two extra changes collapse into one follow-up cycle
/// assert!(scheduler.cycle_completed());
/// assert!(!scheduler.cycle_completed());
/// ```
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    state: SchedulerState,
    settle_delay: Duration,
}

impl UpdateScheduler {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            settle_delay,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Returns the wait before a cycle reads the document.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Records a document change.
    ///
    /// Returns `true` if the caller must start a cycle now.
    pub fn notify_changed(&mut self) -> bool {
        let (next, start) = self.state.on_change();
        debug!(from:? = self.state, to:? = next; "Document changed");
        self.state = next;
        start
    }

    /// Records that the running cycle finished, successfully or not.
    ///
    /// Returns `true` if the caller must start the queued cycle now.
    pub fn cycle_completed(&mut self) -> bool {
        if self.state == SchedulerState::Idle {
            warn!("Cycle completion reported while no cycle was running");
        }
        let (next, start) = self.state.on_cycle_complete();
        debug!(from:? = self.state, to:? = next; "Cycle completed");
        self.state = next;
        start
    }

    /// Marks a cycle as running without a change.
    ///
    /// Used for the initial cycle of a session. Returns `false` if a cycle
    /// was already running, in which case a follow-up cycle is queued.
    pub fn start_initial(&mut self) -> bool {
        self.notify_changed()
    }
}
