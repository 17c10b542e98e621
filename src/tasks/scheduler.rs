//! Timer Scheduling
//!
//! The cache never sleeps on its own. Each TTL expiry is handed to a
//! [`Scheduler`], which runs the callback later on some other execution
//! context. Production code uses [`TokioScheduler`]; tests can drive time by
//! hand with [`ManualScheduler`].

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::trace;

use crate::error::{CacheError, Result};

/// Deferred callback run by a [`Scheduler`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

// == Scheduler Trait ==
/// Runs a callback once after a delay, off the caller's call stack.
pub trait Scheduler: Send + Sync {
    /// Queues `task` to run after `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Task);
}

// == Tokio Scheduler ==
/// Spawns one sleeping tokio task per scheduled callback.
///
/// Dropping the scheduler wakes every pending task and lets it exit without
/// running its callback.
pub struct TokioScheduler {
    handle: Handle,
    /// Each pending task holds a receiver; dropping or signalling cancels them
    shutdown: watch::Sender<()>,
}

impl TokioScheduler {
    /// Creates a scheduler that spawns onto the given runtime.
    pub fn new(handle: Handle) -> Self {
        let (shutdown, _) = watch::channel(());
        Self { handle, shutdown }
    }

    /// Creates a scheduler bound to the runtime the caller is running in.
    ///
    /// # Errors
    /// [`CacheError::NoRuntime`] outside of a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| CacheError::NoRuntime)
    }

    /// Cancels every task scheduled so far. Later calls to `schedule` are
    /// unaffected.
    pub fn cancel_all(&self) {
        self.shutdown.send_replace(());
    }

    /// Number of tasks that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.shutdown.receiver_count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut shutdown = self.shutdown.subscribe();

        self.handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => task(),
                _ = shutdown.changed() => trace!("scheduled task cancelled"),
            }
        });
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

// == Manual Scheduler ==
/// Deterministic scheduler driven by a virtual clock.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock past a
/// task's deadline. Due tasks run in deadline order, ties in the order they
/// were scheduled.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    queue: Vec<Scheduled>,
}

struct Scheduled {
    due: Duration,
    seq: u64,
    task: Task,
}

impl ManualScheduler {
    // == Constructor ==
    /// Creates a scheduler with its clock at zero and nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of tasks still waiting for their deadline.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Moves the clock forward and runs every task that became due.
    ///
    /// Tasks run after the internal lock is released, so they may schedule
    /// further work. Returns the number of tasks run. The clock saturates at
    /// `Duration::MAX` instead of overflowing.
    pub fn advance(&self, by: Duration) -> usize {
        let mut due = {
            let mut state = self.state.lock();
            state.now = state.now.saturating_add(by);
            let now = state.now;

            let (due, waiting): (Vec<_>, Vec<_>) =
                state.queue.drain(..).partition(|scheduled| scheduled.due <= now);
            state.queue = waiting;
            due
        };

        due.sort_by_key(|scheduled| (scheduled.due, scheduled.seq));
        let fired = due.len();
        for scheduled in due {
            (scheduled.task)();
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut state = self.state.lock();
        let due = state.now.saturating_add(delay);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(Scheduled { due, seq, task });
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}
