use crate::errors::{AppError, AppResult};
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};

pub const DEFAULT_PERSIST_DELAY: Duration = Duration::from_millis(1000);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().map(|offset| *offset).unwrap_or_default();
        self.origin + offset
    }
}

pub type WriteTask = Box<dyn FnOnce() -> AppResult<()> + Send>;

struct PendingWrite {
    due_at: Instant,
    task: WriteTask,
}

#[derive(Debug)]
pub enum FlushOutcome {
    Idle,
    NotDue(Duration),
    Written,
    Failed(AppError),
}

/// Debounces persistence: each `schedule` replaces the pending write and
/// restarts the delay, so only the last writer of a burst runs.
pub struct PersistenceScheduler {
    clock: Arc<dyn Clock>,
    delay: Duration,
    pending: Option<PendingWrite>,
    dirty: bool,
}

impl PersistenceScheduler {
    pub fn new(clock: Arc<dyn Clock>, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            pending: None,
            dirty: false,
        }
    }

    pub fn schedule(&mut self, task: WriteTask) {
        let due_at = self.clock.now() + self.delay;
        if self.pending.replace(PendingWrite { due_at, task }).is_some() {
            tracing::trace!("pending write superseded");
        }
        self.dirty = true;
    }

    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn time_until_due(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due_at.saturating_duration_since(self.clock.now()))
    }

    pub fn poll(&mut self) -> FlushOutcome {
        match self.time_until_due() {
            None => FlushOutcome::Idle,
            Some(remaining) if !remaining.is_zero() => FlushOutcome::NotDue(remaining),
            Some(_) => self.run_pending(),
        }
    }

    pub fn flush_now(&mut self) -> FlushOutcome {
        self.run_pending()
    }

    fn run_pending(&mut self) -> FlushOutcome {
        let Some(pending) = self.pending.take() else {
            return FlushOutcome::Idle;
        };
        match (pending.task)() {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!("persisted pending state");
                FlushOutcome::Written
            }
            Err(error) => {
                tracing::warn!(error = %error, "persisting state failed; will retry on next scheduled flush");
                FlushOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FlushOutcome, ManualClock, PersistenceScheduler, WriteTask};
    use crate::errors::AppError;
    use std::sync::{Arc, Mutex};
    use tokio::time::Duration;

    fn recording_task(log: &Arc<Mutex<Vec<u32>>>, value: u32) -> WriteTask {
        let log = log.clone();
        Box::new(move || {
            log.lock().expect("log lock").push(value);
            Ok(())
        })
    }

    fn scheduler(clock: &ManualClock) -> PersistenceScheduler {
        PersistenceScheduler::new(Arc::new(clock.clone()), Duration::from_millis(1000))
    }

    #[test]
    fn burst_of_schedules_runs_only_the_last_writer() {
        let clock = ManualClock::new();
        let mut scheduler = scheduler(&clock);
        let log = Arc::new(Mutex::new(Vec::new()));

        for value in 1..=5 {
            scheduler.schedule(recording_task(&log, value));
            clock.advance(Duration::from_millis(400));
            assert!(matches!(scheduler.poll(), FlushOutcome::NotDue(_)));
        }
        assert!(scheduler.is_dirty());

        clock.advance(Duration::from_millis(600));
        assert!(matches!(scheduler.poll(), FlushOutcome::Written));
        assert_eq!(*log.lock().expect("log lock"), vec![5]);
        assert!(!scheduler.is_dirty());
        assert!(matches!(scheduler.poll(), FlushOutcome::Idle));
    }

    #[test]
    fn cancel_pending_drops_the_write_but_keeps_dirty() {
        let clock = ManualClock::new();
        let mut scheduler = scheduler(&clock);
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule(recording_task(&log, 1));
        assert!(scheduler.cancel_pending());
        assert!(!scheduler.cancel_pending());
        clock.advance(Duration::from_secs(5));
        assert!(matches!(scheduler.poll(), FlushOutcome::Idle));
        assert!(log.lock().expect("log lock").is_empty());
        assert!(scheduler.is_dirty());
    }

    #[test]
    fn failed_write_leaves_state_dirty_until_next_flush_succeeds() {
        let clock = ManualClock::new();
        let mut scheduler = scheduler(&clock);
        let log = Arc::new(Mutex::new(Vec::new()));

        scheduler.schedule(Box::new(|| Err(AppError::Io("disk full".to_string()))));
        clock.advance(Duration::from_millis(1000));
        assert!(matches!(scheduler.poll(), FlushOutcome::Failed(_)));
        assert!(scheduler.is_dirty());

        scheduler.schedule(recording_task(&log, 2));
        assert!(matches!(scheduler.flush_now(), FlushOutcome::Written));
        assert!(!scheduler.is_dirty());
        assert_eq!(*log.lock().expect("log lock"), vec![2]);
    }
}
