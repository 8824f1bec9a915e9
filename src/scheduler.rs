use std::time::{Duration, Instant};

/// Identifies one registered periodic tick. Only meaningful to the scheduler that issued it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// Something that can fire the engine's tick periodically.
pub trait TickScheduler {
    fn schedule(&mut self, every: Duration) -> TickHandle;

    /// Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

struct Interval {
    handle: TickHandle,
    every: Duration,
    next_due: Instant,
}

/// A single poll-driven interval for a loop that sleeps on input.
pub struct IntervalTimer {
    next_id: u64,
    active: Option<Interval>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        IntervalTimer { next_id: 0, active: None }
    }

    /// How long the loop may wait before the next tick. `None` when nothing is scheduled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.active.as_ref().map(|i| i.next_due.saturating_duration_since(now))
    }

    /// Consumes a due tick, if any. Missed ticks are not replayed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match &mut self.active {
            Some(interval) if now >= interval.next_due => {
                interval.next_due = now + interval.every;
                true
            },
            _ => false,
        }
    }

    /// Pushes the next tick a full interval past `now`, after the loop was blocked.
    pub fn restart(&mut self, now: Instant) {
        if let Some(interval) = &mut self.active {
            interval.next_due = now + interval.every;
        }
    }
}

impl TickScheduler for IntervalTimer {
    fn schedule(&mut self, every: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);

        if self.active.is_some() {
            tracing::warn!("replacing an interval that was never cancelled");
        }

        self.active = Some(Interval { handle, every, next_due: Instant::now() + every });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(&self.active, Some(i) if i.handle == handle) {
            self.active = None;
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Records every call so tests can check the one-timer rule.
    #[derive(Default)]
    pub struct RecordingScheduler {
        next_id: u64,
        pub active: Vec<(TickHandle, Duration)>,
        pub scheduled: Vec<Duration>,
        pub cancelled: usize,
    }

    impl TickScheduler for RecordingScheduler {
        fn schedule(&mut self, every: Duration) -> TickHandle {
            self.next_id += 1;
            let handle = TickHandle(self.next_id);
            self.active.push((handle, every));
            self.scheduled.push(every);
            handle
        }

        fn cancel(&mut self, handle: TickHandle) {
            let before = self.active.len();
            self.active.retain(|(h, _)| *h != handle);
            if self.active.len() < before {
                self.cancelled += 1;
            }
        }
    }
}
