//! Virtual timers owned by a single session.
//!
//! The session clock only moves when the owner calls
//! [`TimerWheel::next_due`] / [`TimerWheel::settle`], so tests can step
//! through a minute of simulated time instantly. Cancelled timers are
//! removed from the wheel and can never fire.

use std::time::Duration;

/// Handle returned by every arm call. Cancelling a handle that already fired
/// or was cancelled is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// 1 s repeating tick advancing the history-taking clock.
    ElapsedTick,
    /// One-shot deterioration trigger.
    Deterioration,
    /// One-shot simulated "thinking" delay before the patient answers.
    PatientReply,
    /// 1 s repeating tick of the post-completion countdown.
    Countdown,
}

#[derive(Debug)]
struct ArmedTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct TimerWheel {
    now: Duration,
    next_id: u64,
    armed: Vec<ArmedTimer>,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session clock, measured from session creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn arm_once(&mut self, kind: TimerKind, after: Duration) -> TimerHandle {
        self.arm(kind, after, None)
    }

    /// Arm a timer that fires every `period` until cancelled.
    pub fn arm_repeating(&mut self, kind: TimerKind, period: Duration) -> TimerHandle {
        // A zero period would fire forever without the clock moving.
        let period = period.max(Duration::from_millis(1));
        self.arm(kind, period, Some(period))
    }

    fn arm(&mut self, kind: TimerKind, after: Duration, period: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.armed.push(ArmedTimer {
            handle,
            kind,
            due: self.now + after,
            period,
        });
        tracing::trace!(?kind, ?after, "timer armed");
        handle
    }

    /// Returns whether the handle was still armed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.armed.len();
        self.armed.retain(|t| t.handle != handle);
        before != self.armed.len()
    }

    pub fn cancel_all(&mut self) {
        self.armed.clear();
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.armed.iter().any(|t| t.handle == handle)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Take the earliest timer due at or before `until`, moving the clock to
    /// its due time. Ties fire in arming order. Repeating timers are
    /// re-armed one period later; one-shot timers are removed.
    pub fn next_due(&mut self, until: Duration) -> Option<(TimerHandle, TimerKind)> {
        let idx = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle.0))
            .map(|(idx, _)| idx)?;

        let timer = &mut self.armed[idx];
        let fired = (timer.handle, timer.kind);
        let due = timer.due;
        let period = timer.period;
        match period {
            Some(period) => timer.due = due + period,
            None => {
                self.armed.swap_remove(idx);
            }
        }
        self.now = self.now.max(due);
        Some(fired)
    }

    /// Move the clock to `until` once every due timer has been taken.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
