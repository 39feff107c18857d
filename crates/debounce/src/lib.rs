//! Delay-and-collapse for high-frequency events.
//!
//! Time is supplied by the caller. The owner of a [`Debouncer`] feeds it calls
//! as they arrive, sleeps until [`Debouncer::next_deadline`], then polls. Only
//! the latest call inside a quiet window is ever delivered; earlier ones are
//! discarded, never queued.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<A> {
    args: A,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer<A> {
    wait: Duration,
    pending: Option<Pending<A>>,
    delivered: u64,
    superseded: u64,
}

impl<A> Debouncer<A> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
            delivered: 0,
            superseded: 0,
        }
    }

    pub fn from_millis(wait_ms: u64) -> Self {
        Self::new(Duration::from_millis(wait_ms))
    }

    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Replace any pending call with `args`, due `wait` after `now`.
    pub fn call(&mut self, args: A, now: Instant) {
        if self.pending.is_some() {
            self.superseded += 1;
        }
        self.pending = Some(Pending {
            args,
            deadline: now + self.wait,
        });
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending arguments if their deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        let due = self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return None;
        }
        self.take_delivered()
    }

    /// Deliver the pending call immediately, ignoring its deadline.
    pub fn flush(&mut self) -> Option<A> {
        self.take_delivered()
    }

    /// Drop the pending call without delivering it.
    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|p| p.args)
    }

    /// Calls delivered through `poll` or `flush`.
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Calls that were replaced by a later call before firing.
    pub const fn superseded(&self) -> u64 {
        self.superseded
    }

    fn take_delivered(&mut self) -> Option<A> {
        let pending = self.pending.take()?;
        self.delivered += 1;
        log::trace!(
            "debounce: delivering after {} superseded call(s)",
            self.superseded
        );
        Some(pending.args)
    }
}

/// A function wrapped by a [`Debouncer`]; see [`debounce`].
pub struct Debounced<A, F> {
    debouncer: Debouncer<A>,
    f: F,
}

/// Wrap `f` so that it only runs `wait` after the most recent call.
pub fn debounce<A, F>(f: F, wait: Duration) -> Debounced<A, F>
where
    F: FnMut(A),
{
    Debounced {
        debouncer: Debouncer::new(wait),
        f,
    }
}

impl<A, F> Debounced<A, F>
where
    F: FnMut(A),
{
    pub fn call(&mut self, args: A, now: Instant) {
        self.debouncer.call(args, now);
    }

    /// Run the wrapped function if the pending call is due. Returns whether it ran.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(args) => {
                (self.f)(args);
                true
            }
            None => false,
        }
    }

    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(args) => {
                (self.f)(args);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
