//! Cooperative task scheduling for enemy processes.
//!
//! Every timed process an enemy runs (attack sequence, cooldown, stun,
//! knockback, hit flash, reload, death) is a plain data object stored in a
//! [`TaskSlot`]. The owner advances it once per tick; the task reports whether
//! it is still [`Progress::Pending`] or [`Progress::Done`]. Cancelling a task
//! simply drops its data, so no cleanup code of the task ever runs.
//!
//! Tasks are advanced "out of slot": the owner takes the task out with
//! [`TaskSlot::suspend`], advances it with full mutable access to the enemy,
//! then hands it back with [`TaskSlot::resume`]. If anything started or
//! cancelled the same slot in between, the returned task is discarded.

/// Result of advancing a task by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Suspended at a wait point, resume next tick.
    Pending,
    /// Finished, drop the task.
    Done,
}

impl Progress {
    pub fn is_done(self) -> bool {
        self == Progress::Done
    }
}

/// Holds at most one live task of a given kind.
#[derive(Debug)]
pub struct TaskSlot<T> {
    task: Option<T>,
    /// True while the task is out of the slot being advanced.
    in_flight: bool,
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self {
            task: None,
            in_flight: false,
        }
    }
}

impl<T> TaskSlot<T> {
    /// Start a task, cancelling whatever was running in this slot.
    /// Returns the cancelled task, if any.
    pub fn start(&mut self, task: T) -> Option<T> {
        let previous = self.cancel();
        self.task = Some(task);
        previous
    }

    /// Cancel the running task. A task currently being advanced is marked
    /// so that it is dropped when it yields.
    pub fn cancel(&mut self) -> Option<T> {
        self.in_flight = false;
        self.task.take()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some() || self.in_flight
    }

    pub fn get(&self) -> Option<&T> {
        self.task.as_ref()
    }

    /// Take the task out for advancing.
    pub fn suspend(&mut self) -> Option<T> {
        let task = self.task.take()?;
        self.in_flight = true;
        Some(task)
    }

    /// Put an advanced task back. The task is kept only if it is still
    /// pending and nobody touched the slot while it was out.
    pub fn resume(&mut self, task: T, progress: Progress) {
        if !self.in_flight {
            return;
        }
        self.in_flight = false;
        if progress == Progress::Pending {
            self.task = Some(task);
        }
    }
}

/// A wait-for-duration point.
///
/// The countdown is entered on one tick and only checked on later ticks, so
/// even a zero-length wait suspends for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: if seconds.is_nan() { 0.0 } else { seconds.max(0.0) },
        }
    }

    /// Advance by `dt`; true once the wait is over.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }
}

/// Attack cooldown: counts `remaining` down by the frame delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    pub remaining: f32,
}

impl Cooldown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    pub fn tick(&mut self, dt: f32) -> Progress {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            Progress::Pending
        } else {
            self.remaining = 0.0;
            Progress::Done
        }
    }
}
