//=========================================================================
// Timed Task Runner
//=========================================================================
//
// Cooperative scheduler for timed routines, driven by the session tick.
//
// Architecture:
//   start() ──► entries: Vec<Entry>  (registration order)
//                    ↓
//   advance(dt) ──► elapsed += dt ──► Routine::step() ──► Continue | Complete
//                    ↓
//   remove completed, cancelled and expired entries
//
// Cancellation is cooperative: `cancel()` only raises a flag. The routine
// sees it on its next step, performs its cleanup, and is then removed.
// No threads; "suspended" means "waiting for the next advance".
//
//=========================================================================

//=== Module Declarations =================================================

mod blink;
mod countdown;

//=== Public API ==========================================================

pub use blink::{begin_invincibility, InvincibilityBlink};
pub use countdown::ConsumableCountdown;

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== TaskHandle ==========================================================

/// Identifies a routine registered with a [`TaskRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[cfg(test)]
impl TaskHandle {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

//=== RoutineStatus =======================================================

/// Result of a single routine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineStatus {
    /// Resume on the next tick.
    Continue,

    /// Done; the runner drops the routine.
    Complete,
}

//=== RoutineClock ========================================================

/// Timing view handed to a routine on every step.
#[derive(Debug, Clone, Copy)]
pub struct RoutineClock {
    /// Handle of the routine being stepped.
    pub handle: TaskHandle,

    /// Time advanced this tick, in seconds.
    pub delta: f32,

    /// Total time accumulated since the routine started.
    pub elapsed: f32,

    /// Duration bound, `None` for unbounded routines.
    pub duration: Option<f32>,

    /// Set once `cancel()` was requested. The step must clean up and stop.
    pub cancelled: bool,
}

impl RoutineClock {
    /// Returns true once the duration bound has been reached.
    pub fn is_expired(&self) -> bool {
        self.duration.is_some_and(|d| self.elapsed >= d)
    }

    /// Returns true if the routine must stop after this step.
    pub fn should_stop(&self) -> bool {
        self.cancelled || self.is_expired()
    }

    /// Time left before the duration bound, `None` for unbounded routines.
    pub fn remaining(&self) -> Option<f32> {
        self.duration.map(|d| (d - self.elapsed).max(0.0))
    }
}

//=== Routine Trait =======================================================

/// A resumable unit of timed work.
///
/// Each routine carries its own resume state; `step` is called once per
/// tick with mutable access to the shared context `C`.
pub trait Routine<C>: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "routine"
    }

    /// Advances the routine by one tick.
    fn step(&mut self, clock: &RoutineClock, ctx: &mut C) -> RoutineStatus;
}

//=== TaskRunner ==========================================================

struct Entry<C> {
    handle: TaskHandle,
    elapsed: f32,
    duration: Option<f32>,
    cancelled: bool,
    routine: Box<dyn Routine<C>>,
}

/// Single-threaded runner for [`Routine`]s.
pub struct TaskRunner<C> {
    entries: Vec<Entry<C>>,
    next_id: u64,
}

impl<C> TaskRunner<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a routine and returns a handle usable for [`cancel`](Self::cancel).
    ///
    /// The routine is first stepped on the next `advance`.
    pub fn start<R>(&mut self, routine: R, duration: Option<f32>) -> TaskHandle
    where
        R: Routine<C> + 'static,
    {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;

        debug!("Starting routine '{}' as {:?} (duration: {:?})", routine.name(), handle, duration);

        self.entries.push(Entry {
            handle,
            elapsed: 0.0,
            duration,
            cancelled: false,
            routine: Box::new(routine),
        });

        handle
    }

    /// Requests cancellation. Returns false if the routine is not running.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.entries.iter_mut().find(|e| e.handle == handle) {
            Some(entry) => {
                entry.cancelled = true;
                true
            }
            None => false,
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Steps every routine once, in registration order.
    pub fn advance(&mut self, dt: f32, ctx: &mut C) {
        self.entries.retain_mut(|entry| {
            if !entry.cancelled {
                entry.elapsed += dt;
            }

            let clock = RoutineClock {
                handle: entry.handle,
                delta: dt,
                elapsed: entry.elapsed,
                duration: entry.duration,
                cancelled: entry.cancelled,
            };

            let status = entry.routine.step(&clock, ctx);
            let keep = status == RoutineStatus::Continue && !clock.should_stop();

            if !keep {
                trace!(
                    "Routine '{}' {:?} finished after {:.3}s (cancelled: {})",
                    entry.routine.name(),
                    entry.handle,
                    entry.elapsed,
                    entry.cancelled
                );
            }

            keep
        });
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_running(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every routine without stepping it.
    ///
    /// Used at run reset, when the context is rebuilt anyway.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<C> Default for TaskRunner<C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
