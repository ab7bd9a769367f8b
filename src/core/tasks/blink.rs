//=========================================================================
// Invincibility Blink
//=========================================================================
//
// Drives a timed invincibility window and its cosmetic blink.
//
// The blink value flips between 1.0 and 0.0 every `period` seconds while
// the window is open. When the window ends (duration reached or routine
// cancelled) the value is reset to neutral and the window is closed,
// unless a newer window has taken over in the meantime.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Routine, RoutineClock, RoutineStatus, TaskHandle, TaskRunner};
use crate::core::context::RuntimeContext;

//=== InvincibilityBlink ==================================================

/// Routine owning the timed half of the character's invincibility.
#[derive(Debug, Clone)]
pub struct InvincibilityBlink {
    period: f32,
    since_flip: f32,
    current: f32,
}

impl InvincibilityBlink {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            since_flip: 0.0,
            current: 1.0,
        }
    }
}

impl Routine<RuntimeContext> for InvincibilityBlink {
    fn name(&self) -> &'static str {
        "invincibility_blink"
    }

    fn step(&mut self, clock: &RoutineClock, ctx: &mut RuntimeContext) -> RoutineStatus {
        if ctx.invincibility.window() != Some(clock.handle) {
            // Superseded by a newer window; nothing of ours left to reset.
            return RoutineStatus::Complete;
        }

        if clock.should_stop() {
            ctx.invincibility.close_window(clock.handle);
            return RoutineStatus::Complete;
        }

        self.since_flip += clock.delta;
        if self.period < self.since_flip {
            self.since_flip = 0.0;
            self.current = 1.0 - self.current;
        }

        let remaining = clock.remaining().unwrap_or(f32::MAX);
        ctx.invincibility.set_remaining(clock.handle, remaining);
        ctx.invincibility.set_blink(clock.handle, self.current);

        RoutineStatus::Continue
    }
}

//=== begin_invincibility() ===============================================

/// Opens a timed invincibility window of `duration` seconds.
///
/// A window that is already open is cancelled and replaced, so at most
/// one blink routine owns the window at any time.
pub fn begin_invincibility(
    tasks: &mut TaskRunner<RuntimeContext>,
    ctx: &mut RuntimeContext,
    duration: f32,
    period: f32,
) -> TaskHandle {
    if let Some(previous) = ctx.invincibility.window() {
        tasks.cancel(previous);
    }

    let handle = tasks.start(InvincibilityBlink::new(period), Some(duration));
    ctx.invincibility.open_window(handle, duration);
    handle
}

//=========================================================================
// Unit Tests
//=========================================================================
