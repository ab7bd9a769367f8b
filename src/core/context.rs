//=========================================================================
// Runtime Context
//=========================================================================
//
// Per-run gameplay state shared by the collision dispatcher, the
// consumable state machine and the timed routines.
//
// Contains:
// - currency counters (coins, premium)
// - lives and maximum lives
// - invincibility (explicit override + timed window + blink value)
// - the active consumable slot
// - score and distance reported by the track
//
// Lives for the duration of one run and is reset at run start.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::consumable::ConsumableInstance;
use crate::core::tasks::TaskHandle;

//=== Invincibility =======================================================

/// Character invincibility state.
///
/// Two orthogonal sources: a timed window (started after an obstacle hit
/// or by a power-up, closed by its blink routine) and an explicit override
/// that forces invincibility while on. Effective invincibility is the OR
/// of both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invincibility {
    explicit: bool,
    timed_remaining: f32,
    window: Option<TaskHandle>,
    blink: f32,
}

impl Invincibility {
    /// Returns true if either the timed window or the explicit override is on.
    pub fn is_effective(&self) -> bool {
        self.explicit || self.timed_remaining > 0.0
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn set_explicit(&mut self, on: bool) {
        self.explicit = on;
    }

    /// Seconds left in the timed window, 0 when closed.
    pub fn timed_remaining(&self) -> f32 {
        self.timed_remaining
    }

    /// Routine currently driving the timed window.
    pub fn window(&self) -> Option<TaskHandle> {
        self.window
    }

    /// Cosmetic blink intensity (1.0 visible, 0.0 neutral).
    pub fn blink(&self) -> f32 {
        self.blink
    }

    pub(crate) fn open_window(&mut self, owner: TaskHandle, duration: f32) {
        self.window = Some(owner);
        self.timed_remaining = duration;
        self.blink = 1.0;
    }

    pub(crate) fn set_remaining(&mut self, owner: TaskHandle, remaining: f32) {
        if self.window == Some(owner) {
            self.timed_remaining = remaining.max(0.0);
        }
    }

    pub(crate) fn set_blink(&mut self, owner: TaskHandle, value: f32) {
        if self.window == Some(owner) {
            self.blink = value;
        }
    }

    /// Closes the window if `owner` still drives it.
    pub(crate) fn close_window(&mut self, owner: TaskHandle) {
        if self.window == Some(owner) {
            self.window = None;
            self.timed_remaining = 0.0;
            self.blink = 0.0;
        }
    }
}

//=== RuntimeContext ======================================================

/// Gameplay counters and flags for the current run.
///
/// Read by UI and telemetry collaborators; mutated only on the tick
/// thread by the dispatcher, consumable effects and timed routines.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    pub coins: u32,
    pub premium: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub score: u32,
    pub distance: f32,
    pub is_tutorial: bool,
    pub invincibility: Invincibility,
    pub active_consumable: Option<ConsumableInstance>,
}

impl RuntimeContext {
    /// Creates a fresh context with full lives.
    pub fn new(max_lives: u32) -> Self {
        Self {
            coins: 0,
            premium: 0,
            lives: max_lives,
            max_lives,
            score: 0,
            distance: 0.0,
            is_tutorial: false,
            invincibility: Invincibility::default(),
            active_consumable: None,
        }
    }

    /// Resets every per-run value, keeping the configured maximum lives.
    pub fn reset(&mut self, is_tutorial: bool) {
        *self = Self::new(self.max_lives);
        self.is_tutorial = is_tutorial;
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_effective()
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tasks::TaskHandle;

    #[test]
    fn new_context_has_full_lives() {
        let ctx = RuntimeContext::new(3);
        assert_eq!(ctx.lives, 3);
        assert_eq!(ctx.max_lives, 3);
        assert!(!ctx.is_invincible());
        assert!(ctx.active_consumable.is_none());
    }

    #[test]
    fn effective_invincibility_is_or_of_sources() {
        let mut inv = Invincibility::default();
        assert!(!inv.is_effective());

        inv.set_explicit(true);
        assert!(inv.is_effective());
        inv.set_explicit(false);
        assert!(!inv.is_effective());

        let owner = TaskHandle::from_raw(1);
        inv.open_window(owner, 2.0);
        assert!(inv.is_effective());

        // Dropping the override leaves the timed window in charge.
        inv.set_explicit(true);
        inv.set_explicit(false);
        assert!(inv.is_effective());

        inv.close_window(owner);
        assert!(!inv.is_effective());
    }

    #[test]
    fn stale_owner_cannot_close_window() {
        let mut inv = Invincibility::default();
        let old = TaskHandle::from_raw(1);
        let new = TaskHandle::from_raw(2);

        inv.open_window(old, 2.0);
        inv.open_window(new, 5.0);
        inv.close_window(old);
        inv.set_remaining(old, 0.0);

        assert_eq!(inv.window(), Some(new));
        assert_eq!(inv.timed_remaining(), 5.0);
    }

    #[test]
    fn reset_restores_lives_and_clears_counters() {
        let mut ctx = RuntimeContext::new(3);
        ctx.coins = 40;
        ctx.lives = 1;
        ctx.invincibility.set_explicit(true);

        ctx.reset(true);
        assert_eq!(ctx.coins, 0);
        assert_eq!(ctx.lives, 3);
        assert!(ctx.is_tutorial);
        assert!(!ctx.is_invincible());
    }
}
