//=========================================================================
// Consumable Countdown
//=========================================================================
//
// Tracks the duration of the active consumable.
//
// Mirrors the runner's elapsed time into the matching instance each tick
// and moves it to `Ending` once the descriptor duration is reached. The
// consumable system finishes the instance later in the same tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Routine, RoutineClock, RoutineStatus};
use crate::core::consumable::ConsumablePhase;
use crate::core::context::RuntimeContext;

//=== ConsumableCountdown =================================================

/// Duration countdown bound to one consumable instance.
#[derive(Debug, Clone, Copy)]
pub struct ConsumableCountdown {
    instance_id: u64,
}

impl ConsumableCountdown {
    pub fn new(instance_id: u64) -> Self {
        Self { instance_id }
    }
}

impl Routine<RuntimeContext> for ConsumableCountdown {
    fn name(&self) -> &'static str {
        "consumable_countdown"
    }

    fn step(&mut self, clock: &RoutineClock, ctx: &mut RuntimeContext) -> RoutineStatus {
        let Some(instance) = ctx
            .active_consumable
            .as_mut()
            .filter(|i| i.id() == self.instance_id && i.phase() == ConsumablePhase::Active)
        else {
            return RoutineStatus::Complete;
        };

        if clock.cancelled {
            return RoutineStatus::Complete;
        }

        instance.elapsed = clock.elapsed;

        if clock.is_expired() {
            debug!("Consumable '{}' expired after {:.2}s", instance.descriptor().name, clock.elapsed);
            instance.set_phase(ConsumablePhase::Ending);
            return RoutineStatus::Complete;
        }

        RoutineStatus::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
