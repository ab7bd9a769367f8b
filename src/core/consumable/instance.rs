//=========================================================================
// Consumable Instance
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::{ConsumableDescriptor, ConsumableKind};
use crate::core::tasks::TaskHandle;

//=== ConsumablePhase =====================================================

/// Lifecycle of an activated power-up.
///
/// ```text
/// Idle ──► Starting ──► Active ──► Ending ──► Ended
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumablePhase {
    Idle,
    Starting,
    Active,
    Ending,
    Ended,
}

impl ConsumablePhase {
    pub fn is_terminal(self) -> bool {
        self == Self::Ended
    }

    /// The phase that follows this one. `Ended` stays `Ended`.
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Starting,
            Self::Starting => Self::Active,
            Self::Active => Self::Ending,
            Self::Ending | Self::Ended => Self::Ended,
        }
    }
}

//=== ConsumableInstance ==================================================

/// Runtime state of one activated power-up.
#[derive(Debug, Clone)]
pub struct ConsumableInstance {
    id: u64,
    descriptor: Arc<ConsumableDescriptor>,
    phase: ConsumablePhase,
    countdown: Option<TaskHandle>,

    /// Seconds spent active, mirrored by the countdown routine.
    pub elapsed: f32,
}

impl ConsumableInstance {
    pub fn new(id: u64, descriptor: Arc<ConsumableDescriptor>) -> Self {
        Self {
            id,
            descriptor,
            phase: ConsumablePhase::Idle,
            countdown: None,
            elapsed: 0.0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn descriptor(&self) -> &Arc<ConsumableDescriptor> {
        &self.descriptor
    }

    pub fn kind(&self) -> ConsumableKind {
        self.descriptor.kind
    }

    pub fn phase(&self) -> ConsumablePhase {
        self.phase
    }

    /// Seconds left before expiry.
    pub fn remaining(&self) -> f32 {
        (self.descriptor.duration - self.elapsed).max(0.0)
    }

    /// Moves to `phase`, which must be the current phase or the next one.
    pub(crate) fn set_phase(&mut self, phase: ConsumablePhase) {
        debug_assert!(
            phase == self.phase || phase == self.phase.next(),
            "Illegal consumable transition {:?} -> {:?}",
            self.phase,
            phase
        );
        self.phase = phase;
    }

    pub(crate) fn countdown(&self) -> Option<TaskHandle> {
        self.countdown
    }

    pub(crate) fn set_countdown(&mut self, handle: Option<TaskHandle>) {
        self.countdown = handle;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
