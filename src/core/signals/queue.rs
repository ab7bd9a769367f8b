//=========================================================================
// Signal Queue Trait
//=========================================================================
//
// Type-erased view over one `Vec<S>` of signals, so the bus can keep
// queues of unrelated signal types in a single map and clear them all at
// the tick boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::Signal;

//=========================================================================

/// Type-erased signal storage.
pub(super) trait SignalQueue: Send {
    /// Drops every queued signal, keeping the allocation.
    fn reset(&mut self);

    /// Number of queued signals.
    fn pending(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================

impl<S: Signal> SignalQueue for Vec<S> {
    fn reset(&mut self) {
        self.clear();
    }

    fn pending(&self) -> usize {
        self.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
