//=========================================================================
// Signal Bus
//=========================================================================
//
// Typed outbox of fire-and-forget gameplay signals.
//
// Architecture:
//   dispatcher / effects → emit<S>() → HashMap<TypeId, Vec<S>>
//                                           ↓
//   host collaborators  ← read<S>() / drain<S>() after the tick
//                                           ↓
//   session ─────────────→ clear_all() at the next tick boundary
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

use log::error;

//=== Internal Dependencies ===============================================

use super::queue::SignalQueue;

//=== Signal Trait ========================================================

/// Marker for types that can travel on the [`SignalBus`].
pub trait Signal: Send + 'static {}

impl<T: Send + 'static> Signal for T {}

//=== SignalBus ===========================================================

/// One queue per signal type, cleared at tick boundaries.
#[derive(Default)]
pub struct SignalBus {
    queues: HashMap<TypeId, Box<dyn SignalQueue>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Emission ---------------------------------------------------------

    /// Queues a signal for collaborators to pick up after the tick.
    pub fn emit<S: Signal>(&mut self, signal: S) {
        let queue = self
            .queues
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Box::new(Vec::<S>::new()));

        match queue.as_any_mut().downcast_mut::<Vec<S>>() {
            Some(queue) => queue.push(signal),
            None => error!("Signal queue type mismatch for {}", std::any::type_name::<S>()),
        }
    }

    //--- Consumption ------------------------------------------------------

    /// Signals of type `S` emitted since the last clear.
    pub fn read<S: Signal>(&self) -> &[S] {
        self.queue::<S>().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Takes every queued signal of type `S`, leaving the queue empty.
    pub fn drain<S: Signal>(&mut self) -> Vec<S> {
        self.queues
            .get_mut(&TypeId::of::<S>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<S>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn count<S: Signal>(&self) -> usize {
        self.queue::<S>().map(Vec::len).unwrap_or(0)
    }

    pub fn has<S: Signal>(&self) -> bool {
        self.count::<S>() > 0
    }

    //--- Tick Boundary ----------------------------------------------------

    /// Clears signals of type `S`.
    pub fn clear<S: Signal>(&mut self) {
        if let Some(queue) = self.queues.get_mut(&TypeId::of::<S>()) {
            queue.reset();
        }
    }

    /// Clears every queue, keeping entries and capacity for the next tick.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.reset();
        }
    }

    /// Total number of queued signals across all types.
    pub fn pending(&self) -> usize {
        self.queues.values().map(|q| q.pending()).sum()
    }

    //--- Internal Helpers -------------------------------------------------

    fn queue<S: Signal>(&self) -> Option<&Vec<S>> {
        self.queues
            .get(&TypeId::of::<S>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<S>>())
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signals::{AnimationTrigger, Cue};

    #[test]
    fn empty_bus_reads_nothing() {
        let bus = SignalBus::new();
        assert!(bus.read::<Cue>().is_empty());
        assert!(!bus.has::<Cue>());
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn signals_keep_emission_order() {
        let mut bus = SignalBus::new();
        bus.emit(Cue::Coin);
        bus.emit(Cue::Hit);
        bus.emit(Cue::Coin);

        assert_eq!(bus.read::<Cue>(), &[Cue::Coin, Cue::Hit, Cue::Coin]);
    }

    #[test]
    fn types_are_queued_separately() {
        let mut bus = SignalBus::new();
        bus.emit(Cue::Death);
        bus.emit(AnimationTrigger::Hit);

        assert_eq!(bus.count::<Cue>(), 1);
        assert_eq!(bus.count::<AnimationTrigger>(), 1);
        assert_eq!(bus.pending(), 2);
    }

    #[test]
    fn read_is_repeatable_until_cleared() {
        let mut bus = SignalBus::new();
        bus.emit(Cue::Premium);

        assert_eq!(bus.read::<Cue>(), &[Cue::Premium]);
        assert_eq!(bus.read::<Cue>(), &[Cue::Premium]);

        bus.clear::<Cue>();
        assert!(bus.read::<Cue>().is_empty());
    }

    #[test]
    fn drain_takes_ownership() {
        let mut bus = SignalBus::new();
        bus.emit(Cue::Coin);
        bus.emit(Cue::Coin);

        assert_eq!(bus.drain::<Cue>(), vec![Cue::Coin, Cue::Coin]);
        assert!(!bus.has::<Cue>());
        assert!(bus.drain::<AnimationTrigger>().is_empty());
    }

    #[test]
    fn clear_all_empties_every_type() {
        let mut bus = SignalBus::new();
        bus.emit(Cue::Hit);
        bus.emit(AnimationTrigger::Hit);

        bus.clear_all();
        assert_eq!(bus.pending(), 0);

        bus.emit(Cue::Coin);
        assert_eq!(bus.count::<Cue>(), 1);
    }
}
