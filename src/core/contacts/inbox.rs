//=========================================================================
// Contact Inbox
//=========================================================================
//
// Channel-fed queue of collision events with bounded per-tick draining.
//
// Architecture:
//   physics host ─ Sender<CollisionEvent> ─→ Receiver
//                                              ↓
//                               collect() (≤ MAX_CONTACTS_PER_TICK)
//                                              ↓
//                               take_events() → character dispatcher
//
// The channel itself is unbounded, so reporting never blocks or drops a
// contact. Events left over after the per-tick bound stay queued for the
// next tick, in arrival order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::CollisionEvent;

//=== Constants ===========================================================

/// Upper bound on contacts dispatched in a single tick.
pub const MAX_CONTACTS_PER_TICK: usize = 256;

//=== ContactInbox ========================================================

/// Receives contacts from the host and hands them out tick by tick.
pub struct ContactInbox {
    sender: Sender<CollisionEvent>,
    receiver: Receiver<CollisionEvent>,
    events: Vec<CollisionEvent>,
}

impl ContactInbox {
    /// Creates an inbox whose tick buffer is pre-sized for `capacity`
    /// contacts.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Contact capacity must be positive, got {}", capacity);
        let (sender, receiver) = unbounded();

        Self {
            sender,
            receiver,
            events: Vec::with_capacity(capacity.min(MAX_CONTACTS_PER_TICK)),
        }
    }

    /// Handle the physics host uses to report contacts.
    ///
    /// Senders may live on other threads. Sending never blocks and only
    /// fails if the inbox was dropped.
    pub fn sender(&self) -> Sender<CollisionEvent> {
        self.sender.clone()
    }

    /// Number of contacts waiting in the channel.
    pub fn queued(&self) -> usize {
        self.receiver.len()
    }

    /// Moves pending contacts into the tick buffer (bounded).
    ///
    /// Returns the number of contacts collected this tick.
    pub fn collect(&mut self) -> usize {
        self.events.clear();

        while self.events.len() < MAX_CONTACTS_PER_TICK {
            match self.receiver.try_recv() {
                Ok(event) => self.events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("Contact channel disconnected");
                    break;
                }
            }
        }

        let collected = self.events.len();
        if collected >= MAX_CONTACTS_PER_TICK {
            warn!(
                "Contact backlog: drained {} contacts this tick, {} still queued",
                collected,
                self.receiver.len()
            );
        } else if collected > 0 {
            trace!("Collected {} contacts", collected);
        }

        collected
    }

    /// Contacts collected by the last `collect`.
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Takes ownership of collected contacts, leaving an empty buffer.
    pub fn take_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drops every queued and collected contact.
    pub fn discard(&mut self) -> usize {
        self.events.clear();
        self.receiver.try_iter().count()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contacts::{CoinRef, InstanceId, ObstacleKind};

    fn premium(id: u64) -> CollisionEvent {
        CollisionEvent::Coin(CoinRef::Premium(InstanceId(id)))
    }

    #[test]
    fn collect_handles_empty_queue() {
        let mut inbox = ContactInbox::new(8);

        assert_eq!(inbox.collect(), 0);
        assert!(inbox.events().is_empty());
    }

    #[test]
    fn collect_keeps_arrival_order() {
        let mut inbox = ContactInbox::new(8);
        let tx = inbox.sender();

        tx.send(premium(1)).unwrap();
        tx.send(CollisionEvent::Obstacle {
            instance: InstanceId(2),
            kind: Some(ObstacleKind::AllLane),
        })
        .unwrap();
        tx.send(premium(3)).unwrap();

        assert_eq!(inbox.collect(), 3);
        let events = inbox.take_events();
        assert_eq!(events[0], premium(1));
        assert_eq!(events[2], premium(3));
        assert!(inbox.events().is_empty());
    }

    #[test]
    fn collect_clears_previous_tick() {
        let mut inbox = ContactInbox::new(8);
        let tx = inbox.sender();

        tx.send(premium(1)).unwrap();
        inbox.collect();
        assert_eq!(inbox.events().len(), 1);

        inbox.collect();
        assert!(inbox.events().is_empty());
    }

    #[test]
    fn collect_is_bounded_per_tick() {
        let mut inbox = ContactInbox::new(8);
        let tx = inbox.sender();

        for id in 0..(MAX_CONTACTS_PER_TICK as u64 + 10) {
            tx.send(premium(id)).unwrap();
        }

        assert_eq!(inbox.collect(), MAX_CONTACTS_PER_TICK);
        assert_eq!(inbox.queued(), 10);

        assert_eq!(inbox.collect(), 10);
        assert_eq!(inbox.events()[0], premium(MAX_CONTACTS_PER_TICK as u64));
    }

    #[test]
    fn sends_beyond_capacity_are_kept() {
        let mut inbox = ContactInbox::new(2);
        let tx = inbox.sender();

        for id in 0..200 {
            assert!(tx.try_send(premium(id)).is_ok());
        }

        assert_eq!(inbox.queued(), 200);
        assert_eq!(inbox.collect(), 200);
        assert_eq!(inbox.events()[199], premium(199));
    }

    #[test]
    fn discard_drops_everything() {
        let mut inbox = ContactInbox::new(8);
        let tx = inbox.sender();
        tx.send(premium(1)).unwrap();
        inbox.collect();
        tx.send(premium(2)).unwrap();

        assert_eq!(inbox.discard(), 1);
        assert!(inbox.events().is_empty());
        assert_eq!(inbox.collect(), 0);
    }

    #[test]
    #[should_panic(expected = "Contact capacity must be positive")]
    fn zero_capacity_panics() {
        ContactInbox::new(0);
    }
}
