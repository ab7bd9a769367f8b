//=========================================================================
// Entity Pool
//=========================================================================
//
// Reuse cache for frequently spawned entities (coins).
//
// Architecture:
//   acquire() ──► free.pop() ──► reuse slot   (LIFO, most recently freed)
//                    └─ empty ──► clone prototype into a new slot
//   release() ──► detach + deactivate ──► free.push()
//
// Slots are never removed: the pool grows on demand and keeps its memory
// for its whole lifetime. Handles carry a generation so a handle that
// outlived its release is recognised as stale instead of aliasing the
// next occupant of the slot.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::math::{Quat, Transform, Vec3};

//=== PoolHandle ==========================================================

/// Generational reference to a pooled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    /// Slot index inside the pool. Stable across reuse of the slot.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

//=== Attachment ==========================================================

/// Parent an in-use entity is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Attached to the player character (magnet pull).
    Character,

    /// Attached to a host-managed object such as a track segment.
    Host(u64),
}

//=== PooledEntity ========================================================

/// A pooled value plus the bookkeeping the pool applies on reuse.
#[derive(Debug, Clone)]
pub struct PooledEntity<T> {
    pub value: T,
    pub transform: Transform,
    pub parent: Option<Attachment>,
    active: bool,
}

impl<T> PooledEntity<T> {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

//=== PoolError ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("double release of pooled entity {0:?}")]
    DoubleRelease(PoolHandle),

    #[error("handle {0:?} does not belong to this pool")]
    UnknownHandle(PoolHandle),
}

//=== Pool ================================================================

struct Slot<T> {
    entity: PooledEntity<T>,
    generation: u32,
    in_use: bool,
}

/// Grow-only pool of reusable entities cloned from a prototype.
pub struct Pool<T: Clone> {
    prototype: T,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T: Clone> Pool<T> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty pool. Entities are constructed lazily on acquire.
    pub fn new(prototype: T) -> Self {
        Self::with_capacity(prototype, 0)
    }

    /// Creates a pool pre-warmed with `initial_size` inactive entities.
    pub fn with_capacity(prototype: T, initial_size: usize) -> Self {
        let mut pool = Self {
            prototype,
            slots: Vec::with_capacity(initial_size),
            free: Vec::with_capacity(initial_size),
        };

        for _ in 0..initial_size {
            let index = pool.construct();
            pool.free.push(index);
        }

        pool
    }

    //--- Allocation -------------------------------------------------------

    /// Returns an entity at the given position and rotation.
    ///
    /// Reuses the most recently released entity if any is free, otherwise
    /// constructs a new one from the prototype.
    pub fn acquire(&mut self, position: Vec3, rotation: Quat) -> PoolHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => self.construct(),
        };

        let slot = &mut self.slots[index as usize];
        slot.in_use = true;
        slot.entity.active = true;
        slot.entity.transform = Transform::new(position, rotation);

        PoolHandle { index, generation: slot.generation }
    }

    /// Acquires an entity at the origin with no rotation.
    pub fn acquire_default(&mut self) -> PoolHandle {
        self.acquire(Vec3::ZERO, Quat::IDENTITY)
    }

    /// Returns an in-use entity to the free list.
    ///
    /// Releasing a handle that is not in use is a programming error: it
    /// panics in debug builds and is logged and ignored in release builds.
    pub fn release(&mut self, handle: PoolHandle) -> Result<(), PoolError> {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            error!("Release of unknown pool handle {:?}", handle);
            return Err(PoolError::UnknownHandle(handle));
        };

        if !slot.in_use || slot.generation != handle.generation {
            debug_assert!(false, "double release of pooled entity {:?}", handle);
            error!("Ignoring double release of pooled entity {:?}", handle);
            return Err(PoolError::DoubleRelease(handle));
        }

        slot.entity.parent = None;
        slot.entity.active = false;
        slot.in_use = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);

        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if `handle` refers to an entity currently in use.
    pub fn is_in_use(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .map(|slot| slot.in_use && slot.generation == handle.generation)
            .unwrap_or(false)
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&PooledEntity<T>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.in_use && slot.generation == handle.generation)
            .map(|slot| &slot.entity)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut PooledEntity<T>> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.in_use && slot.generation == handle.generation)
            .map(|slot| &mut slot.entity)
    }

    /// Iterates over every entity currently in use.
    pub fn iter_in_use(&self) -> impl Iterator<Item = (PoolHandle, &PooledEntity<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.in_use)
            .map(|(index, slot)| {
                let handle = PoolHandle { index: index as u32, generation: slot.generation };
                (handle, &slot.entity)
            })
    }

    /// Total number of entities ever constructed by this pool.
    pub fn constructed(&self) -> usize {
        self.slots.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn in_use_len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn construct(&mut self) -> u32 {
        let index = self.slots.len() as u32;
        debug!("Pool grew to {} entities", index + 1);

        self.slots.push(Slot {
            entity: PooledEntity {
                value: self.prototype.clone(),
                transform: Transform::default(),
                parent: None,
                active: false,
            },
            generation: 0,
            in_use: false,
        });

        index
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
