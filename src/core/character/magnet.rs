//=========================================================================
// Attracted Coins
//=========================================================================
//
// Set of pooled coins currently pulled toward the character.
//
// Filled by the magnet power-up, drained by coin pickups. Every tick the
// members move toward the character at constant speed until the physics
// host reports the contact.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::coin::CoinPool;
use crate::core::math::Vec3;
use crate::core::pool::PoolHandle;

//=== AttractedCoins ======================================================

/// Insertion-ordered set of attracted coin handles.
#[derive(Debug, Clone, Default)]
pub struct AttractedCoins {
    coins: Vec<PoolHandle>,
}

impl AttractedCoins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a coin. Returns false if it was already attracted.
    pub fn attract(&mut self, coin: PoolHandle) -> bool {
        if self.contains(coin) {
            return false;
        }
        self.coins.push(coin);
        true
    }

    /// Removes a coin. Returns false if it was not attracted.
    pub fn remove(&mut self, coin: PoolHandle) -> bool {
        match self.coins.iter().position(|&c| c == coin) {
            Some(pos) => {
                self.coins.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, coin: PoolHandle) -> bool {
        self.coins.contains(&coin)
    }

    pub fn iter(&self) -> impl Iterator<Item = PoolHandle> + '_ {
        self.coins.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn clear(&mut self) {
        self.coins.clear();
    }

    //--- follow() ---------------------------------------------------------
    //
    // Moves every attracted coin toward `target` by `speed * dt`.
    // Coins released behind our back (stale handles) are dropped.
    //
    pub fn follow(&mut self, target: Vec3, speed: f32, dt: f32, pool: &mut CoinPool) {
        let max_delta = speed * dt;

        self.coins.retain(|&coin| match pool.get_mut(coin) {
            Some(entity) => {
                entity.transform.position = entity.transform.position.move_towards(target, max_delta);
                true
            }
            None => {
                debug!("Dropping released coin {:?} from magnet set", coin);
                false
            }
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
