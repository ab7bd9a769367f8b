//=========================================================================
// Coins
//=========================================================================
//
// Regular coins live in a `CoinPool` and are recycled on pickup.
// Premium coins are spawned per placement by the host and handed back to
// it on pickup; they never enter the pool.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::pool::Pool;

//=== Coin ================================================================

/// Payload carried by every pooled coin entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coin {
    /// Only set by hosts that insert their own payloads; `coin_pool` always
    /// builds regular coins. The magnet skips premium ones.
    pub is_premium: bool,
}

/// Pool of regular coin entities.
pub type CoinPool = Pool<Coin>;

/// Creates an empty regular-coin pool, pre-warmed with `initial_size` coins.
pub fn coin_pool(initial_size: usize) -> CoinPool {
    Pool::with_capacity(Coin { is_premium: false }, initial_size)
}
