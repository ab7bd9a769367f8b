//=========================================================================
// Consumable Effects
//=========================================================================
//
// Type-specific behaviour plugged into the consumable state machine.
//
// Hooks, in lifecycle order:
//   can_be_used() ─ false ─► on_unusable()
//        │ true
//   started() ──► tick() every tick while active ──► ended()
//
// Every hook has an empty default, so an effect only overrides what it
// needs.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::ConsumableDescriptor;
use crate::core::character::AttractedCoins;
use crate::core::coin::CoinPool;
use crate::core::context::RuntimeContext;
use crate::core::math::{Transform, Vec3};
use crate::core::pool::{Attachment, PoolHandle};
use crate::core::tasks::{begin_invincibility, TaskRunner};

//=== EffectContext =======================================================

/// Everything an effect may touch while running.
pub struct EffectContext<'a> {
    pub runtime: &'a mut RuntimeContext,
    pub tasks: &'a mut TaskRunner<RuntimeContext>,
    pub coins: &'a mut CoinPool,
    pub attracted: &'a mut AttractedCoins,

    /// Character transform at the time of the call.
    pub character: Transform,
}

//=== ConsumableEffect Trait ==============================================

/// Behaviour of one consumable kind.
pub trait ConsumableEffect: Send {
    /// Whether the pickup may activate in the current state.
    fn can_be_used(&self, _runtime: &RuntimeContext) -> bool {
        true
    }

    /// Called instead of activation when `can_be_used` returned false.
    fn on_unusable(&mut self, _ctx: &mut EffectContext<'_>) {}

    /// One-time activation effect.
    fn started(&mut self, _descriptor: &ConsumableDescriptor, _ctx: &mut EffectContext<'_>) {}

    /// Per-tick effect while active.
    fn tick(&mut self, _ctx: &mut EffectContext<'_>) {}

    /// One-time deactivation effect.
    fn ended(&mut self, _ctx: &mut EffectContext<'_>) {}
}

//=== CoinMagnet ==========================================================

/// Attracts regular coins inside a box around the character.
pub struct CoinMagnet {
    half_extents: Vec3,
    found: Vec<PoolHandle>,
}

impl CoinMagnet {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            found: Vec::with_capacity(20),
        }
    }
}

impl ConsumableEffect for CoinMagnet {
    fn tick(&mut self, ctx: &mut EffectContext<'_>) {
        let area = ctx.character;
        let half_extents = self.half_extents;
        let attracted = &*ctx.attracted;

        self.found.clear();
        self.found.extend(
            ctx.coins
                .iter_in_use()
                .filter(|(handle, entity)| {
                    !entity.value.is_premium
                        && !attracted.contains(*handle)
                        && area.box_contains(half_extents, entity.transform.position)
                })
                .map(|(handle, _)| handle),
        );

        for &coin in &self.found {
            if let Some(entity) = ctx.coins.get_mut(coin) {
                entity.parent = Some(Attachment::Character);
            }
            ctx.attracted.attract(coin);
        }

        if !self.found.is_empty() {
            debug!("Magnet attracted {} coins", self.found.len());
        }
    }
}

//=== ExtraLife ===========================================================

/// Grants a life; pays out currency instead when lives are full.
pub struct ExtraLife {
    fallback_coins: u32,
}

impl ExtraLife {
    pub fn new(fallback_coins: u32) -> Self {
        Self { fallback_coins }
    }
}

impl ConsumableEffect for ExtraLife {
    fn can_be_used(&self, runtime: &RuntimeContext) -> bool {
        runtime.lives < runtime.max_lives
    }

    fn on_unusable(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.runtime.coins += self.fallback_coins;
    }

    fn started(&mut self, _descriptor: &ConsumableDescriptor, ctx: &mut EffectContext<'_>) {
        if ctx.runtime.lives < ctx.runtime.max_lives {
            ctx.runtime.lives += 1;
        } else {
            ctx.runtime.coins += self.fallback_coins;
        }
    }
}

//=== Invincibility =======================================================

/// Keeps the explicit override on for the whole activation.
///
/// The timed window started here only drives the blink; the override is
/// what keeps obstacle hits from landing once a shorter window ends.
pub struct Invincibility {
    blink_period: f32,
}

impl Invincibility {
    pub fn new(blink_period: f32) -> Self {
        Self { blink_period }
    }
}

impl ConsumableEffect for Invincibility {
    fn started(&mut self, descriptor: &ConsumableDescriptor, ctx: &mut EffectContext<'_>) {
        begin_invincibility(ctx.tasks, ctx.runtime, descriptor.duration, self.blink_period);
        ctx.runtime.invincibility.set_explicit(true);
    }

    fn tick(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.runtime.invincibility.set_explicit(true);
    }

    fn ended(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.runtime.invincibility.set_explicit(false);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coin::coin_pool;
    use crate::core::consumable::ConsumableKind;
    use crate::core::math::Quat;

    struct Fixture {
        runtime: RuntimeContext,
        tasks: TaskRunner<RuntimeContext>,
        coins: CoinPool,
        attracted: AttractedCoins,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                runtime: RuntimeContext::new(3),
                tasks: TaskRunner::new(),
                coins: coin_pool(0),
                attracted: AttractedCoins::new(),
            }
        }

        fn ctx(&mut self) -> EffectContext<'_> {
            EffectContext {
                runtime: &mut self.runtime,
                tasks: &mut self.tasks,
                coins: &mut self.coins,
                attracted: &mut self.attracted,
                character: Transform::default(),
            }
        }
    }

    #[test]
    fn magnet_attracts_coins_in_box_once() {
        let mut fx = Fixture::new();
        let near = fx.coins.acquire(Vec3::new(12.0, 0.0, 0.5), Quat::IDENTITY);
        let far = fx.coins.acquire(Vec3::new(0.0, 0.0, 30.0), Quat::IDENTITY);

        let mut magnet = CoinMagnet::new(Vec3::new(20.0, 1.0, 1.0));
        magnet.tick(&mut fx.ctx());
        magnet.tick(&mut fx.ctx());

        assert_eq!(fx.attracted.iter().collect::<Vec<_>>(), vec![near]);
        assert_eq!(fx.coins.get(near).unwrap().parent, Some(Attachment::Character));
        assert_eq!(fx.coins.get(far).unwrap().parent, None);
    }

    #[test]
    fn magnet_ignores_premium_coins() {
        let mut fx = Fixture::new();
        let coin = fx.coins.acquire_default();
        fx.coins.get_mut(coin).unwrap().value.is_premium = true;

        CoinMagnet::new(Vec3::new(20.0, 1.0, 1.0)).tick(&mut fx.ctx());
        assert!(fx.attracted.is_empty());
    }

    #[test]
    fn extra_life_below_max_grants_life() {
        let mut fx = Fixture::new();
        fx.runtime.lives = 2;
        let descriptor = ConsumableKind::ExtraLife.default_descriptor();

        let mut effect = ExtraLife::new(10);
        assert!(effect.can_be_used(&fx.runtime));
        effect.started(&descriptor, &mut fx.ctx());

        assert_eq!(fx.runtime.lives, 3);
        assert_eq!(fx.runtime.coins, 0);
    }

    #[test]
    fn extra_life_at_max_pays_currency() {
        let mut fx = Fixture::new();
        let mut effect = ExtraLife::new(10);

        assert!(!effect.can_be_used(&fx.runtime));
        effect.on_unusable(&mut fx.ctx());

        assert_eq!(fx.runtime.lives, 3);
        assert_eq!(fx.runtime.coins, 10);
    }

    #[test]
    fn invincibility_sets_and_clears_override() {
        let mut fx = Fixture::new();
        let descriptor = ConsumableKind::Invincibility.default_descriptor();
        let mut effect = Invincibility::new(0.1);

        effect.started(&descriptor, &mut fx.ctx());
        assert!(fx.runtime.invincibility.is_explicit());
        assert_eq!(fx.runtime.invincibility.timed_remaining(), descriptor.duration);

        effect.ended(&mut fx.ctx());
        assert!(!fx.runtime.invincibility.is_explicit());
        // The timed window keeps running on its own.
        assert!(fx.runtime.is_invincible());
    }
}
