//=========================================================================
// Character Collider
//=========================================================================
//
// Dispatches contacts between the player character and scene objects.
//
// Architecture:
//   CollisionEvent ─► on_contact()
//                       ├─ Coin     → pool release / host release, currency, cue
//                       ├─ Obstacle → lives, hit feedback, invincibility or death
//                       └─ Powerup  → ConsumableSystem::resolve_contact()
//
// Results leave through the SignalBus (cues, animation triggers, host
// commands, death snapshot) and through RuntimeContext.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{AttractedCoins, ColliderShape};
use crate::core::coin::CoinPool;
use crate::core::config::SessionConfig;
use crate::core::consumable::{ConsumableDatabase, ConsumableKind, ConsumableSystem, EffectContext};
use crate::core::contacts::{CoinRef, CollisionEvent, InstanceId, ObstacleKind};
use crate::core::context::RuntimeContext;
use crate::core::math::Transform;
use crate::core::pool::PoolHandle;
use crate::core::signals::{AnimationTrigger, Cue, DeathSnapshot, HostCommand, SignalBus};
use crate::core::tasks::{begin_invincibility, TaskRunner};

//=== ContactEnv ==========================================================

/// Services a contact may touch, borrowed from the session for one call.
pub struct ContactEnv<'a> {
    pub runtime: &'a mut RuntimeContext,
    pub tasks: &'a mut TaskRunner<RuntimeContext>,
    pub coins: &'a mut CoinPool,
    pub consumables: &'a mut ConsumableSystem,
    pub database: &'a ConsumableDatabase,
    pub signals: &'a mut SignalBus,
}

//=== CharacterCollider ===================================================

/// Player character as seen by the interaction engine.
pub struct CharacterCollider {
    transform: Transform,
    shape: ColliderShape,
    attracted: AttractedCoins,

    character_name: String,
    theme_name: String,

    tutorial_hit_obstacle: bool,
    death: Option<DeathSnapshot>,

    hit_invincibility: f32,
    blink_period: f32,
    magnet_speed: f32,
}

impl CharacterCollider {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            transform: Transform::default(),
            shape: ColliderShape::default(),
            attracted: AttractedCoins::new(),
            character_name: config.character_name.clone(),
            theme_name: config.theme_name.clone(),
            tutorial_hit_obstacle: false,
            death: None,
            hit_invincibility: config.hit_invincibility_secs,
            blink_period: config.blink_period,
            magnet_speed: config.magnet_speed,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn slide(&mut self, sliding: bool) {
        self.shape.slide(sliding);
    }

    pub fn attracted(&self) -> &AttractedCoins {
        &self.attracted
    }

    pub fn tutorial_hit_obstacle(&self) -> bool {
        self.tutorial_hit_obstacle
    }

    pub fn set_tutorial_hit_obstacle(&mut self, hit: bool) {
        self.tutorial_hit_obstacle = hit;
    }

    /// Snapshot recorded when the last life was lost.
    pub fn death(&self) -> Option<&DeathSnapshot> {
        self.death.as_ref()
    }

    /// Clears per-run state: attracted coins, tutorial flag, death record
    /// and slide state.
    pub fn reset(&mut self) {
        self.attracted.clear();
        self.tutorial_hit_obstacle = false;
        self.death = None;
        self.shape.slide(false);
    }

    /// Bundles the character's share of an effect context with the
    /// session services.
    pub(crate) fn effect_context<'a>(
        &'a mut self,
        runtime: &'a mut RuntimeContext,
        tasks: &'a mut TaskRunner<RuntimeContext>,
        coins: &'a mut CoinPool,
    ) -> EffectContext<'a> {
        EffectContext {
            runtime,
            tasks,
            coins,
            attracted: &mut self.attracted,
            character: self.transform,
        }
    }

    //--- Per Tick ---------------------------------------------------------

    /// Pulls attracted coins toward the character.
    pub fn follow_attracted(&mut self, dt: f32, coins: &mut CoinPool) {
        self.attracted
            .follow(self.transform.position, self.magnet_speed, dt, coins);
    }

    //=== Contact Dispatch ================================================

    /// Handles one contact. Once the last life is lost every further
    /// contact is ignored, so the death snapshot stays final.
    pub fn on_contact(&mut self, event: CollisionEvent, env: &mut ContactEnv<'_>) {
        if env.runtime.is_dead() {
            debug!("{:?} contact ignored after death: {:?}", event.category(), event);
            return;
        }

        match event {
            CollisionEvent::Coin(coin) => self.collect_coin(coin, env),
            CollisionEvent::Obstacle { instance, kind } => self.hit_obstacle(instance, kind, env),
            CollisionEvent::Powerup { instance, kind } => self.pick_up_powerup(instance, kind, env),
        }
    }

    //--- Coins ------------------------------------------------------------

    fn collect_coin(&mut self, coin: CoinRef, env: &mut ContactEnv<'_>) {
        match coin {
            CoinRef::Premium(instance) => {
                env.signals.emit(HostCommand::ReleaseInstance(instance));
                env.runtime.premium += 1;
                env.signals.emit(Cue::Premium);
            }
            CoinRef::Pooled(handle) => {
                self.attracted.remove(handle);
                self.collect_pooled_coin(handle, env);
            }
        }
    }

    fn collect_pooled_coin(&mut self, handle: PoolHandle, env: &mut ContactEnv<'_>) {
        if !env.coins.is_in_use(handle) {
            debug_assert!(false, "contact with released coin {:?}", handle);
            error!("Contact with released coin {:?} ignored", handle);
            return;
        }

        if let Err(e) = env.coins.release(handle) {
            error!("Failed to release coin: {}", e);
            return;
        }

        env.runtime.coins += 1;
        env.signals.emit(Cue::Coin);
    }

    //--- Obstacles --------------------------------------------------------

    fn hit_obstacle(
        &mut self,
        instance: InstanceId,
        kind: Option<ObstacleKind>,
        env: &mut ContactEnv<'_>,
    ) {
        if env.runtime.is_invincible() {
            debug!("Obstacle {:?} ignored while invincible", instance);
            return;
        }

        env.signals.emit(HostCommand::StopMoving);
        env.signals.emit(HostCommand::DisableCollider(instance));

        match kind {
            Some(_) => env.signals.emit(HostCommand::ImpactObstacle(instance)),
            None => env.signals.emit(HostCommand::ReleaseInstance(instance)),
        }

        if env.runtime.is_tutorial {
            self.tutorial_hit_obstacle = true;
        } else {
            env.runtime.lives -= 1;
        }

        env.signals.emit(AnimationTrigger::Hit);

        if env.runtime.lives > 0 {
            env.signals.emit(Cue::Hit);
            begin_invincibility(env.tasks, env.runtime, self.hit_invincibility, self.blink_period);
            debug!("Hit by {:?}, {} lives left", instance, env.runtime.lives);
        } else {
            self.record_death(kind, env);
        }
    }

    fn record_death(&mut self, obstacle: Option<ObstacleKind>, env: &mut ContactEnv<'_>) {
        env.signals.emit(Cue::Death);

        let snapshot = DeathSnapshot {
            character: self.character_name.clone(),
            obstacle,
            theme: self.theme_name.clone(),
            coins: env.runtime.coins,
            premium: env.runtime.premium,
            score: env.runtime.score,
            distance: env.runtime.distance,
        };

        info!(
            "{} died on {} (score {}, distance {:.1})",
            snapshot.character,
            obstacle.map_or_else(|| String::from("unknown obstacle"), |k| k.to_string()),
            snapshot.score,
            snapshot.distance
        );

        env.signals.emit(snapshot.clone());
        self.death = Some(snapshot);
    }

    //--- Power-ups --------------------------------------------------------

    fn pick_up_powerup(
        &mut self,
        instance: InstanceId,
        kind: ConsumableKind,
        env: &mut ContactEnv<'_>,
    ) {
        let Some(descriptor) = env.database.get(kind) else {
            warn!("No descriptor for {} pickup {:?}, skipped", kind, instance);
            return;
        };

        let outcome = {
            let mut ctx = self.effect_context(env.runtime, env.tasks, env.coins);
            env.consumables.resolve_contact(descriptor, &mut ctx)
        };
        debug!("Pickup {:?} ({}) resolved as {:?}", instance, kind, outcome);

        if outcome.had_effect() {
            env.signals.emit(Cue::Powerup);
        }
        env.signals.emit(HostCommand::ReleaseInstance(instance));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coin::coin_pool;
    use crate::core::consumable::{ConsumablePhase, OverlapPolicy};
    use crate::core::contacts::ContactCategory;
    use crate::core::math::{Quat, Vec3};

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        character: CharacterCollider,
        runtime: RuntimeContext,
        tasks: TaskRunner<RuntimeContext>,
        coins: CoinPool,
        consumables: ConsumableSystem,
        database: ConsumableDatabase,
        signals: SignalBus,
    }

    impl Fixture {
        fn new() -> Self {
            let config = SessionConfig::default();
            Self {
                character: CharacterCollider::new(&config),
                runtime: RuntimeContext::new(config.max_lives),
                tasks: TaskRunner::new(),
                coins: coin_pool(0),
                consumables: ConsumableSystem::with_builtin_effects(
                    OverlapPolicy::Ignore,
                    config.magnet_half_extents,
                    config.life_fallback_coins,
                    config.blink_period,
                ),
                database: ConsumableDatabase::builtin(),
                signals: SignalBus::new(),
            }
        }

        fn contact(&mut self, event: CollisionEvent) {
            let mut env = ContactEnv {
                runtime: &mut self.runtime,
                tasks: &mut self.tasks,
                coins: &mut self.coins,
                consumables: &mut self.consumables,
                database: &self.database,
                signals: &mut self.signals,
            };
            self.character.on_contact(event, &mut env);
        }

        fn advance(&mut self, dt: f32) {
            self.tasks.advance(dt, &mut self.runtime);
        }
    }

    fn obstacle(id: u64) -> CollisionEvent {
        CollisionEvent::Obstacle {
            instance: InstanceId(id),
            kind: Some(ObstacleKind::SimpleBarricade),
        }
    }

    //--- Coins ------------------------------------------------------------

    #[test]
    fn pooled_coin_is_released_and_counted() {
        let mut fx = Fixture::new();
        let coin = fx.coins.acquire(Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY);

        fx.contact(CollisionEvent::Coin(CoinRef::Pooled(coin)));

        assert_eq!(fx.runtime.coins, 1);
        assert!(!fx.coins.is_in_use(coin));
        assert_eq!(fx.coins.free_len(), 1);
        assert_eq!(fx.signals.read::<Cue>(), &[Cue::Coin]);
    }

    #[test]
    fn attracted_coin_leaves_the_set_on_pickup() {
        let mut fx = Fixture::new();
        let kept = fx.coins.acquire_default();
        let picked = fx.coins.acquire_default();
        fx.character.attracted.attract(kept);
        fx.character.attracted.attract(picked);

        fx.contact(CollisionEvent::Coin(CoinRef::Pooled(picked)));

        assert!(!fx.character.attracted().contains(picked));
        assert!(fx.character.attracted().contains(kept));
    }

    #[test]
    fn premium_coin_goes_back_to_host() {
        let mut fx = Fixture::new();

        fx.contact(CollisionEvent::Coin(CoinRef::Premium(InstanceId(42))));

        assert_eq!(fx.runtime.premium, 1);
        assert_eq!(fx.runtime.coins, 0);
        assert_eq!(fx.coins.constructed(), 0);
        assert_eq!(
            fx.signals.read::<HostCommand>(),
            &[HostCommand::ReleaseInstance(InstanceId(42))]
        );
        assert_eq!(fx.signals.read::<Cue>(), &[Cue::Premium]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "contact with released coin")]
    fn released_coin_contact_panics_in_debug() {
        let mut fx = Fixture::new();
        let coin = fx.coins.acquire_default();
        fx.coins.release(coin).unwrap();

        fx.contact(CollisionEvent::Coin(CoinRef::Pooled(coin)));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn released_coin_contact_is_ignored_in_release() {
        let mut fx = Fixture::new();
        let coin = fx.coins.acquire_default();
        fx.coins.release(coin).unwrap();

        fx.contact(CollisionEvent::Coin(CoinRef::Pooled(coin)));

        assert_eq!(fx.runtime.coins, 0);
        assert_eq!(fx.coins.free_len(), 1);
    }

    //--- Obstacles --------------------------------------------------------

    #[test]
    fn hit_costs_a_life_and_opens_window() {
        let mut fx = Fixture::new();

        fx.contact(obstacle(7));

        assert_eq!(fx.runtime.lives, 2);
        assert!(fx.runtime.is_invincible());
        assert_eq!(fx.runtime.invincibility.timed_remaining(), 2.0);
        assert_eq!(fx.signals.read::<Cue>(), &[Cue::Hit]);
        assert_eq!(fx.signals.read::<AnimationTrigger>(), &[AnimationTrigger::Hit]);
        assert_eq!(
            fx.signals.read::<HostCommand>(),
            &[
                HostCommand::StopMoving,
                HostCommand::DisableCollider(InstanceId(7)),
                HostCommand::ImpactObstacle(InstanceId(7)),
            ]
        );
    }

    #[test]
    fn second_hit_inside_window_is_ignored() {
        let mut fx = Fixture::new();

        fx.contact(obstacle(1));
        fx.advance(0.5);
        fx.signals.clear_all();
        fx.contact(obstacle(2));

        assert_eq!(fx.runtime.lives, 2);
        assert_eq!(fx.signals.pending(), 0);
    }

    #[test]
    fn window_closes_and_hits_land_again() {
        let mut fx = Fixture::new();

        fx.contact(obstacle(1));
        for _ in 0..21 {
            fx.advance(0.1);
        }
        assert!(!fx.runtime.is_invincible());
        assert_eq!(fx.runtime.invincibility.blink(), 0.0);

        fx.contact(obstacle(2));
        assert_eq!(fx.runtime.lives, 1);
    }

    #[test]
    fn invincible_hit_keeps_everything() {
        let mut fx = Fixture::new();
        let coin = fx.coins.acquire_default();
        fx.character.attracted.attract(coin);
        fx.runtime.invincibility.set_explicit(true);

        fx.contact(obstacle(3));

        assert_eq!(fx.runtime.lives, 3);
        assert!(fx.character.attracted().contains(coin));
        assert_eq!(fx.signals.pending(), 0);
        assert!(fx.tasks.is_empty());
    }

    #[test]
    fn bare_obstacle_is_released() {
        let mut fx = Fixture::new();

        fx.contact(CollisionEvent::Obstacle {
            instance: InstanceId(9),
            kind: None,
        });

        assert!(fx
            .signals
            .read::<HostCommand>()
            .contains(&HostCommand::ReleaseInstance(InstanceId(9))));
        assert_eq!(fx.runtime.lives, 2);
    }

    #[test]
    fn last_life_records_death() {
        let mut fx = Fixture::new();
        fx.runtime.lives = 1;
        fx.runtime.coins = 120;
        fx.runtime.premium = 2;
        fx.runtime.score = 4500;
        fx.runtime.distance = 812.5;

        fx.contact(CollisionEvent::Obstacle {
            instance: InstanceId(11),
            kind: Some(ObstacleKind::AllLane),
        });

        assert_eq!(fx.runtime.lives, 0);
        assert!(!fx.runtime.is_invincible());
        assert!(fx.tasks.is_empty());
        assert_eq!(fx.signals.read::<Cue>(), &[Cue::Death]);

        let death = fx.character.death().unwrap();
        assert_eq!(death.obstacle, Some(ObstacleKind::AllLane));
        assert_eq!(death.coins, 120);
        assert_eq!(death.premium, 2);
        assert_eq!(death.score, 4500);
        assert_eq!(death.distance, 812.5);
        assert_eq!(death.character, SessionConfig::default().character_name);
        assert_eq!(fx.signals.read::<DeathSnapshot>(), &[death.clone()]);
    }

    #[test]
    fn contacts_after_death_are_ignored() {
        let mut fx = Fixture::new();
        fx.runtime.lives = 1;
        fx.contact(obstacle(1));
        fx.signals.clear_all();

        fx.contact(obstacle(2));

        assert_eq!(fx.runtime.lives, 0);
        assert_eq!(fx.signals.pending(), 0);
    }

    #[test]
    fn death_is_final_for_every_contact_category() {
        let mut fx = Fixture::new();
        fx.runtime.lives = 1;
        fx.contact(CollisionEvent::Obstacle {
            instance: InstanceId(1),
            kind: Some(ObstacleKind::AllLane),
        });
        let snapshot = fx.character.death().cloned().unwrap();
        fx.signals.clear_all();

        let coin = fx.coins.acquire_default();
        fx.contact(CollisionEvent::Powerup {
            instance: InstanceId(2),
            kind: ConsumableKind::ExtraLife,
        });
        fx.contact(CollisionEvent::Coin(CoinRef::Pooled(coin)));
        fx.contact(CollisionEvent::Coin(CoinRef::Premium(InstanceId(3))));
        fx.contact(CollisionEvent::Obstacle {
            instance: InstanceId(4),
            kind: Some(ObstacleKind::Missile),
        });

        assert_eq!(fx.runtime.lives, 0);
        assert_eq!(fx.runtime.coins, 0);
        assert_eq!(fx.runtime.premium, 0);
        assert!(fx.coins.is_in_use(coin));
        assert!(fx.runtime.active_consumable.is_none());
        assert_eq!(fx.character.death(), Some(&snapshot));
        assert_eq!(fx.signals.pending(), 0);
    }

    #[test]
    fn events_report_their_category() {
        assert_eq!(
            CollisionEvent::Coin(CoinRef::Premium(InstanceId(1))).category(),
            ContactCategory::Coin
        );
        assert_eq!(obstacle(2).category(), ContactCategory::Obstacle);
        assert_eq!(
            CollisionEvent::Powerup {
                instance: InstanceId(3),
                kind: ConsumableKind::CoinMagnet,
            }
            .category(),
            ContactCategory::Powerup
        );
    }

    #[test]
    fn tutorial_hit_only_sets_flag() {
        let mut fx = Fixture::new();
        fx.runtime.is_tutorial = true;

        fx.contact(obstacle(1));

        assert!(fx.character.tutorial_hit_obstacle());
        assert_eq!(fx.runtime.lives, 3);
        assert!(fx.runtime.is_invincible());
        assert_eq!(fx.signals.read::<Cue>(), &[Cue::Hit]);
    }

    //--- Power-ups --------------------------------------------------------

    #[test]
    fn powerup_activates_and_releases_pickup() {
        let mut fx = Fixture::new();

        fx.contact(CollisionEvent::Powerup {
            instance: InstanceId(5),
            kind: ConsumableKind::CoinMagnet,
        });

        let active = fx.runtime.active_consumable.as_ref().unwrap();
        assert_eq!(active.kind(), ConsumableKind::CoinMagnet);
        assert_eq!(active.phase(), ConsumablePhase::Active);
        assert_eq!(fx.signals.read::<Cue>(), &[Cue::Powerup]);
        assert_eq!(
            fx.signals.read::<HostCommand>(),
            &[HostCommand::ReleaseInstance(InstanceId(5))]
        );
    }

    #[test]
    fn ignored_powerup_is_consumed_silently() {
        let mut fx = Fixture::new();
        fx.contact(CollisionEvent::Powerup {
            instance: InstanceId(1),
            kind: ConsumableKind::CoinMagnet,
        });
        fx.signals.clear_all();

        fx.contact(CollisionEvent::Powerup {
            instance: InstanceId(2),
            kind: ConsumableKind::Invincibility,
        });

        assert!(!fx.signals.has::<Cue>());
        assert_eq!(
            fx.signals.read::<HostCommand>(),
            &[HostCommand::ReleaseInstance(InstanceId(2))]
        );
        assert_eq!(
            fx.runtime.active_consumable.as_ref().unwrap().kind(),
            ConsumableKind::CoinMagnet
        );
    }

    #[test]
    fn missing_descriptor_skips_pickup() {
        let mut fx = Fixture::new();
        fx.database = ConsumableDatabase::new();

        fx.contact(CollisionEvent::Powerup {
            instance: InstanceId(3),
            kind: ConsumableKind::ExtraLife,
        });

        assert!(fx.runtime.active_consumable.is_none());
        assert_eq!(fx.signals.pending(), 0);
    }

    #[test]
    fn life_pickup_at_max_pays_fallback() {
        let mut fx = Fixture::new();

        fx.contact(CollisionEvent::Powerup {
            instance: InstanceId(4),
            kind: ConsumableKind::ExtraLife,
        });

        assert_eq!(fx.runtime.lives, 3);
        assert_eq!(fx.runtime.coins, 10);
        assert!(fx.runtime.active_consumable.is_none());
    }

    //--- Magnet Follow ----------------------------------------------------

    #[test]
    fn attracted_coins_follow_the_character() {
        let mut fx = Fixture::new();
        let coin = fx.coins.acquire(Vec3::new(0.0, 0.0, 3.0), Quat::IDENTITY);
        fx.character.attracted.attract(coin);

        fx.character.follow_attracted(0.1, &mut fx.coins);

        let z = fx.coins.get(coin).unwrap().transform.position.z;
        assert!((z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn reset_clears_run_state() {
        let mut fx = Fixture::new();
        fx.runtime.lives = 1;
        fx.character.slide(true);
        fx.contact(obstacle(1));
        let coin = fx.coins.acquire_default();
        fx.character.attracted.attract(coin);

        fx.character.reset();

        assert!(fx.character.death().is_none());
        assert!(fx.character.attracted().is_empty());
        assert!(!fx.character.shape().is_sliding());
    }
}
