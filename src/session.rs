//=========================================================================
// Runner Session
//
// Entry point and tick driver for the interaction engine.
//
// Architecture:
// ```text
//     SessionBuilder ──build()──> Session ──tick(dt)──> [one gameplay tick]
//         │                         │
//         ├─ with_max_lives()       ├─ contact_sender() → physics host
//         ├─ with_overlap_policy()  ├─ signals()        → audio, animation, scene
//         └─ from_config()          └─ runtime()        → UI, telemetry
// ```
//
// Tick order:
//   1. clear last tick's signals
//   2. drain buffered contacts → CharacterCollider::on_contact
//   3. attracted coins follow the character
//   4. active consumable's per-tick effect
//   5. task runner advances (blink, consumable countdown)
//   6. expired consumable ends
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::character::{CharacterCollider, ContactEnv};
use crate::core::coin::{coin_pool, CoinPool};
use crate::core::config::{ConfigResult, SessionConfig};
use crate::core::consumable::{ConsumableDatabase, ConsumableInstance, ConsumableSystem, OverlapPolicy};
use crate::core::contacts::{CollisionEvent, ContactInbox};
use crate::core::context::RuntimeContext;
use crate::core::math::Transform;
use crate::core::signals::{DeathSnapshot, SignalBus};
use crate::core::tasks::TaskRunner;

//=== SessionBuilder ======================================================

/// Builder for configuring and constructing a [`Session`].
///
/// # Default Values
///
/// - **Max lives**: 3
/// - **Hit invincibility**: 2.0 s, blinking every 0.1 s
/// - **Magnet speed**: 10 units/s
/// - **Contact capacity**: 128 events
/// - **Overlap policy**: [`OverlapPolicy::Ignore`]
///
/// # Examples
///
/// ```no_run
/// use runner_engine::SessionBuilder;
/// use runner_engine::core::consumable::OverlapPolicy;
///
/// let mut session = SessionBuilder::new()
///     .with_max_lives(5)
///     .with_overlap_policy(OverlapPolicy::RefreshSameKind)
///     .build();
///
/// session.start_run();
/// session.tick(1.0 / 60.0);
/// ```
pub struct SessionBuilder {
    config: SessionConfig,
    database: Option<ConsumableDatabase>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            database: None,
        }
    }

    /// Starts from a loaded config, rejecting invalid values.
    pub fn from_config(config: SessionConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            database: None,
        })
    }

    /// Sets the lives at run start and the life pickup's upper bound.
    ///
    /// # Panics
    ///
    /// Panics if `lives == 0`.
    pub fn with_max_lives(mut self, lives: u32) -> Self {
        assert!(lives > 0, "Max lives must be positive");
        self.config.max_lives = lives;
        self
    }

    /// Sets the invincibility window granted after a non-fatal hit.
    ///
    /// # Panics
    ///
    /// Panics if `secs` is negative.
    pub fn with_hit_invincibility(mut self, secs: f32) -> Self {
        assert!(secs >= 0.0, "Hit invincibility must be non-negative, got {}", secs);
        self.config.hit_invincibility_secs = secs;
        self
    }

    /// # Panics
    ///
    /// Panics if `period <= 0.0`.
    pub fn with_blink_period(mut self, period: f32) -> Self {
        assert!(period > 0.0, "Blink period must be positive, got {}", period);
        self.config.blink_period = period;
        self
    }

    /// # Panics
    ///
    /// Panics if `speed` is negative.
    pub fn with_magnet_speed(mut self, speed: f32) -> Self {
        assert!(speed >= 0.0, "Magnet speed must be non-negative, got {}", speed);
        self.config.magnet_speed = speed;
        self
    }

    /// Pre-sizes the per-tick contact buffer. Contacts beyond it are still
    /// queued, never dropped.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_contact_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Contact capacity must be positive");
        self.config.contact_capacity = capacity;
        self
    }

    /// Pre-constructs `size` coins in the coin pool.
    pub fn with_initial_coin_pool(mut self, size: usize) -> Self {
        self.config.initial_coin_pool = size;
        self
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.config.overlap_policy = policy;
        self
    }

    pub fn with_tutorial(mut self, is_tutorial: bool) -> Self {
        self.config.is_tutorial = is_tutorial;
        self
    }

    pub fn with_character_name(mut self, name: impl Into<String>) -> Self {
        self.config.character_name = name.into();
        self
    }

    pub fn with_theme_name(mut self, name: impl Into<String>) -> Self {
        self.config.theme_name = name.into();
        self
    }

    /// Replaces the built-in consumable descriptors.
    pub fn with_database(mut self, database: ConsumableDatabase) -> Self {
        self.database = Some(database);
        self
    }

    /// Builds the session, ready for its first run.
    pub fn build(self) -> Session {
        let config = self.config;

        info!(
            "Building session (lives: {}, contacts: {}, policy: {:?})",
            config.max_lives, config.contact_capacity, config.overlap_policy
        );

        let consumables = ConsumableSystem::with_builtin_effects(
            config.overlap_policy,
            config.magnet_half_extents,
            config.life_fallback_coins,
            config.blink_period,
        );

        let mut runtime = RuntimeContext::new(config.max_lives);
        runtime.is_tutorial = config.is_tutorial;

        Session {
            runtime,
            tasks: TaskRunner::new(),
            coins: coin_pool(config.initial_coin_pool),
            consumables,
            database: self.database.unwrap_or_else(ConsumableDatabase::builtin),
            character: CharacterCollider::new(&config),
            signals: SignalBus::new(),
            inbox: ContactInbox::new(config.contact_capacity),
            config,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Session =============================================================

/// One player's gameplay session.
///
/// Owns every engine service and drives them in a fixed order from
/// [`tick`](Self::tick). All state lives on the calling thread; only
/// contact reporting may cross threads through [`contact_sender`](Self::contact_sender).
pub struct Session {
    config: SessionConfig,
    runtime: RuntimeContext,
    tasks: TaskRunner<RuntimeContext>,
    coins: CoinPool,
    consumables: ConsumableSystem,
    database: ConsumableDatabase,
    character: CharacterCollider,
    signals: SignalBus,
    inbox: ContactInbox,
}

impl Session {
    //--- Run Lifecycle ----------------------------------------------------

    /// Starts a new run.
    ///
    /// Ends any active consumable, resets the runtime context and drops
    /// every routine, attracted coin, buffered contact and pending signal.
    /// Pooled coins stay in the host's hands.
    pub fn start_run(&mut self) {
        {
            let mut ctx =
                self.character
                    .effect_context(&mut self.runtime, &mut self.tasks, &mut self.coins);
            self.consumables.end_active(&mut ctx);
        }

        self.runtime.reset(self.config.is_tutorial);
        self.tasks.clear();
        self.character.reset();
        self.inbox.discard();
        self.signals.clear_all();

        info!(
            "Run started ({} lives{})",
            self.runtime.lives,
            if self.runtime.is_tutorial { ", tutorial" } else { "" }
        );
    }

    /// Records track progress for the death snapshot.
    pub fn record_progress(&mut self, score: u32, distance: f32) {
        self.runtime.score = score;
        self.runtime.distance = distance;
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one gameplay tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.signals.clear_all();

        self.inbox.collect();
        for event in self.inbox.take_events() {
            self.dispatch(event);
        }

        self.character.follow_attracted(dt, &mut self.coins);

        {
            let mut ctx =
                self.character
                    .effect_context(&mut self.runtime, &mut self.tasks, &mut self.coins);
            self.consumables.tick_active(&mut ctx);
        }

        self.tasks.advance(dt, &mut self.runtime);

        let mut ctx = self
            .character
            .effect_context(&mut self.runtime, &mut self.tasks, &mut self.coins);
        self.consumables.finish_expired(&mut ctx);
    }

    /// Dispatches a contact immediately, bypassing the channel.
    ///
    /// Signals it emits stay readable until the next [`tick`](Self::tick),
    /// which clears the bus before anything else. Read them first.
    pub fn on_contact(&mut self, event: CollisionEvent) {
        self.dispatch(event);
    }

    /// Handle for reporting contacts, drained at the start of each tick.
    pub fn contact_sender(&self) -> Sender<CollisionEvent> {
        self.inbox.sender()
    }

    fn dispatch(&mut self, event: CollisionEvent) {
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

    //--- Character --------------------------------------------------------

    pub fn set_character_transform(&mut self, transform: Transform) {
        self.character.set_transform(transform);
    }

    pub fn set_sliding(&mut self, sliding: bool) {
        self.character.slide(sliding);
    }

    /// Forces invincibility on or off, independently of any timed window.
    pub fn set_invincible_explicit(&mut self, on: bool) {
        self.runtime.invincibility.set_explicit(on);
    }

    pub fn character(&self) -> &CharacterCollider {
        &self.character
    }

    pub fn death_snapshot(&self) -> Option<&DeathSnapshot> {
        self.character.death()
    }

    //--- Services ---------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn runtime(&self) -> &RuntimeContext {
        &self.runtime
    }

    pub fn active_consumable(&self) -> Option<&ConsumableInstance> {
        self.runtime.active_consumable.as_ref()
    }

    pub fn coins(&self) -> &CoinPool {
        &self.coins
    }

    /// Coin pool, for the track to place and recycle coins.
    pub fn coins_mut(&mut self) -> &mut CoinPool {
        &mut self.coins
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRunner<RuntimeContext> {
        &mut self.tasks
    }

    /// Consumable system, for registering custom effects.
    pub fn consumables_mut(&mut self) -> &mut ConsumableSystem {
        &mut self.consumables
    }

    pub fn database(&self) -> &ConsumableDatabase {
        &self.database
    }

    /// Signals emitted during the last tick.
    pub fn signals(&self) -> &SignalBus {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalBus {
        &mut self.signals
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
