//=========================================================================
// Core Systems
//
// Gameplay services driven by the session on the tick thread.
//
// Layout (leaf first):
// - `math`, `pool`, `coin`         : transforms and the pooled allocator
// - `tasks`                        : timed routines (blink, countdown)
// - `context`                      : per-run runtime state
// - `consumable`                   : power-up lifecycle and effects
// - `contacts`, `signals`          : engine inputs and outputs
// - `character`                    : collision dispatcher
// - `config`                       : session tuning
//
//=========================================================================

pub mod character;
pub mod coin;
pub mod config;
pub mod consumable;
pub mod contacts;
pub mod context;
pub mod math;
pub mod pool;
pub mod signals;
pub mod tasks;

//=== Re-exports ==========================================================

pub use character::{AttractedCoins, CharacterCollider, ColliderShape};
pub use coin::{Coin, CoinPool};
pub use config::{ConfigError, SessionConfig};
pub use consumable::{
    ConsumableDatabase, ConsumableDescriptor, ConsumableKind, ConsumablePhase, ConsumableSystem,
    OverlapPolicy,
};
pub use contacts::{CoinRef, CollisionEvent, ContactCategory, InstanceId, ObstacleKind};
pub use context::RuntimeContext;
pub use pool::{Pool, PoolError, PoolHandle};
pub use signals::{AnimationTrigger, Cue, DeathSnapshot, HostCommand, SignalBus};
pub use tasks::{Routine, RoutineClock, RoutineStatus, TaskHandle, TaskRunner};
