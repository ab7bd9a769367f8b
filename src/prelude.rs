//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use runner_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Session
pub use crate::session::{Session, SessionBuilder};
pub use crate::core::config::SessionConfig;
pub use crate::logging::{init_logging, LoggingConfig};

// Contacts in, signals out
pub use crate::core::contacts::{CoinRef, CollisionEvent, InstanceId, ObstacleKind};
pub use crate::core::signals::{AnimationTrigger, Cue, DeathSnapshot, HostCommand};

// Consumables
pub use crate::core::consumable::{
    ConsumableEffect, ConsumableKind, ConsumablePhase, EffectContext, OverlapPolicy,
};

// Pooling and math
pub use crate::core::math::{Quat, Transform, Vec3};
pub use crate::core::pool::PoolHandle;
