//=========================================================================
// Gameplay Signals
//=========================================================================
//
// Outputs of the interaction engine toward host collaborators (audio,
// animation, scene, telemetry). All signals are fire-and-forget: they are
// emitted during the tick, read by the host afterwards, and cleared at the
// start of the next tick.
//
//=========================================================================

//=== Module Declarations =================================================

mod bus;
mod queue;

//=== Public API ==========================================================

pub use bus::{Signal, SignalBus};

//=== Internal Dependencies ===============================================

use crate::core::contacts::{InstanceId, ObstacleKind};

//=== Cue =================================================================

/// One-shot sound cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Coin,
    Premium,
    Powerup,
    Hit,
    Death,
}

//=== AnimationTrigger ====================================================

/// Character animator trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    Hit,
}

//=== HostCommand =========================================================

/// Requests for the host scene to act on one of its objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Halt the character's forward motion.
    StopMoving,

    /// Turn off the collider of the contacted object.
    DisableCollider(InstanceId),

    /// Play the obstacle's impact animation and sound.
    ImpactObstacle(InstanceId),

    /// Return a host-spawned object (premium coin, bare obstacle, pickup).
    ReleaseInstance(InstanceId),
}

//=== DeathSnapshot =======================================================

/// Run summary recorded when the last life is lost.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathSnapshot {
    pub character: String,
    pub obstacle: Option<ObstacleKind>,
    pub theme: String,
    pub coins: u32,
    pub premium: u32,
    pub score: u32,
    pub distance: f32,
}
