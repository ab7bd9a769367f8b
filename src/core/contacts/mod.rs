//=========================================================================
// Contact Events
//=========================================================================
//
// Contact results delivered by the physics host, already classified by
// category. The engine never inspects geometry to decide what was hit.
//
//=========================================================================

//=== Module Declarations =================================================

mod inbox;

//=== Public API ==========================================================

pub use inbox::ContactInbox;

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::consumable::ConsumableKind;
use crate::core::pool::PoolHandle;

//=== InstanceId ==========================================================

/// Identifier of an object owned by the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

//=== ObstacleKind ========================================================

/// Obstacle family, reported in death snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// One or two single-lane barricades.
    SimpleBarricade,

    /// Barrier spanning every lane.
    AllLane,

    /// Moving obstacle travelling down a lane.
    Missile,
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SimpleBarricade => "SimpleBarricade",
            Self::AllLane => "AllLaneObstacle",
            Self::Missile => "Missile",
        };
        f.write_str(name)
    }
}

//=== CoinRef =============================================================

/// Which coin was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinRef {
    /// Regular coin owned by the coin pool.
    Pooled(PoolHandle),

    /// Premium coin spawned by the host outside any pool.
    Premium(InstanceId),
}

//=== ContactCategory =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactCategory {
    Coin,
    Obstacle,
    Powerup,
}

//=== CollisionEvent ======================================================

/// A single contact between the character and a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    Coin(CoinRef),

    /// `kind` is `None` for objects on the obstacle layer that carry no
    /// obstacle behaviour; those are released instead of impacted.
    Obstacle {
        instance: InstanceId,
        kind: Option<ObstacleKind>,
    },

    Powerup {
        instance: InstanceId,
        kind: ConsumableKind,
    },
}

impl CollisionEvent {
    pub fn category(&self) -> ContactCategory {
        match self {
            Self::Coin(_) => ContactCategory::Coin,
            Self::Obstacle { .. } => ContactCategory::Obstacle,
            Self::Powerup { .. } => ContactCategory::Powerup,
        }
    }
}
