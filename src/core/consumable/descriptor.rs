//=========================================================================
// Consumable Descriptors
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== ConsumableKind ======================================================

/// Power-up type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    /// Pulls nearby regular coins toward the character.
    CoinMagnet,

    /// Grants a life, or currency when lives are full.
    ExtraLife,

    /// Ignores obstacle hits for the duration.
    Invincibility,
}

impl ConsumableKind {
    pub const ALL: [ConsumableKind; 3] = [
        ConsumableKind::CoinMagnet,
        ConsumableKind::ExtraLife,
        ConsumableKind::Invincibility,
    ];

    /// Stock descriptor shipped with the game for this kind.
    pub fn default_descriptor(self) -> ConsumableDescriptor {
        match self {
            Self::CoinMagnet => ConsumableDescriptor::new(self, "Magnet", 750, 0, 15.0),
            Self::ExtraLife => ConsumableDescriptor::new(self, "Life", 2000, 5, 0.0),
            Self::Invincibility => ConsumableDescriptor::new(self, "Invincible", 1500, 5, 15.0),
        }
    }
}

impl fmt::Display for ConsumableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CoinMagnet => "coin_magnet",
            Self::ExtraLife => "extra_life",
            Self::Invincibility => "invincibility",
        };
        f.write_str(name)
    }
}

//=== ConsumableDescriptor ================================================

/// Immutable per-kind data, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableDescriptor {
    pub kind: ConsumableKind,
    pub name: String,

    /// Shop price in regular currency.
    pub price: u32,

    /// Shop price in premium currency.
    pub premium_price: u32,

    /// Effect duration in seconds; 0 means instantaneous.
    pub duration: f32,
}

impl ConsumableDescriptor {
    pub fn new(
        kind: ConsumableKind,
        name: impl Into<String>,
        price: u32,
        premium_price: u32,
        duration: f32,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            price,
            premium_price,
            duration,
        }
    }

    pub fn is_instantaneous(&self) -> bool {
        self.duration <= 0.0
    }
}
