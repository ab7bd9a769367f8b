//=========================================================================
// Consumable Database
//=========================================================================
//
// Registry of consumable descriptors keyed by kind.
//
// Built once at startup (stock values or a RON asset) and handed to the
// session. Descriptors are shared as `Arc` so active instances can hold
// onto theirs without borrowing the database.
//
// RON layout:
// ```text
// [
//     (kind: CoinMagnet, name: "Magnet", price: 750, premium_price: 0, duration: 15.0),
//     (kind: ExtraLife, name: "Life", price: 2000, premium_price: 5, duration: 0.0),
// ]
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{ConsumableDescriptor, ConsumableKind};

//=== DatabaseError =======================================================

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Parse(String),

    #[error("consumable kind {0} is defined more than once")]
    DuplicateKind(ConsumableKind),

    #[error("consumable {kind} has invalid duration {duration}")]
    InvalidDuration { kind: ConsumableKind, duration: f32 },
}

//=== ConsumableDatabase ==================================================

/// Read-only lookup of consumable descriptors.
#[derive(Debug, Clone, Default)]
pub struct ConsumableDatabase {
    entries: HashMap<ConsumableKind, Arc<ConsumableDescriptor>>,
}

impl ConsumableDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Database holding the stock descriptor of every kind.
    pub fn builtin() -> Self {
        let mut db = Self::new();
        for kind in ConsumableKind::ALL {
            db.entries.insert(kind, Arc::new(kind.default_descriptor()));
        }
        db
    }

    //--- Loading ----------------------------------------------------------

    /// Parses a RON list of descriptors.
    pub fn from_ron_str(source: &str) -> Result<Self, DatabaseError> {
        let descriptors: Vec<ConsumableDescriptor> =
            ron::from_str(source).map_err(|e| DatabaseError::Parse(e.to_string()))?;

        let mut db = Self::new();
        for descriptor in descriptors {
            db.insert(descriptor)?;
        }

        info!("Loaded {} consumable descriptors", db.len());
        Ok(db)
    }

    /// Reads and parses a RON descriptor file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        debug!("Reading consumable database from {}", path.as_ref().display());
        Self::from_ron_str(&source)
    }

    /// Adds a descriptor. Each kind may only be defined once.
    pub fn insert(&mut self, descriptor: ConsumableDescriptor) -> Result<(), DatabaseError> {
        if !descriptor.duration.is_finite() || descriptor.duration < 0.0 {
            return Err(DatabaseError::InvalidDuration {
                kind: descriptor.kind,
                duration: descriptor.duration,
            });
        }

        if self.entries.contains_key(&descriptor.kind) {
            return Err(DatabaseError::DuplicateKind(descriptor.kind));
        }

        self.entries.insert(descriptor.kind, Arc::new(descriptor));
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn get(&self, kind: ConsumableKind) -> Option<Arc<ConsumableDescriptor>> {
        self.entries.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
