//=========================================================================
// Character Module
//=========================================================================
//
// The player character's side of the interaction engine: contact
// dispatch, the magnet's attracted-coin set and the collider box.
//
//=========================================================================

//=== Module Declarations =================================================

mod collider;
mod magnet;
mod shape;

//=== Public API ==========================================================

pub use collider::{CharacterCollider, ContactEnv};
pub use magnet::AttractedCoins;
pub use shape::ColliderShape;
