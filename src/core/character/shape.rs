//=========================================================================
// Collider Shape
//=========================================================================
//
// Box collider of the character, squashed while sliding.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::math::Vec3;

//=== Constants ===========================================================

const SLIDING_SCALE: Vec3 = Vec3::new(1.0, 0.5, 1.0);
const STANDING_SCALE: Vec3 = Vec3::new(1.0, 2.0, 1.0);

//=== ColliderShape =======================================================

/// Centre and full size of the character box, in character space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderShape {
    center: Vec3,
    size: Vec3,
    sliding: bool,
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0))
    }
}

impl ColliderShape {
    /// Creates a standing shape.
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            size,
            sliding: false,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    /// Halves the height and lowers the centre while sliding; restores
    /// both when standing up. Repeating the current state is a no-op.
    pub fn slide(&mut self, sliding: bool) {
        if sliding == self.sliding {
            return;
        }

        if sliding {
            self.size = self.size.scale(SLIDING_SCALE);
            self.center.y -= self.size.y * 0.5;
        } else {
            self.center.y += self.size.y * 0.5;
            self.size = self.size.scale(STANDING_SCALE);
        }
        self.sliding = sliding;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliding_squashes_and_lowers() {
        let mut shape = ColliderShape::default();
        shape.slide(true);

        assert!(shape.is_sliding());
        assert_eq!(shape.size(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(shape.center(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn standing_restores_original_box() {
        let original = ColliderShape::default();
        let mut shape = original;

        shape.slide(true);
        shape.slide(false);

        assert_eq!(shape, original);
    }

    #[test]
    fn repeated_slide_is_ignored() {
        let mut shape = ColliderShape::default();
        shape.slide(true);
        shape.slide(true);
        assert_eq!(shape.size().y, 1.0);

        let mut standing = ColliderShape::default();
        standing.slide(false);
        assert_eq!(standing, ColliderShape::default());
    }
}
