//=========================================================================
// Math Primitives
//=========================================================================
//
// Minimal world-space math used by the interaction engine.
//
// Only what contact handling needs: positions, orientations, constant
// speed steering and oriented box containment. Geometry beyond that is
// owned by the host engine.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

//=== Vec3 ================================================================

/// Three-component world-space vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Component-wise product.
    pub fn scale(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Moves `self` toward `target` by at most `max_delta`, never overshooting.
    pub fn move_towards(self, target: Self, max_delta: f32) -> Self {
        let offset = target - self;
        let dist = offset.length();

        if dist <= max_delta || dist == 0.0 {
            return target;
        }

        self + offset * (max_delta / dist)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

//=== Quat ================================================================

/// Unit quaternion orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Rotation of `radians` around the world up axis.
    pub fn from_rotation_y(radians: f32) -> Self {
        let (s, c) = (radians * 0.5).sin_cos();
        Self { x: 0.0, y: s, z: 0.0, w: c }
    }

    pub fn conjugate(self) -> Self {
        Self { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    /// Rotates `v` by this orientation.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=== Transform ===========================================================

/// Position and orientation of an entity in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Converts a world-space point into this transform's local frame.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.conjugate().rotate(point - self.position)
    }

    /// Returns true if `point` lies inside the box centred on this transform
    /// with the given half extents, oriented with this transform.
    pub fn box_contains(&self, half_extents: Vec3, point: Vec3) -> bool {
        let local = self.inverse_transform_point(point);
        local.x.abs() <= half_extents.x
            && local.y.abs() <= half_extents.y
            && local.z.abs() <= half_extents.z
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
