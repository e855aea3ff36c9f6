//! 2D world transform (position, rotation, scale)
//!
//! Every collidable owns a `Transform2D`. All writes go through the setters so
//! the revision counter advances and observers (scene sync, renderer) can tell
//! that the transform changed since they last looked.

use planar_math::{mat3, Mat3, Vec2};
use serde::{Deserialize, Serialize};

/// A 2D transform with position, rotation (degrees), and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    position: Vec2,
    /// Counter-clockwise rotation in degrees
    rotation: f32,
    scale: Vec2,
    #[serde(skip)]
    revision: u64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            revision: 0,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation in degrees
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Self::identity()
        }
    }

    /// Builder-style scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Number of writes applied to this transform
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.revision += 1;
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        self.revision += 1;
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.revision += 1;
    }

    /// Rotate by a delta in degrees, keeping the angle in [0, 360)
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
        self.revision += 1;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.revision += 1;
    }

    /// World matrix for this transform
    pub fn matrix(&self) -> Mat3 {
        mat3::from_trs(self.position, self.rotation, self.scale)
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        mat3::transform_point(self.matrix(), p)
    }
}
