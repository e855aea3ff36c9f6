//! Physical material properties for collision response

use serde::{Deserialize, Serialize};

/// Physical material properties for collision response
///
/// Friction is split into a static coefficient (resistance to start sliding)
/// and a dynamic coefficient (resistance while sliding).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Static friction coefficient (0.0 = ice, 1.0 = rubber)
    pub static_friction: f32,
    /// Dynamic friction coefficient, normally below the static one
    pub dynamic_friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            dynamic_friction: 0.4,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Ice-like material: very low friction, slight bounce
    pub const ICE: Self = Self {
        static_friction: 0.05,
        dynamic_friction: 0.02,
        restitution: 0.1,
    };

    /// Rubber-like material: high friction, very bouncy
    pub const RUBBER: Self = Self {
        static_friction: 0.9,
        dynamic_friction: 0.8,
        restitution: 0.8,
    };

    /// Metal-like material: moderate friction and bounce
    pub const METAL: Self = Self {
        static_friction: 0.4,
        dynamic_friction: 0.3,
        restitution: 0.3,
    };

    /// Wood-like material: moderate friction, low bounce
    pub const WOOD: Self = Self {
        static_friction: 0.5,
        dynamic_friction: 0.4,
        restitution: 0.2,
    };

    /// Concrete-like material: high friction, very low bounce
    pub const CONCRETE: Self = Self {
        static_friction: 0.8,
        dynamic_friction: 0.7,
        restitution: 0.1,
    };

    /// Create a new physics material
    ///
    /// Values are clamped to the range [0.0, 1.0].
    pub fn new(static_friction: f32, dynamic_friction: f32, restitution: f32) -> Self {
        Self {
            static_friction: static_friction.clamp(0.0, 1.0),
            dynamic_friction: dynamic_friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Combine two materials for collision response
    ///
    /// Friction coefficients use the geometric mean, so a frictionless
    /// surface stays frictionless against anything. The combined dynamic
    /// coefficient never exceeds the combined static one. Restitution takes
    /// the maximum (most bouncy surface wins).
    pub fn combine(&self, other: &Self) -> Self {
        let static_friction = (self.static_friction * other.static_friction).sqrt();
        let dynamic_friction = (self.dynamic_friction * other.dynamic_friction).sqrt();
        Self {
            static_friction,
            dynamic_friction: dynamic_friction.min(static_friction),
            restitution: self.restitution.max(other.restitution),
        }
    }
}
