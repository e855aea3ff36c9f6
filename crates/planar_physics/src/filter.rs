//! Collision filtering via layer masks
//!
//! The broad phase drops any candidate pair whose filters do not agree, so
//! filtered pairs never reach the narrow phase or produce events.

use bitflags::bitflags;

bitflags! {
    /// Collision layers for filtering which objects can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Objects can belong to multiple
    /// layers and define which layers they collide with via a mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Player-controlled objects
        const PLAYER = 1 << 1;
        /// Enemies and NPCs
        const ENEMY = 1 << 2;
        /// Level geometry (floors, walls, platforms)
        const STATIC = 1 << 3;
        /// Trigger zones
        const TRIGGER = 1 << 4;
        /// Projectiles
        const PROJECTILE = 1 << 5;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what an object collides with
///
/// Two objects A and B are tested against each other only if
/// `(A.layer & B.mask) != 0` and `(B.layer & A.mask) != 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    /// Create a new collision filter with specified layer and mask
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Filter for level geometry: belongs to STATIC, hits everything
    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }

    /// Filter for player objects: ignores other players and their projectiles
    pub fn player() -> Self {
        Self {
            layer: CollisionLayer::PLAYER,
            mask: CollisionLayer::ALL & !CollisionLayer::PLAYER & !CollisionLayer::PROJECTILE,
        }
    }

    /// Filter for projectiles: hits enemies and level geometry only
    pub fn projectile() -> Self {
        Self {
            layer: CollisionLayer::PROJECTILE,
            mask: CollisionLayer::ENEMY | CollisionLayer::STATIC,
        }
    }

    /// Filter for a trigger zone that detects the given layers
    pub fn trigger(detects: CollisionLayer) -> Self {
        Self {
            layer: CollisionLayer::TRIGGER,
            mask: detects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collides_with_default() {
        let a = CollisionFilter::default();
        assert!(a.collides_with(&CollisionFilter::default()));
        assert!(a.collides_with(&CollisionFilter::static_world()));
    }

    #[test]
    fn test_players_ignore_each_other() {
        assert!(!CollisionFilter::player().collides_with(&CollisionFilter::player()));
        assert!(CollisionFilter::player().collides_with(&CollisionFilter::static_world()));
    }

    #[test]
    fn test_projectile() {
        let projectile = CollisionFilter::projectile();
        let enemy = CollisionFilter::new(CollisionLayer::ENEMY, CollisionLayer::ALL);
        assert!(projectile.collides_with(&enemy));
        assert!(projectile.collides_with(&CollisionFilter::static_world()));
        assert!(!projectile.collides_with(&CollisionFilter::player()));
    }

    #[test]
    fn test_trigger_requires_agreement() {
        let trigger = CollisionFilter::trigger(CollisionLayer::PLAYER);
        assert!(trigger.collides_with(&CollisionFilter::player()));
        // Default objects are not in the trigger's mask
        assert!(!trigger.collides_with(&CollisionFilter::default()));
    }

    #[test]
    fn test_layer_bitflags() {
        let combined = CollisionLayer::PLAYER | CollisionLayer::ENEMY;
        assert!(combined.contains(CollisionLayer::PLAYER));
        assert!(!combined.contains(CollisionLayer::STATIC));
    }
}
