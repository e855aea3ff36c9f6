//! Contact pair identity and collision manifolds

use planar_math::Vec2;

use crate::body::BodyKey;

/// Unordered pair of bodies, stored smaller key first
///
/// `ContactPair::new(a, b) == ContactPair::new(b, a)`, so the pair can key the
/// per-frame contact sets directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    first: BodyKey,
    second: BodyKey,
}

impl ContactPair {
    /// Create a canonical pair from two keys in any order
    pub fn new(a: BodyKey, b: BodyKey) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    #[inline]
    pub fn first(&self) -> BodyKey {
        self.first
    }

    #[inline]
    pub fn second(&self) -> BodyKey {
        self.second
    }

    /// Check whether the pair involves a body
    #[inline]
    pub fn contains(&self, key: BodyKey) -> bool {
        self.first == key || self.second == key
    }

    /// The other body in the pair, if `key` is one of them
    pub fn other(&self, key: BodyKey) -> Option<BodyKey> {
        if key == self.first {
            Some(self.second)
        } else if key == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Minimum translation vector from a SAT test
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    /// Unit normal pointing from shape A toward shape B
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub depth: f32,
}

/// Contact points between two touching shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactPoints {
    pub points: [Vec2; 2],
    /// Number of valid entries in `points` (1 or 2)
    pub count: usize,
}

impl ContactPoints {
    pub fn single(p: Vec2) -> Self {
        Self {
            points: [p, Vec2::ZERO],
            count: 1,
        }
    }

    pub fn pair(p1: Vec2, p2: Vec2) -> Self {
        Self {
            points: [p1, p2],
            count: 2,
        }
    }

    /// The valid contact points
    pub fn as_slice(&self) -> &[Vec2] {
        &self.points[..self.count]
    }

    /// Average of the valid contact points
    pub fn centroid(&self) -> Vec2 {
        match self.count {
            2 => (self.points[0] + self.points[1]) * 0.5,
            _ => self.points[0],
        }
    }
}

/// Geometric description of a confirmed collision between two bodies
///
/// Built fresh every step; never carried across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionManifold {
    pub body_a: BodyKey,
    pub body_b: BodyKey,
    /// Unit normal pointing from A toward B
    pub normal: Vec2,
    /// Penetration depth (non-negative)
    pub depth: f32,
    pub contacts: ContactPoints,
    /// Either shape is a trigger; no physical response
    pub is_trigger: bool,
}

impl CollisionManifold {
    /// Canonical pair key for this manifold
    pub fn pair(&self) -> ContactPair {
        ContactPair::new(self.body_a, self.body_b)
    }

    #[inline]
    pub fn contact_count(&self) -> usize {
        self.contacts.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn two_keys() -> (BodyKey, BodyKey) {
        let mut map: SlotMap<BodyKey, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()))
    }

    #[test]
    fn test_pair_is_canonical() {
        let (a, b) = two_keys();
        assert_eq!(ContactPair::new(a, b), ContactPair::new(b, a));
        let pair = ContactPair::new(b, a);
        assert!(pair.first() < pair.second());
    }

    #[test]
    fn test_pair_hashes_identically() {
        use std::collections::HashSet;
        let (a, b) = two_keys();
        let mut set = HashSet::new();
        set.insert(ContactPair::new(a, b));
        assert!(!set.insert(ContactPair::new(b, a)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_pair_other() {
        let (a, b) = two_keys();
        let pair = ContactPair::new(a, b);
        assert_eq!(pair.other(a), Some(b));
        assert_eq!(pair.other(b), Some(a));
        assert!(pair.contains(a));
        assert_eq!(pair.other(BodyKey::default()), None);
    }

    #[test]
    fn test_contact_points_slice() {
        let one = ContactPoints::single(Vec2::X);
        assert_eq!(one.as_slice(), &[Vec2::X]);
        let two = ContactPoints::pair(Vec2::X, Vec2::Y);
        assert_eq!(two.as_slice(), &[Vec2::X, Vec2::Y]);
    }

    #[test]
    fn test_contact_points_centroid() {
        assert_eq!(ContactPoints::single(Vec2::X).centroid(), Vec2::X);
        let flush = ContactPoints::pair(Vec2::new(-1.0, 1.0), Vec2::new(1.0, 1.0));
        assert_eq!(flush.centroid(), Vec2::new(0.0, 1.0));
    }
}
