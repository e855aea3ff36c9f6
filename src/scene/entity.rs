//! Scene entities
//!
//! An Entity is a named object in the scene with a transform and an optional
//! physics body. Its transform mirrors the body's after every step.

use std::collections::HashSet;

use bitflags::bitflags;
use planar_physics::{BodyKey, Transform2D};

bitflags! {
    /// Flags indicating which parts of an entity changed since they were last consumed
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Position, rotation, or scale changed
        const TRANSFORM = 1 << 0;
        /// The attached body was added or removed
        const BODY = 1 << 1;
        /// All flags set
        const ALL = Self::TRANSFORM.bits() | Self::BODY.bits();
    }
}

/// An object in the scene
pub struct Entity {
    /// Optional name for this entity (for lookup)
    pub name: Option<String>,
    /// Tags for categorization (e.g., "dynamic", "static", "trigger")
    pub tags: HashSet<String>,
    /// The entity's transform in world space
    transform: Transform2D,
    /// Optional physics body key (links to PhysicsWorld)
    pub(crate) physics_body: Option<BodyKey>,
    dirty: DirtyFlags,
}

impl Entity {
    pub fn new() -> Self {
        Self::with_transform(Transform2D::identity())
    }

    pub fn with_transform(transform: Transform2D) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform,
            physics_body: None,
            dirty: DirtyFlags::ALL,
        }
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// The physics body driving this entity, if any
    pub fn physics_body(&self) -> Option<BodyKey> {
        self.physics_body
    }

    // --- Dirty tracking methods ---

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    /// Copy a body's transform, marking the entity dirty if it moved
    pub(crate) fn sync_transform(&mut self, transform: &Transform2D) {
        if self.transform.position() != transform.position()
            || self.transform.rotation() != transform.rotation()
            || self.transform.scale() != transform.scale()
        {
            self.transform = *transform;
            self.mark_dirty(DirtyFlags::TRANSFORM);
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}
