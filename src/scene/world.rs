//! Scene container
//!
//! The Scene owns the entities and the physics world. Stepping the scene
//! steps physics once and then copies every body's transform onto the
//! entity it drives.

use std::collections::HashMap;
use std::fmt;

use planar_physics::{
    BodyKey, ContactEvent, ContactListener, PhysicsConfig, PhysicsError, PhysicsWorld,
    RigidBody2D,
};

use super::entity::{DirtyFlags, Entity};

/// A handle to an entity in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(usize);

impl EntityHandle {
    /// Get the raw index of this handle
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Error type for scene operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The handle does not name an entity in this scene
    UnknownEntity(EntityHandle),
    /// The entity has no physics body
    NoBody(EntityHandle),
    /// The physics world rejected the request
    Physics(PhysicsError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownEntity(handle) => write!(f, "Unknown entity: {}", handle.index()),
            SceneError::NoBody(handle) => write!(f, "Entity {} has no physics body", handle.index()),
            SceneError::Physics(err) => write!(f, "Physics error: {}", err),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Physics(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PhysicsError> for SceneError {
    fn from(err: PhysicsError) -> Self {
        SceneError::Physics(err)
    }
}

/// Entities plus the physics world that moves them
pub struct Scene {
    entities: Vec<Entity>,
    by_body: HashMap<BodyKey, EntityHandle>,
    physics: PhysicsWorld,
    config: PhysicsConfig,
}

impl Scene {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            entities: Vec::new(),
            by_body: HashMap::new(),
            physics: PhysicsWorld::with_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replace the physics settings; grid changes apply on the next step
    pub fn set_config(&mut self, config: PhysicsConfig) {
        self.config = config;
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Add an entity without a physics body
    pub fn add_entity(&mut self, entity: Entity) -> EntityHandle {
        let handle = EntityHandle(self.entities.len());
        self.entities.push(entity);
        handle
    }

    /// Add an entity driven by a new physics body
    ///
    /// The entity takes the body's transform.
    pub fn spawn(&mut self, mut entity: Entity, body: RigidBody2D) -> EntityHandle {
        entity.sync_transform(body.transform());
        let key = self.physics.add_body(body);
        entity.physics_body = Some(key);
        entity.mark_dirty(DirtyFlags::BODY);

        let handle = self.add_entity(entity);
        self.by_body.insert(key, handle);
        handle
    }

    pub fn get_entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle.0)
    }

    pub fn get_entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle.0)
    }

    /// Find the first entity with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(EntityHandle, &Entity)> {
        self.iter_with_handles()
            .find(|(_, e)| e.name.as_deref() == Some(name))
    }

    /// The entity driven by a physics body
    pub fn entity_for_body(&self, key: BodyKey) -> Option<EntityHandle> {
        self.by_body.get(&key).copied()
    }

    /// The physics body driving an entity
    pub fn body_of(&self, handle: EntityHandle) -> Option<&RigidBody2D> {
        let key = self.get_entity(handle)?.physics_body?;
        self.physics.get_body(key)
    }

    pub fn body_of_mut(&mut self, handle: EntityHandle) -> Option<&mut RigidBody2D> {
        let key = self.entities.get(handle.0)?.physics_body?;
        self.physics.get_body_mut(key)
    }

    fn body_key(&self, handle: EntityHandle) -> Result<BodyKey, SceneError> {
        self.get_entity(handle)
            .ok_or(SceneError::UnknownEntity(handle))?
            .physics_body
            .ok_or(SceneError::NoBody(handle))
    }

    /// Notify a behaviour of the entity's collisions and trigger overlaps
    ///
    /// Replaces any behaviour already attached to the entity.
    pub fn attach_behaviour(
        &mut self,
        handle: EntityHandle,
        behaviour: Box<dyn ContactListener>,
    ) -> Result<(), SceneError> {
        let key = self.body_key(handle)?;
        self.physics.set_listener(key, behaviour)?;
        Ok(())
    }

    /// Remove the entity's physics body at the start of the next step
    ///
    /// The entity stays in the scene, frozen at its last transform.
    pub fn detach_body(&mut self, handle: EntityHandle) -> Result<(), SceneError> {
        let key = self.body_key(handle)?;
        self.physics.remove_body(key)?;
        self.by_body.remove(&key);
        if let Some(entity) = self.entities.get_mut(handle.0) {
            entity.physics_body = None;
            entity.mark_dirty(DirtyFlags::BODY);
        }
        Ok(())
    }

    /// Run one physics step and sync entity transforms
    ///
    /// Returns the contact notifications produced by the step.
    pub fn step(&mut self) -> &[ContactEvent] {
        self.physics.step(&self.config);

        for entity in &mut self.entities {
            if let Some(key) = entity.physics_body {
                if let Some(body) = self.physics.get_body(key) {
                    entity.sync_transform(body.transform());
                }
            }
        }

        self.physics.events()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over handles and entities
    pub fn iter_with_handles(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityHandle(i), e))
    }

    /// Whether any entity changed since the last `clear_dirty`
    pub fn has_dirty_entities(&self) -> bool {
        self.entities.iter().any(|e| e.is_dirty())
    }

    pub fn clear_dirty(&mut self) {
        for entity in &mut self.entities {
            entity.clear_dirty();
        }
    }

    /// Name of the entity driven by `key`, for log output
    pub fn describe_body(&self, key: BodyKey) -> String {
        self.entity_for_body(key)
            .and_then(|h| self.get_entity(h))
            .and_then(|e| e.name.clone())
            .unwrap_or_else(|| format!("{:?}", key))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
