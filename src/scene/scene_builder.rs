//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building 2D scenes with physics.

use planar_math::Vec2;
use planar_physics::{
    BodyType, CollisionFilter, CollisionLayer, ContactListener, PhysicsConfig, PhysicsMaterial,
    RigidBody2D,
};

use super::behaviour::LoggingBehaviour;
use super::entity::Entity;
use super::world::Scene;

/// Builder for constructing 2D scenes with physics
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new(PhysicsConfig::default())
///     .add_floor(0.0, 40.0, PhysicsMaterial::CONCRETE)
///     .add_box("crate", Vec2::new(0.0, 5.0), 1.0, 1.0)
///     .add_trigger_zone("goal", Vec2::new(8.0, 1.0), 2.0, 2.0)
///     .build();
/// ```
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            scene: Scene::new(config),
        }
    }

    /// The scene run by the headless demo
    ///
    /// A floor with two walls, a small stack of crates, two balls thrown
    /// toward the stack, and a trigger zone the balls roll through.
    pub fn demo(config: PhysicsConfig) -> Self {
        Self::new(config)
            .add_floor(0.0, 40.0, PhysicsMaterial::CONCRETE)
            .add_wall(-20.0, 0.0, 20.0, PhysicsMaterial::CONCRETE)
            .add_wall(20.0, 0.0, 20.0, PhysicsMaterial::CONCRETE)
            .add_box("crate_low", Vec2::new(4.0, 0.5), 1.0, 1.0)
            .add_box("crate_high", Vec2::new(4.0, 1.5), 1.0, 1.0)
            .add_box("crate_falling", Vec2::new(4.2, 6.0), 1.0, 1.0)
            .add_ball("ball_left", Vec2::new(-8.0, 3.0), 0.5, Vec2::new(6.0, 0.0))
            .add_ball("ball_right", Vec2::new(12.0, 2.0), 0.4, Vec2::new(-5.0, 1.0))
            .add_trigger_zone("goal", Vec2::new(-2.0, 1.0), 2.0, 2.0)
            .with_behaviour("goal", Box::new(LoggingBehaviour::new("goal")))
            .with_behaviour("crate_low", Box::new(LoggingBehaviour::new("crate_low")))
    }

    /// Add a static floor whose top surface lies at `y`
    pub fn add_floor(mut self, y: f32, width: f32, material: PhysicsMaterial) -> Self {
        let body = RigidBody2D::new_static_box(Vec2::new(0.0, y - 0.5), width, 1.0)
            .with_material(material)
            .with_filter(CollisionFilter::static_world());
        self.scene
            .spawn(Entity::new().with_name("floor").with_tag("static"), body);
        self
    }

    /// Add a static vertical wall centered on `x`, spanning `bottom..top`
    pub fn add_wall(mut self, x: f32, bottom: f32, top: f32, material: PhysicsMaterial) -> Self {
        let height = (top - bottom).abs();
        let center = Vec2::new(x, (top + bottom) * 0.5);
        let body = RigidBody2D::new_static_box(center, 1.0, height)
            .with_material(material)
            .with_filter(CollisionFilter::static_world());
        self.scene.spawn(Entity::new().with_tag("static"), body);
        self
    }

    /// Add a dynamic box
    pub fn add_box(mut self, name: &str, position: Vec2, width: f32, height: f32) -> Self {
        let body = RigidBody2D::new_box(position, width, height)
            .with_body_type(BodyType::Dynamic)
            .with_mass(2.0)
            .with_material(PhysicsMaterial::WOOD);
        self.scene
            .spawn(Entity::new().with_name(name).with_tag("dynamic"), body);
        self
    }

    /// Add a dynamic ball with an initial velocity
    pub fn add_ball(mut self, name: &str, position: Vec2, radius: f32, velocity: Vec2) -> Self {
        let body = RigidBody2D::new_circle(position, radius)
            .with_velocity(velocity)
            .with_material(PhysicsMaterial::RUBBER)
            .with_angular_damping(0.1);
        self.scene
            .spawn(Entity::new().with_name(name).with_tag("dynamic"), body);
        self
    }

    /// Add a static trigger zone that reports overlaps without blocking
    pub fn add_trigger_zone(mut self, name: &str, center: Vec2, width: f32, height: f32) -> Self {
        let body = RigidBody2D::new_static_box(center, width, height)
            .with_trigger(true)
            .with_filter(CollisionFilter::trigger(CollisionLayer::ALL));
        self.scene
            .spawn(Entity::new().with_name(name).with_tag("trigger"), body);
        self
    }

    /// Add a custom entity, optionally driven by a body
    pub fn add_entity(mut self, entity: Entity, body: Option<RigidBody2D>) -> Self {
        match body {
            Some(body) => {
                self.scene.spawn(entity, body);
            }
            None => {
                self.scene.add_entity(entity);
            }
        }
        self
    }

    /// Attach a behaviour to the named entity
    pub fn with_behaviour(mut self, name: &str, behaviour: Box<dyn ContactListener>) -> Self {
        let Some((handle, _)) = self.scene.get_by_name(name) else {
            log::warn!("No entity named '{}' to attach a behaviour to", name);
            return self;
        };
        if let Err(e) = self.scene.attach_behaviour(handle, behaviour) {
            log::warn!("Could not attach behaviour to '{}': {}", name, e);
        }
        self
    }

    /// Build the scene
    pub fn build(self) -> Scene {
        self.scene
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
