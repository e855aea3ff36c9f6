//! Rigid body types for 2D physics simulation

use planar_math::Vec2;
use slotmap::new_key_type;

use crate::error::PhysicsError;
use crate::filter::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Aabb2D, Shape, ShapeKind};
use crate::transform::Transform2D;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing so a key to a removed body never aliases a
    /// body later inserted into the same slot.
    pub struct BodyKey;
}

/// How a body takes part in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    /// Moved by forces, gravity, and collision impulses
    #[default]
    Dynamic,
    /// Never moves
    Static,
    /// Moves by its own velocity but ignores forces and impulses
    Kinematic,
}

/// A 2D rigid body: one shape plus its physical state
#[derive(Clone, Debug)]
pub struct RigidBody2D {
    transform: Transform2D,
    shape: Shape,
    /// Linear velocity (units per second)
    pub linear_velocity: Vec2,
    /// Angular velocity (radians per second, counter-clockwise)
    pub angular_velocity: f32,
    accumulated_force: Vec2,
    mass: f32,
    mass_inv: f32,
    inertia: f32,
    inertia_inv: f32,
    body_type: BodyType,
    /// Whether this body is affected by gravity
    pub affected_by_gravity: bool,
    /// Friction and restitution
    pub material: PhysicsMaterial,
    /// Fraction of angular velocity removed per second
    pub angular_damping: f32,
    /// Layer filtering for the broad phase
    pub filter: CollisionFilter,
    /// Inactive bodies are neither integrated nor tested for collisions
    pub active: bool,
}

impl RigidBody2D {
    /// Create a dynamic body with unit mass
    pub fn new(shape: Shape, transform: Transform2D) -> Self {
        let mut body = Self {
            transform,
            shape,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            accumulated_force: Vec2::ZERO,
            mass: 1.0,
            mass_inv: 1.0,
            inertia: 0.0,
            inertia_inv: 0.0,
            body_type: BodyType::Dynamic,
            affected_by_gravity: true,
            material: PhysicsMaterial::default(),
            angular_damping: 0.0,
            filter: CollisionFilter::default(),
            active: true,
        };
        body.recompute_mass_properties();
        body.shape.update(&body.transform);
        body
    }

    /// Create a dynamic circle body
    pub fn new_circle(position: Vec2, radius: f32) -> Self {
        Self::new(Shape::circle(radius), Transform2D::from_position(position))
    }

    /// Create a dynamic box body
    pub fn new_box(position: Vec2, width: f32, height: f32) -> Self {
        Self::new(Shape::rectangle(width, height), Transform2D::from_position(position))
    }

    /// Create a dynamic convex polygon body
    pub fn new_polygon(position: Vec2, vertices: Vec<Vec2>) -> Self {
        Self::new(Shape::polygon(vertices), Transform2D::from_position(position))
    }

    /// Create a static box that never moves
    pub fn new_static_box(position: Vec2, width: f32, height: f32) -> Self {
        Self::new_box(position, width, height).with_body_type(BodyType::Static)
    }

    /// Set the linear velocity of this body
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the angular velocity (radians per second)
    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Set the mass of this body (negative values clamp to 0)
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.apply_mass(mass);
        self
    }

    /// Set the physics material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set whether this body is affected by gravity
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Set the body type
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.set_body_type(body_type);
        self
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.set_rotation(degrees);
        self
    }

    /// Mark the body's shape as a trigger
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.shape.is_trigger = is_trigger;
        self
    }

    /// Set the collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the angular damping (clamped to [0, 1])
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping.clamp(0.0, 1.0);
        self
    }

    // ----- Transform provider -----

    #[inline]
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position()
    }

    /// Rotation in degrees
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.transform.rotation()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.set_position(position);
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.transform.set_rotation(degrees);
    }

    /// Set the world scale; inertia depends on scaled geometry
    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform.set_scale(scale);
        self.recompute_mass_properties();
    }

    /// Apply a positional correction (e.g., from collision separation)
    pub fn apply_correction(&mut self, correction: Vec2) {
        self.transform.translate(correction);
    }

    // ----- Shape -----

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Replace the collision shape
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.recompute_mass_properties();
        self.shape.update(&self.transform);
    }

    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.shape.is_trigger
    }

    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.shape.is_trigger = is_trigger;
    }

    /// Refresh the shape's world cache from the current transform
    pub fn update_shape(&mut self) -> bool {
        self.shape.update(&self.transform)
    }

    /// World-space AABB, refreshed if the transform changed
    pub fn aabb(&mut self) -> Aabb2D {
        self.shape.aabb(&self.transform)
    }

    // ----- Mass -----

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn mass_inv(&self) -> f32 {
        self.mass_inv
    }

    #[inline]
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    #[inline]
    pub fn inertia_inv(&self) -> f32 {
        self.inertia_inv
    }

    /// Set the mass
    ///
    /// A negative mass is clamped to 0 (static treatment) and reported.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        let result = if mass < 0.0 {
            Err(PhysicsError::NegativeMass(mass))
        } else {
            Ok(())
        };
        self.apply_mass(mass);
        result
    }

    fn apply_mass(&mut self, mass: f32) {
        if mass < 0.0 {
            log::warn!("Body mass {} is negative, clamping to 0", mass);
        }
        self.mass = mass.max(0.0);
        self.recompute_mass_properties();
    }

    #[inline]
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        if body_type == BodyType::Static {
            self.affected_by_gravity = false;
            self.linear_velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
        }
        self.recompute_mass_properties();
    }

    /// Static bodies, and dynamic bodies with zero mass, never move
    #[inline]
    pub fn is_static(&self) -> bool {
        match self.body_type {
            BodyType::Static => true,
            BodyType::Dynamic => self.mass == 0.0,
            BodyType::Kinematic => false,
        }
    }

    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.body_type == BodyType::Kinematic
    }

    /// Recompute inverse mass and inertia from mass, shape, and scale
    ///
    /// Runs whenever one of those inputs changes so the solver only reads
    /// cached reciprocals. Bodies rotate about their transform origin, so a
    /// shape whose center is offset from it adds a parallel-axis term.
    fn recompute_mass_properties(&mut self) {
        if self.body_type != BodyType::Dynamic || self.mass == 0.0 {
            self.mass_inv = 0.0;
            self.inertia = 0.0;
            self.inertia_inv = 0.0;
            return;
        }

        let m = self.mass;
        let scale = self.transform.scale().abs();
        self.inertia = match self.shape.kind() {
            ShapeKind::Circle { radius } => {
                let r = radius * scale.max_element();
                0.5 * m * r * r
            }
            ShapeKind::Box { .. } | ShapeKind::Polygon => {
                let size = self.shape.local_size().component_mul(scale);
                m * (size.x * size.x + size.y * size.y) / 12.0
            }
        };
        let center = self.shape.local_center().component_mul(scale);
        self.inertia += m * center.length_squared();
        self.mass_inv = 1.0 / m;
        self.inertia_inv = if self.inertia > 0.0 { 1.0 / self.inertia } else { 0.0 };
    }

    // ----- Forces and integration -----

    /// Accumulate a force to be applied during the next integration
    pub fn add_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    #[inline]
    pub fn accumulated_force(&self) -> Vec2 {
        self.accumulated_force
    }

    /// Apply an impulse at `contact_arm` (contact point relative to the center)
    pub fn apply_impulse(&mut self, impulse: Vec2, contact_arm: Vec2) {
        self.linear_velocity += impulse * self.mass_inv;
        self.angular_velocity += contact_arm.cross(impulse) * self.inertia_inv;
    }

    /// Advance velocity and position by `dt` seconds
    ///
    /// Static bodies are left untouched. Kinematic bodies move by their
    /// velocity but ignore gravity and forces. The accumulated force is
    /// cleared in every case.
    pub fn integrate(&mut self, dt: f32, gravity: Vec2) {
        if self.is_static() {
            self.accumulated_force = Vec2::ZERO;
            return;
        }

        if self.body_type == BodyType::Dynamic {
            if self.affected_by_gravity {
                self.linear_velocity += gravity * dt;
            }
            self.linear_velocity += self.accumulated_force * self.mass_inv * dt;
            if self.angular_damping > 0.0 {
                self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);
            }
        }

        if self.linear_velocity != Vec2::ZERO {
            self.transform.translate(self.linear_velocity * dt);
        }
        if self.angular_velocity != 0.0 {
            self.transform.rotate((self.angular_velocity * dt).to_degrees());
        }

        self.accumulated_force = Vec2::ZERO;
    }
}
