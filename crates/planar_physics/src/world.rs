//! Physics world and simulation

use planar_math::{nearly_equal_vec, Vec2};
use slotmap::{SecondaryMap, SlotMap};

use crate::body::{BodyKey, RigidBody2D};
use crate::contact::{CollisionManifold, ContactPair, ContactPoints, Penetration};
use crate::error::PhysicsError;
use crate::events::{ContactEvent, ContactListener, ContactTracker};
use crate::grid::{BroadPhaseProxy, SpatialGrid};
use crate::sat;
use crate::shapes::Aabb2D;

/// Shortest accepted fixed timestep (60 Hz)
pub const MIN_TIMESTEP: f32 = 1.0 / 60.0;
/// Longest accepted fixed timestep (50 Hz)
pub const MAX_TIMESTEP: f32 = 1.0 / 50.0;

/// Settings read by [`PhysicsWorld::step`]
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Seconds per step, clamped into [`MIN_TIMESTEP`, `MAX_TIMESTEP`]
    pub fixed_timestep: f32,
    /// Gravity acceleration
    pub gravity: Vec2,
    /// Broad-phase grid dimensions in cells
    pub grid_partitions: (u32, u32),
    /// Viewport covered by the broad phase; bodies outside are culled
    pub world_bounds: Aabb2D,
    /// Apply Coulomb friction impulses
    pub friction_enabled: bool,
    /// Most steps run for one frame by the accumulator
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: MIN_TIMESTEP,
            gravity: Vec2::new(0.0, -9.81),
            grid_partitions: (16, 16),
            world_bounds: Aabb2D::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0)),
            friction_enabled: true,
            max_substeps: 8,
        }
    }
}

impl PhysicsConfig {
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_timestep(mut self, seconds: f32) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid_partitions = (width, height);
        self
    }

    pub fn with_bounds(mut self, bottom_left: Vec2, top_right: Vec2) -> Self {
        self.world_bounds = Aabb2D::new(bottom_left, top_right);
        self
    }

    pub fn with_friction(mut self, enabled: bool) -> Self {
        self.friction_enabled = enabled;
        self
    }

    /// The step length actually used, after clamping
    pub fn timestep(&self) -> f32 {
        if self.fixed_timestep.is_finite() {
            self.fixed_timestep.clamp(MIN_TIMESTEP, MAX_TIMESTEP)
        } else {
            MIN_TIMESTEP
        }
    }

    /// Report settings that will be clamped when stepping
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let (width, height) = self.grid_partitions;
        if width == 0 || height == 0 {
            return Err(PhysicsError::InvalidGrid { width, height });
        }
        Ok(())
    }
}

/// Counters from the most recent step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Active bodies considered by the step
    pub bodies: usize,
    /// Bodies skipped by the broad phase for lying outside the viewport
    pub culled: usize,
    /// Pairs proposed by the broad phase
    pub candidate_pairs: usize,
    /// Pairs confirmed by the narrow phase
    pub contacts: usize,
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody2D>,
    /// Bodies added since the last step; activated when the next step starts
    pending_add: SecondaryMap<BodyKey, ()>,
    /// Bodies to remove when the next step starts
    pending_remove: Vec<BodyKey>,
    listeners: SecondaryMap<BodyKey, Box<dyn ContactListener>>,
    grid: SpatialGrid,
    grid_partitions: (u32, u32),
    world_bounds: Aabb2D,
    last_timestep: f32,
    tracker: ContactTracker,
    proxies: Vec<BroadPhaseProxy>,
    manifolds: Vec<CollisionManifold>,
    events: Vec<ContactEvent>,
    stats: StepStats,
}

impl PhysicsWorld {
    /// Create a new physics world with the default grid
    pub fn new() -> Self {
        Self::with_config(&PhysicsConfig::default())
    }

    /// Create a world whose grid matches `config`
    pub fn with_config(config: &PhysicsConfig) -> Self {
        let bounds = config.world_bounds;
        let (width, height) = config.grid_partitions;
        Self {
            bodies: SlotMap::with_key(),
            pending_add: SecondaryMap::new(),
            pending_remove: Vec::new(),
            listeners: SecondaryMap::new(),
            grid: SpatialGrid::new(bounds.min, bounds.max, width, height),
            grid_partitions: config.grid_partitions,
            world_bounds: bounds,
            last_timestep: config.fixed_timestep,
            tracker: ContactTracker::new(),
            proxies: Vec::new(),
            manifolds: Vec::new(),
            events: Vec::new(),
            stats: StepStats::default(),
        }
    }

    /// Add a body to the world
    ///
    /// The body is stored immediately but only takes part in the simulation
    /// (and in queries) from the next step on.
    pub fn add_body(&mut self, mut body: RigidBody2D) -> BodyKey {
        if let Err(err) = body.shape().validate() {
            log::warn!("Adding body with unusable shape, it will never collide: {}", err);
        }
        body.update_shape();
        let key = self.bodies.insert(body);
        self.pending_add.insert(key, ());
        key
    }

    /// Queue a body for removal at the start of the next step
    ///
    /// Contacts involving the body are dropped without an Exit notification.
    pub fn remove_body(&mut self, key: BodyKey) -> Result<(), PhysicsError> {
        if !self.bodies.contains_key(key) {
            return Err(PhysicsError::UnknownBody);
        }
        if !self.pending_remove.contains(&key) {
            self.pending_remove.push(key);
        }
        Ok(())
    }

    /// Whether the body is queued for removal
    pub fn is_pending_removal(&self, key: BodyKey) -> bool {
        self.pending_remove.contains(&key)
    }

    /// Get a reference to a body by its key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody2D> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by its key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody2D> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Iterate over all bodies with their keys
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody2D)> {
        self.bodies.iter()
    }

    /// Set the mass of a body, recomputing its inverse mass and inertia
    pub fn set_mass(&mut self, key: BodyKey, mass: f32) -> Result<(), PhysicsError> {
        self.bodies
            .get_mut(key)
            .ok_or(PhysicsError::UnknownBody)?
            .set_mass(mass)
    }

    /// Attach a listener that receives the body's contact notifications
    ///
    /// Replaces any listener already attached to the body.
    pub fn set_listener(
        &mut self,
        key: BodyKey,
        listener: Box<dyn ContactListener>,
    ) -> Result<(), PhysicsError> {
        if !self.bodies.contains_key(key) {
            return Err(PhysicsError::UnknownBody);
        }
        self.listeners.insert(key, listener);
        Ok(())
    }

    pub fn remove_listener(&mut self, key: BodyKey) -> Option<Box<dyn ContactListener>> {
        self.listeners.remove(key)
    }

    /// Notifications produced by the last step, in delivery order
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Collisions confirmed by the last step
    pub fn manifolds(&self) -> &[CollisionManifold] {
        &self.manifolds
    }

    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Whether the pair was touching at the end of the last step
    pub fn is_touching(&self, a: BodyKey, b: BodyKey) -> bool {
        self.tracker.is_touching(&ContactPair::new(a, b))
    }

    /// Broad-phase grid as of the last step
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Simulated bodies whose cached AABB overlaps `area`
    pub fn query_aabb(&self, area: &Aabb2D) -> Vec<BodyKey> {
        self.simulated()
            .filter(|(_, body)| body.shape().cached_aabb().overlaps(area))
            .map(|(key, _)| key)
            .collect()
    }

    /// Simulated bodies whose shape contains `point`
    pub fn query_point(&self, point: Vec2) -> Vec<BodyKey> {
        self.simulated()
            .filter(|(_, body)| body.shape().contains_point(point))
            .map(|(key, _)| key)
            .collect()
    }

    fn simulated(&self) -> impl Iterator<Item = (BodyKey, &RigidBody2D)> {
        self.bodies
            .iter()
            .filter(|(key, body)| body.active && !self.pending_add.contains_key(*key))
    }

    /// Step the physics simulation forward by one fixed timestep
    ///
    /// This performs, in order:
    /// 1. Applying queued additions and removals
    /// 2. Force and velocity integration
    /// 3. Broad phase (grid rebuild and candidate pairs)
    /// 4. Narrow phase (SAT on each candidate)
    /// 5. Positional separation
    /// 6. Impulse resolution with friction
    /// 7. Enter/Stay/Exit notification
    pub fn step(&mut self, config: &PhysicsConfig) {
        self.apply_config(config);
        self.apply_pending();

        let dt = config.timestep();

        // Phase 2: Integrate
        for (_key, body) in &mut self.bodies {
            if body.active {
                body.integrate(dt, config.gravity);
            }
        }

        // Phase 3: Broad phase
        self.proxies.clear();
        for (key, body) in &mut self.bodies {
            if !body.active {
                continue;
            }
            self.proxies.push(BroadPhaseProxy {
                key,
                aabb: body.aabb(),
                is_static: body.is_static(),
                filter: body.filter,
            });
        }
        self.grid.rebuild(&self.proxies);
        let candidates = self.grid.candidate_pairs(&self.proxies);

        // Phase 4: Narrow phase
        let hits = self.narrow_phase(&candidates);

        // Phase 5: Separate
        for (pair, penetration, is_trigger) in &hits {
            if !is_trigger {
                self.separate(*pair, penetration);
            }
        }

        // Contact points are taken from the separated positions
        self.manifolds.clear();
        for (pair, penetration, is_trigger) in hits {
            let (Some(a), Some(b)) = (self.bodies.get(pair.first()), self.bodies.get(pair.second()))
            else {
                continue;
            };
            let contacts = sat::contact_points(a.shape(), b.shape())
                .unwrap_or_else(|| ContactPoints::single(a.shape().world_center()));
            self.manifolds.push(CollisionManifold {
                body_a: pair.first(),
                body_b: pair.second(),
                normal: penetration.normal,
                depth: penetration.depth,
                contacts,
                is_trigger,
            });
        }

        // Phase 6: Resolve
        for i in 0..self.manifolds.len() {
            let manifold = self.manifolds[i];
            if !manifold.is_trigger {
                self.resolve(&manifold, config.friction_enabled);
            }
        }

        // Phase 7: Notify
        self.notify();

        self.stats = StepStats {
            bodies: self.proxies.len(),
            culled: self.grid.culled_count(),
            candidate_pairs: candidates.len(),
            contacts: self.manifolds.len(),
        };
        log::trace!(
            "Physics step: {} bodies, {} culled, {} candidates, {} contacts, {} events",
            self.stats.bodies,
            self.stats.culled,
            self.stats.candidate_pairs,
            self.stats.contacts,
            self.events.len()
        );
    }

    /// Resize or move the grid when the settings changed since the last step
    fn apply_config(&mut self, config: &PhysicsConfig) {
        if config.grid_partitions != self.grid_partitions {
            log::debug!(
                "Resizing broad-phase grid from {:?} to {:?}",
                self.grid_partitions,
                config.grid_partitions
            );
            let (width, height) = config.grid_partitions;
            self.grid.resize(width, height);
            self.grid_partitions = config.grid_partitions;
        }
        if config.world_bounds != self.world_bounds {
            self.grid.set_bounds(config.world_bounds.min, config.world_bounds.max);
            self.world_bounds = config.world_bounds;
        }
        if config.fixed_timestep != self.last_timestep {
            if config.timestep() != config.fixed_timestep {
                log::warn!(
                    "Fixed timestep {} is outside [{}, {}], using {}",
                    config.fixed_timestep,
                    MIN_TIMESTEP,
                    MAX_TIMESTEP,
                    config.timestep()
                );
            }
            self.last_timestep = config.fixed_timestep;
        }
    }

    /// Phase 1: drain the add/remove queues
    fn apply_pending(&mut self) {
        for key in self.pending_remove.drain(..) {
            if self.bodies.remove(key).is_some() {
                self.listeners.remove(key);
                self.pending_add.remove(key);
                self.tracker.forget_body(key);
                log::debug!("Removed body {:?}", key);
            }
        }
        self.pending_add.clear();
    }

    fn narrow_phase(&self, candidates: &[ContactPair]) -> Vec<(ContactPair, Penetration, bool)> {
        let mut hits = Vec::with_capacity(candidates.len());
        for &pair in candidates {
            // Pairs naming a body that no longer exists are dropped
            let (Some(a), Some(b)) = (self.bodies.get(pair.first()), self.bodies.get(pair.second()))
            else {
                continue;
            };
            if let Some(penetration) = sat::intersects(a.shape(), b.shape()) {
                let is_trigger = a.is_trigger() || b.is_trigger();
                hits.push((pair, penetration, is_trigger));
            }
        }
        hits
    }

    /// Push the two bodies apart along the normal, split by inverse mass
    fn separate(&mut self, pair: ContactPair, penetration: &Penetration) {
        let (key_a, key_b) = (pair.first(), pair.second());
        let inv_a = self.bodies[key_a].mass_inv();
        let inv_b = self.bodies[key_b].mass_inv();
        let total = inv_a + inv_b;
        if total <= 0.0 {
            return;
        }

        let correction = penetration.normal * penetration.depth;
        if inv_a > 0.0 {
            let body = &mut self.bodies[key_a];
            body.apply_correction(-correction * (inv_a / total));
            body.update_shape();
        }
        if inv_b > 0.0 {
            let body = &mut self.bodies[key_b];
            body.apply_correction(correction * (inv_b / total));
            body.update_shape();
        }
    }

    /// Apply restitution and friction impulses for one manifold
    ///
    /// A single impulse acts at the centroid of the contact points, so a
    /// flush edge contact pushes through the middle of the edge.
    fn resolve(&mut self, manifold: &CollisionManifold, friction_enabled: bool) {
        let (key_a, key_b) = (manifold.body_a, manifold.body_b);
        let (a, b) = (&self.bodies[key_a], &self.bodies[key_b]);
        debug_assert!(
            !(a.is_static() && b.is_static()),
            "resolving a collision between two static bodies"
        );

        let inv_mass_a = a.mass_inv();
        let inv_mass_b = b.mass_inv();
        if inv_mass_a + inv_mass_b <= 0.0 {
            return;
        }
        let inv_inertia_a = a.inertia_inv();
        let inv_inertia_b = b.inertia_inv();
        let combined = a.material.combine(&b.material);

        let normal = manifold.normal;
        let point = manifold.contacts.centroid();
        // Arms from the transform origin, the pivot bodies rotate about
        let ra = point - a.position();
        let rb = point - b.position();

        let relative = (b.linear_velocity + rb.perp() * b.angular_velocity)
            - (a.linear_velocity + ra.perp() * a.angular_velocity);
        let along_normal = relative.dot(normal);
        if along_normal > 0.0 {
            // Already separating
            return;
        }

        let ra_n = ra.perp().dot(normal);
        let rb_n = rb.perp().dot(normal);
        let denom = inv_mass_a
            + inv_mass_b
            + ra_n * ra_n * inv_inertia_a
            + rb_n * rb_n * inv_inertia_b;
        let j = -(1.0 + combined.restitution) * along_normal / denom;

        let impulse = normal * j;
        self.bodies[key_a].apply_impulse(-impulse, ra);
        self.bodies[key_b].apply_impulse(impulse, rb);

        if !friction_enabled {
            return;
        }

        let (a, b) = (&self.bodies[key_a], &self.bodies[key_b]);
        let relative = (b.linear_velocity + rb.perp() * b.angular_velocity)
            - (a.linear_velocity + ra.perp() * a.angular_velocity);
        let tangent = relative - normal * relative.dot(normal);
        if nearly_equal_vec(tangent, Vec2::ZERO) {
            return;
        }
        let tangent = tangent.normalized();

        let ra_t = ra.perp().dot(tangent);
        let rb_t = rb.perp().dot(tangent);
        let denom = inv_mass_a
            + inv_mass_b
            + ra_t * ra_t * inv_inertia_a
            + rb_t * rb_t * inv_inertia_b;
        let jt = -relative.dot(tangent) / denom;

        // Coulomb: stick below the static limit, slide above it
        let friction = if jt.abs() <= j * combined.static_friction {
            tangent * jt
        } else {
            tangent * (-j * combined.dynamic_friction)
        };

        self.bodies[key_a].apply_impulse(-friction, ra);
        self.bodies[key_b].apply_impulse(friction, rb);
    }

    /// Diff contacts against the previous step and deliver notifications
    fn notify(&mut self) {
        let current: Vec<(ContactPair, bool)> = self
            .manifolds
            .iter()
            .map(|m| (m.pair(), m.is_trigger))
            .collect();
        self.events = self.tracker.update(&current);

        for event in &self.events {
            for key in [event.pair.first(), event.pair.second()] {
                if let Some(listener) = self.listeners.get_mut(key) {
                    event.dispatch(key, listener.as_mut());
                }
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
