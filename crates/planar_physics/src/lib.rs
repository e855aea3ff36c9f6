//! 2D rigid-body physics for planar
//!
//! This crate provides the physics core of the engine, including:
//! - Collision shapes (circles, boxes, convex polygons) with cached world data
//! - Uniform-grid broad phase and separating-axis narrow phase
//! - Impulse-based collision response with restitution and friction
//! - Enter/Stay/Exit collision and trigger notifications
//! - A fixed-timestep accumulator and a physics/render hand-off barrier

pub mod body;
pub mod contact;
pub mod error;
pub mod events;
pub mod filter;
pub mod grid;
pub mod handoff;
pub mod material;
pub mod sat;
pub mod shapes;
pub mod timestep;
pub mod transform;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, RigidBody2D};
pub use contact::{CollisionManifold, ContactPair, ContactPoints, Penetration};
pub use error::PhysicsError;
pub use events::{ContactEvent, ContactListener, ContactPhase, ContactTracker};
pub use filter::{CollisionFilter, CollisionLayer};
pub use grid::{BroadPhaseProxy, SpatialGrid};
pub use handoff::FrameHandoff;
pub use material::PhysicsMaterial;
pub use shapes::{Aabb2D, Shape, ShapeKind};
pub use timestep::FixedTimestep;
pub use transform::Transform2D;
pub use world::{PhysicsConfig, PhysicsWorld, StepStats, MAX_TIMESTEP, MIN_TIMESTEP};
