//! Scene layer
//!
//! Entities bound to physics bodies, transform sync after each step, and
//! behaviours that receive contact notifications.

mod behaviour;
mod entity;
mod scene_builder;
mod world;

pub use behaviour::{ContactCounter, ContactCounts, LoggingBehaviour};
pub use entity::{DirtyFlags, Entity};
pub use scene_builder::SceneBuilder;
pub use world::{EntityHandle, Scene, SceneError};
