//! Planar - 2D rigid-body simulation
//!
//! Scenes of entities driven by the `planar_physics` world, loaded from
//! layered configuration and stepped at a fixed rate.

pub mod config;
pub mod scene;
pub mod systems;
