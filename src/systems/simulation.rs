//! Game simulation system
//!
//! Manages the frame loop simulation including:
//! - Delta time calculation
//! - Fixed-step accumulation
//! - Scene stepping and transform sync

use std::time::Instant;

use planar_physics::{ContactEvent, FixedTimestep, PhysicsConfig};

use crate::scene::Scene;

/// Result of a simulation update
#[derive(Clone, Debug, Default)]
pub struct SimulationResult {
    /// Physics steps run this frame
    pub steps: u32,
    /// Interpolation factor between the last two steps
    pub alpha: f32,
    /// Contact notifications from every step of the frame, in order
    pub events: Vec<ContactEvent>,
    /// Whether any entity moved or changed body
    pub geometry_dirty: bool,
}

/// Manages the simulation loop
///
/// Frame time feeds a fixed-step accumulator; the scene is stepped as
/// many times as the accumulated time allows.
pub struct SimulationSystem {
    last_frame: Instant,
    timestep: FixedTimestep,
}

impl SimulationSystem {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            last_frame: Instant::now(),
            timestep: FixedTimestep::new(config.timestep(), config.max_substeps),
        }
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Run one frame using the wall-clock time since the previous call
    pub fn update(&mut self, scene: &mut Scene) -> SimulationResult {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(scene, dt)
    }

    /// Run one frame of the given duration
    pub fn advance(&mut self, scene: &mut Scene, frame_time: f32) -> SimulationResult {
        // Settings may have changed since the last frame
        let config = scene.config();
        self.timestep.set_step(config.timestep());
        self.timestep.set_max_substeps(config.max_substeps);

        let steps = self.timestep.advance(frame_time);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend_from_slice(scene.step());
        }

        SimulationResult {
            steps,
            alpha: self.timestep.alpha(),
            events,
            geometry_dirty: scene.has_dirty_entities(),
        }
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}
