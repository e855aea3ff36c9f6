//! Physics on its own thread
//!
//! The physics thread steps the scene once per frame and publishes it
//! through a [`FrameHandoff`]. The caller reads each published frame on its
//! own thread; neither side touches the scene while the other owns it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use planar_physics::FrameHandoff;

use super::simulation::{SimulationResult, SimulationSystem};
use crate::scene::Scene;

struct Shared {
    scene: Scene,
    last: SimulationResult,
}

/// A scene stepped by a background physics thread
pub struct ThreadedSimulation {
    handoff: Arc<FrameHandoff>,
    shared: Arc<Mutex<Shared>>,
    physics: Option<JoinHandle<()>>,
}

impl ThreadedSimulation {
    /// Start stepping `scene` for `frames` frames of `frame_time` seconds
    pub fn spawn(scene: Scene, frames: u32, frame_time: f32) -> Self {
        let handoff = Arc::new(FrameHandoff::new());
        let shared = Arc::new(Mutex::new(Shared {
            scene,
            last: SimulationResult::default(),
        }));

        let physics = {
            let handoff = Arc::clone(&handoff);
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut sim = SimulationSystem::new(shared.lock().scene.config());
                for _ in 0..frames {
                    if !handoff.begin_step() {
                        return;
                    }
                    {
                        let mut guard = shared.lock();
                        let Shared { scene, last } = &mut *guard;
                        scene.clear_dirty();
                        *last = sim.advance(scene, frame_time);
                    }
                    handoff.finish_step();
                }
                // Let the reader take the last frame before closing
                handoff.begin_step();
                handoff.close();
                log::debug!("Physics thread finished after {} frames", frames);
            })
        };

        Self {
            handoff,
            shared,
            physics: Some(physics),
        }
    }

    /// Wait for the next published frame and read it
    ///
    /// Returns `None` once the physics thread has run all its frames.
    pub fn next_frame<R>(&self, f: impl FnOnce(u64, &Scene, &SimulationResult) -> R) -> Option<R> {
        let frame = self.handoff.begin_render()?;
        let out = {
            let guard = self.shared.lock();
            f(frame, &guard.scene, &guard.last)
        };
        self.handoff.finish_render();
        Some(out)
    }

    /// Stop the physics thread and take the scene back
    ///
    /// Returns `None` if the physics thread panicked.
    pub fn finish(mut self) -> Option<Scene> {
        if !self.stop() {
            return None;
        }
        let shared = Arc::clone(&self.shared);
        drop(self);
        let shared = Arc::try_unwrap(shared).ok()?;
        Some(shared.into_inner().scene)
    }

    /// Close the hand-off and join the physics thread
    ///
    /// Returns `false` if the thread panicked.
    fn stop(&mut self) -> bool {
        self.handoff.close();
        let Some(physics) = self.physics.take() else {
            return true;
        };
        if physics.join().is_err() {
            log::error!("Physics thread panicked");
            return false;
        }
        true
    }
}

impl Drop for ThreadedSimulation {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Entity;
    use planar_math::Vec2;
    use planar_physics::{PhysicsConfig, RigidBody2D};

    #[test]
    fn test_reader_sees_every_frame() {
        let mut scene = Scene::new(PhysicsConfig::default().with_gravity(Vec2::ZERO));
        let handle = scene.spawn(
            Entity::new().with_name("ball"),
            RigidBody2D::new_circle(Vec2::ZERO, 0.5).with_velocity(Vec2::new(6.0, 0.0)),
        );

        let sim = ThreadedSimulation::spawn(scene, 30, 1.0 / 60.0);
        let mut frames = Vec::new();
        let mut last_x = -1.0;
        while let Some((frame, x)) = sim.next_frame(|frame, scene, _| {
            (frame, scene.get_entity(handle).unwrap().transform().position().x)
        }) {
            assert!(x >= last_x);
            last_x = x;
            frames.push(frame);
        }

        assert_eq!(frames, (1..=30).collect::<Vec<u64>>());
        let scene = sim.finish().unwrap();
        let x = scene.get_entity(handle).unwrap().transform().position().x;
        assert!(x > 2.5 && x < 3.5);
    }

    #[test]
    fn test_finish_early_stops_physics() {
        let scene = Scene::default();
        let sim = ThreadedSimulation::spawn(scene, 1000, 1.0 / 60.0);
        assert!(sim.next_frame(|frame, _, _| frame).is_some());
        assert!(sim.finish().is_some());
    }

    #[test]
    fn test_drop_releases_physics_thread() {
        let sim = ThreadedSimulation::spawn(Scene::default(), 1000, 1.0 / 60.0);
        assert!(sim.next_frame(|frame, _, _| frame).is_some());

        let handoff = Arc::clone(&sim.handoff);
        let shared = Arc::clone(&sim.shared);
        drop(sim);

        // The physics thread has exited and let go of the scene
        assert!(handoff.is_closed());
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
