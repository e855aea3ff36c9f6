//! Planar - headless physics demo
//!
//! Builds the demo scene, steps it for the configured number of frames and
//! logs contact events and body positions.

use planar::config::AppConfig;
use planar::scene::{Scene, SceneBuilder};
use planar::systems::{SimulationResult, SimulationSystem, ThreadedSimulation};

fn main() {
    // Load configuration before logging so the configured level applies
    let config_result = AppConfig::load();
    let log_level = config_result
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config_result.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Planar");

    let scene = SceneBuilder::demo(config.physics.to_physics_config()).build();
    log::info!(
        "Demo scene: {} entities, {} bodies",
        scene.entity_count(),
        scene.physics().body_count()
    );

    let frames = config.simulation.frames;
    let frame_time = config.simulation.frame_time;

    let scene = if config.simulation.threaded {
        run_threaded(scene, &config, frames, frame_time)
    } else {
        Some(run_inline(scene, &config, frames, frame_time))
    };

    match scene {
        Some(scene) => {
            report_positions(&scene, frames as u64);
            log::info!("Finished after {} frames", frames);
        }
        None => log::error!("Simulation ended abnormally"),
    }
}

fn run_inline(mut scene: Scene, config: &AppConfig, frames: u32, frame_time: f32) -> Scene {
    let mut sim = SimulationSystem::new(scene.config());
    for frame in 1..=frames as u64 {
        scene.clear_dirty();
        let result = sim.advance(&mut scene, frame_time);
        report_frame(&scene, config, frame, &result);
    }
    scene
}

fn run_threaded(scene: Scene, config: &AppConfig, frames: u32, frame_time: f32) -> Option<Scene> {
    log::info!("Running physics on a background thread");
    let sim = ThreadedSimulation::spawn(scene, frames, frame_time);
    while sim
        .next_frame(|frame, scene, result| report_frame(scene, config, frame, result))
        .is_some()
    {}
    sim.finish()
}

fn report_frame(scene: &Scene, config: &AppConfig, frame: u64, result: &SimulationResult) {
    if config.debug.log_events {
        for event in &result.events {
            log::info!(
                "frame {}: {:?} {} <-> {}{}",
                frame,
                event.phase,
                scene.describe_body(event.pair.first()),
                scene.describe_body(event.pair.second()),
                if event.is_trigger { " (trigger)" } else { "" }
            );
        }
    }

    let interval = config.debug.report_interval as u64;
    if interval > 0 && frame % interval == 0 {
        report_positions(scene, frame);
    }

    let stats = scene.physics().stats();
    log::trace!(
        "frame {}: {} steps, {} candidate pairs, {} contacts",
        frame,
        result.steps,
        stats.candidate_pairs,
        stats.contacts
    );
}

fn report_positions(scene: &Scene, frame: u64) {
    log::info!("--- frame {} ---", frame);
    for (handle, entity) in scene.iter_with_handles() {
        if !entity.has_tag("dynamic") {
            continue;
        }
        if let Some(body) = scene.body_of(handle) {
            let pos = body.position();
            log::info!(
                "{:>14} pos ({:7.3}, {:7.3}) rot {:7.2} vel ({:6.2}, {:6.2})",
                entity.name.as_deref().unwrap_or("?"),
                pos.x,
                pos.y,
                body.rotation(),
                body.linear_velocity.x,
                body.linear_velocity.y
            );
        }
    }
}
