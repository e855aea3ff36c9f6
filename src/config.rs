//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`PLANAR_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use planar_math::Vec2;
use planar_physics::PhysicsConfig;
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSettings,
    /// Frame driver configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`PLANAR_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // User overrides are optional
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // PLANAR_PHYSICS__FRICTION_ENABLED=false -> physics.friction_enabled = false
        figment = figment.merge(Env::prefixed("PLANAR_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Physics configuration as written in the config files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Gravity acceleration [x, y]
    pub gravity: [f32; 2],
    /// Seconds per physics step (clamped to 1/60..1/50)
    pub fixed_timestep: f32,
    /// Broad-phase grid size in cells [width, height]
    pub grid_partitions: [u32; 2],
    /// Bottom-left corner of the simulated viewport
    pub world_min: [f32; 2],
    /// Top-right corner of the simulated viewport
    pub world_max: [f32; 2],
    /// Apply friction impulses
    pub friction_enabled: bool,
    /// Most physics steps per rendered frame
    pub max_substeps: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        let core = PhysicsConfig::default();
        Self {
            gravity: core.gravity.to_array(),
            fixed_timestep: core.fixed_timestep,
            grid_partitions: [core.grid_partitions.0, core.grid_partitions.1],
            world_min: core.world_bounds.min.to_array(),
            world_max: core.world_bounds.max.to_array(),
            friction_enabled: core.friction_enabled,
            max_substeps: core.max_substeps,
        }
    }
}

impl PhysicsSettings {
    /// Convert to the physics engine's PhysicsConfig
    pub fn to_physics_config(&self) -> PhysicsConfig {
        let config = PhysicsConfig {
            fixed_timestep: self.fixed_timestep,
            gravity: Vec2::from(self.gravity),
            grid_partitions: (self.grid_partitions[0], self.grid_partitions[1]),
            max_substeps: self.max_substeps,
            friction_enabled: self.friction_enabled,
            ..PhysicsConfig::default()
        }
        .with_bounds(Vec2::from(self.world_min), Vec2::from(self.world_max));

        if let Err(e) = config.validate() {
            log::warn!("Physics settings will be clamped: {}", e);
        }
        config
    }
}

/// Frame driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames the headless demo runs
    pub frames: u32,
    /// Simulated wall-clock duration of one frame, in seconds
    pub frame_time: f32,
    /// Run physics on its own thread, handing frames to the main thread
    pub threaded: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            frame_time: 1.0 / 60.0,
            threaded: false,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log every contact event
    pub log_events: bool,
    /// Print body positions every this many frames (0 = never)
    pub report_interval: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_events: true,
            report_interval: 60,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
