//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use planar::config::AppConfig;
use serial_test::serial;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("planar_config_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("PLANAR_PHYSICS__FRICTION_ENABLED", "false");
    std::env::set_var("PLANAR_SIMULATION__FRAMES", "42");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("PLANAR_PHYSICS__FRICTION_ENABLED");
    std::env::remove_var("PLANAR_SIMULATION__FRAMES");

    assert!(!config.physics.friction_enabled);
    assert_eq!(config.simulation.frames, 42);
}

#[test]
#[serial]
fn test_default_file_loading() {
    // Runs from the package root, where config/default.toml lives
    let config = AppConfig::load().unwrap();
    assert_eq!(config.physics.grid_partitions, [16, 16]);
    assert_eq!(config.physics.gravity, [0.0, -9.81]);
    assert!(config.physics.to_physics_config().validate().is_ok());
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user");
    fs::write(
        dir.join("default.toml"),
        "[physics]\nfixed_timestep = 0.02\ngrid_partitions = [8, 8]\n",
    )
    .unwrap();
    fs::write(dir.join("user.toml"), "[physics]\ngrid_partitions = [4, 2]\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    fs::remove_dir_all(&dir).ok();

    assert_eq!(config.physics.fixed_timestep, 0.02);
    assert_eq!(config.physics.grid_partitions, [4, 2]);
    assert_eq!(config.physics.to_physics_config().grid_partitions, (4, 2));
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = scratch_dir("bad");
    fs::write(dir.join("default.toml"), "[physics]\nfixed_timestep = \"fast\"\n").unwrap();

    let result = AppConfig::load_from(&dir);
    fs::remove_dir_all(&dir).ok();

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
