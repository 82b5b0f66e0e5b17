//! Configuration system for the Vista terrain renderer.
//!
//! Terrain, camera and debug settings persisted as `config.ron`. Missing
//! fields fall back to defaults; command-line flags override the file.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, HeightMapFormat, TerrainConfig, default_config_dir,
};
pub use error::ConfigError;
