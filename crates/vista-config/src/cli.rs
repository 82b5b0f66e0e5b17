//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, HeightMapFormat};

/// Command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "vista", about = "Height-map terrain with frustum culling")]
pub struct CliArgs {
    /// Height map path.
    #[arg(long)]
    pub height_map: Option<PathBuf>,

    /// Treat the height map as headerless 16-bit RAW instead of a bitmap.
    #[arg(long)]
    pub raw: bool,

    /// Color map path.
    #[arg(long)]
    pub color_map: Option<PathBuf>,

    /// Terrain width in samples.
    #[arg(long)]
    pub width: Option<u32>,

    /// Terrain height (depth) in samples.
    #[arg(long)]
    pub height: Option<u32>,

    /// Divisor applied to raw height samples.
    #[arg(long)]
    pub height_scale: Option<f32>,

    /// Samples per cell edge.
    #[arg(long)]
    pub cell_size: Option<u32>,

    /// Far clip distance.
    #[arg(long)]
    pub screen_depth: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.height_map {
            self.terrain.height_map = path.clone();
        }
        if args.raw {
            self.terrain.height_map_format = HeightMapFormat::Raw16;
        }
        if let Some(ref path) = args.color_map {
            self.terrain.color_map = path.clone();
        }
        if let Some(w) = args.width {
            self.terrain.width = w;
        }
        if let Some(h) = args.height {
            self.terrain.height = h;
        }
        if let Some(scale) = args.height_scale {
            self.terrain.height_scale = scale;
        }
        if let Some(size) = args.cell_size {
            self.terrain.cell_size = size;
        }
        if let Some(depth) = args.screen_depth {
            self.camera.screen_depth = depth;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from([
            "vista",
            "--width",
            "129",
            "--height",
            "129",
            "--raw",
            "--height-map",
            "maps/plateau.r16",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.width, 129);
        assert_eq!(config.terrain.height, 129);
        assert_eq!(config.terrain.height_map_format, HeightMapFormat::Raw16);
        assert_eq!(config.terrain.height_map, PathBuf::from("maps/plateau.r16"));
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.cell_size, 33);
        assert_eq!(config.camera.screen_depth, 1000.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_camera_and_log_level() {
        let mut config = Config::default();
        let args = CliArgs::parse_from(["vista", "--screen-depth", "250", "--log-level", "debug"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.camera.screen_depth, 250.0);
        assert_eq!(config.debug.log_level, "debug");
    }
}
