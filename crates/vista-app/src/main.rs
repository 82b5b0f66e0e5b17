//! Terrain fly-over: builds the configured terrain, orbits a camera above
//! it and reports how many cells survive frustum culling each frame.
//!
//! Run with: `cargo run -p vista-app -- --frames 720`

mod flyover;

use clap::Parser;
use tracing::{debug, error, info, warn};
use vista_config::{CliArgs, Config, default_config_dir};
use vista_render::{Camera, TerrainRenderDriver};
use vista_terrain::Terrain;

#[derive(Parser, Debug)]
#[command(name = "vista", about = "Height-map terrain with frustum culling")]
struct AppArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Number of frames to simulate (one full orbit).
    #[arg(long, default_value_t = 360)]
    frames: u32,

    /// Width of the simulated viewport in pixels.
    #[arg(long, default_value_t = 1600)]
    viewport_width: u32,

    /// Height of the simulated viewport in pixels.
    #[arg(long, default_value_t = 900)]
    viewport_height: u32,
}

fn main() {
    let args = AppArgs::parse();

    let config_dir = args.cli.config.clone().or_else(default_config_dir);
    let (mut config, config_error) = match config_dir.as_deref().map(Config::load_or_create) {
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (Config::default(), Some(err)),
        None => (Config::default(), None),
    };
    config.apply_cli_overrides(&args.cli);

    vista_log::init_logging(config_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if let Some(err) = config_error {
        warn!("Using default configuration: {err}");
    }

    let terrain = match Terrain::build(&config.terrain) {
        Ok(terrain) => terrain,
        Err(err) => {
            error!("Terrain unavailable: {err}");
            std::process::exit(1);
        }
    };
    let (cells_x, cells_z) = terrain.cell_dims();
    info!(
        "Terrain {}x{}: {} cells ({cells_x}x{cells_z}), {} vertices",
        terrain.width(),
        terrain.height(),
        terrain.cells().len(),
        terrain.vertex_count()
    );

    let mut camera = Camera::new(
        config.camera.fov_y_degrees,
        config.camera.near,
        config.camera.screen_depth,
    );
    camera.set_aspect_ratio(args.viewport_width as f32, args.viewport_height.max(1) as f32);
    let mut driver =
        TerrainRenderDriver::new(config.camera.screen_depth, config.debug.show_cell_bounds);
    let orbit = flyover::Orbit::around(&terrain, args.frames);

    let mut total_drawn = 0u64;
    let mut total_culled = 0u64;
    let mut total_triangles = 0u64;
    for frame in 0..args.frames {
        orbit.place(&mut camera, &terrain, frame);
        let stats = driver.run_frame(&terrain, &camera.projection_matrix(), &camera.view_matrix());

        let upload_bytes: usize = driver
            .visible_cells(&terrain)
            .map(|cell| cell.vertex_bytes.len())
            .sum();
        debug!(
            "Frame {frame}: {} drawn, {} culled, {} triangles, {upload_bytes} bytes",
            stats.cells_drawn, stats.cells_culled, stats.triangles_drawn
        );

        total_drawn += u64::from(stats.cells_drawn);
        total_culled += u64::from(stats.cells_culled);
        total_triangles += stats.triangles_drawn;
    }

    let frames = u64::from(args.frames.max(1));
    info!(
        "{} frames: avg {:.1} cells drawn, {:.1} culled, {} triangles/frame, {} degenerate",
        args.frames,
        total_drawn as f64 / frames as f64,
        total_culled as f64 / frames as f64,
        total_triangles / frames,
        driver.degenerate_frames()
    );
}
