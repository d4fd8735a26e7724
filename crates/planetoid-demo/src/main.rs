//! Demo binary that flies a camera around a procedural planet.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p planetoid-demo` to orbit with the defaults.
//! Run with `cargo run -p planetoid-demo -- --seed abc --frames 600` for a longer flight.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::DVec3;
use planetoid_config::{CliArgs, Config, default_config_dir};
use planetoid_geometry::ParamCoord;
use planetoid_planet::{Planet, RebuildThrottle};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "planetoid-demo", about = "Orbit a camera around a procedural planet")]
struct DemoArgs {
    #[command(flatten)]
    common: CliArgs,

    /// Number of simulated frames.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Simulated frame time in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Orbit radius at the start of the flight, in planet radii.
    #[arg(long, default_value_t = 4.0)]
    start_altitude: f64,

    /// Orbit radius at the end of the flight, in planet radii.
    #[arg(long, default_value_t = 1.05)]
    end_altitude: f64,
}

/// Camera position at `t` in `[0, 1]` along a descending, inclined orbit.
fn orbit_camera(t: f64, radius: f64, start_altitude: f64, end_altitude: f64) -> DVec3 {
    let t = t.clamp(0.0, 1.0);
    let angle = t * std::f64::consts::TAU;
    let altitude = start_altitude + (end_altitude - start_altitude) * t;
    let inclination = 0.4_f64;
    DVec3::new(
        angle.cos(),
        angle.sin() * inclination.cos(),
        angle.sin() * inclination.sin(),
    ) * radius
        * altitude
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();

    let config_dir = args.common.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.common);

    let log_dir = config_dir.join("logs");
    planetoid_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut planet = match Planet::new(&config) {
        Ok(planet) => planet,
        Err(e) => {
            error!(error = %e, "Invalid planet configuration");
            return ExitCode::FAILURE;
        }
    };
    let mut throttle = RebuildThrottle::new(&config.rebuild);
    let radius = planet.ellipsoid().max_radius();

    info!(
        seed = %config.planet.seed,
        frames = args.frames,
        config_dir = %config_dir.display(),
        "Starting orbit"
    );

    let start = Instant::now();
    let mut rebuilds = 0u32;
    for frame in 0..args.frames {
        let t = f64::from(frame) / f64::from(args.frames.max(1));
        let camera = orbit_camera(t, radius, args.start_altitude, args.end_altitude);
        let now = start + Duration::from_millis(u64::from(frame) * args.frame_ms);

        if !throttle.poll(camera, now) {
            continue;
        }
        match planet.generate_geometry(camera) {
            Ok(stats) => {
                rebuilds += 1;
                let under = ParamCoord::from_direction(camera);
                info!(
                    frame,
                    leaves = stats.leaves,
                    vertices = stats.vertices,
                    triangles = stats.triangles,
                    max_level = stats.max_level,
                    surface_radius = planet.surface_height_at(under.theta, under.phi),
                    min_distance = planet.min_distance(camera),
                    camera_distance = camera.length(),
                    "Rebuilt"
                );
            }
            Err(e) => {
                error!(frame, error = %e, "Rebuild failed, keeping previous mesh");
            }
        }
    }

    // Regenerating with an unchanged seed must reproduce the last mesh.
    let last = orbit_camera(1.0, radius, args.start_altitude, args.end_altitude);
    let before = planet.mesh().positions.clone();
    planet.regenerate_terrain();
    throttle.force();
    let end = start + Duration::from_millis(u64::from(args.frames) * args.frame_ms);
    if throttle.poll(last, end)
        && let Err(e) = planet.generate_geometry(last)
    {
        error!(error = %e, "Rebuild after regeneration failed");
        return ExitCode::FAILURE;
    }
    if planet.mesh().positions != before && !before.is_empty() {
        warn!("Regenerated mesh differs from the original");
    }

    info!(
        rebuilds,
        frames = args.frames,
        vertices = planet.mesh().vertex_count(),
        "Orbit finished"
    );
    ExitCode::SUCCESS
}
