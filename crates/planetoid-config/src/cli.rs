//! Command-line argument parsing for planetoid tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Shared planetoid command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetoid", about = "Procedural ellipsoid planet generator")]
pub struct CliArgs {
    /// Terrain seed string.
    #[arg(long)]
    pub seed: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Height below which terrain is treated as underwater.
    #[arg(long)]
    pub water_level: Option<f64>,

    /// Disable a feature generator by name. May be repeated.
    #[arg(long = "disable-feature")]
    pub disable_features: Vec<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref seed) = args.seed {
            self.planet.seed = seed.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(water) = args.water_level {
            self.terrain.water_level = water;
        }
        for name in &args.disable_features {
            if !self.terrain.disabled_features.contains(name) {
                self.terrain.disabled_features.push(name.clone());
            }
        }
    }
}
