//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for one planet instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ellipsoid shape and seed.
    pub planet: PlanetConfig,
    /// Quadtree subdivision settings.
    pub lod: LodConfig,
    /// Procedural terrain settings.
    pub terrain: TerrainConfig,
    /// Per-vertex color settings.
    pub color: ColorConfig,
    /// Caller-side rebuild cadence.
    pub rebuild: RebuildConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Planet shape configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Ellipsoid semi-axes `(a, b, c)` along x, y and z. All must be positive.
    pub semi_axes: [f64; 3],
    /// Seed string for every noise channel. Same seed, same terrain.
    pub seed: String,
    /// Safety margin added to the nearest vertex radius by `min_distance`.
    pub min_distance_buffer: f64,
}

/// Quadtree LOD configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Ascending camera distance thresholds. The count is the maximum subdivision level.
    pub distance_thresholds: Vec<f64>,
    /// Coarsest level any leaf may have.
    pub min_level: u8,
    /// Upper bound on forced subdivisions in one balance pass.
    /// `None` derives the bound from the maximum level.
    pub balance_iteration_cap: Option<usize>,
}

/// Procedural terrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Frequency of the first planetary octave.
    pub base_frequency: f64,
    /// Amplitude of the first planetary octave, as a fraction of the radius.
    pub base_amplitude: f64,
    /// Frequency of the fine-detail noise added by tiers above the planetary one.
    pub detail_frequency: f64,
    /// Amplitude of the fine-detail noise at the nearest tier.
    pub detail_amplitude: f64,
    /// Planetary octave count before biome scaling.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency of the low-frequency ocean depression band.
    pub ocean_frequency: f64,
    /// Depth of the ocean depression band.
    pub ocean_amplitude: f64,
    /// Height below which a position is underwater.
    pub water_level: f64,
    /// Fraction of the distance to `water_level` recovered by submerged heights.
    pub water_blend: f64,
    /// Planet rotation axis used for latitude.
    pub rotation_axis: [f64; 3],
    /// Direction towards the sun used for solar incidence.
    pub incident_vector: [f64; 3],
    /// Strength of erosion aging, in `[0, 1]`.
    pub erosion_factor: f64,
    /// Per-feature aging coefficients keyed by feature name. Missing entries default to 1.0.
    pub age_multipliers: BTreeMap<String, f64>,
    /// Ascending camera distances gating the terrain detail tiers.
    pub tier_distances: Vec<f64>,
    /// Angular size of a cache bucket, in radians.
    pub bucket_size: f64,
    /// Upper bound on cache buckets; must cover every cell of the
    /// `bucket_size` grid.
    pub max_cached_buckets: usize,
    /// Feature generators that start disabled, by name.
    pub disabled_features: Vec<String>,
}

/// Per-vertex color configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    /// Enable noise-gated luminance jitter.
    pub dithering: bool,
    /// Maximum jitter in 0-255 channel units.
    pub dither_strength: f64,
    /// Brightness change per unit of height.
    pub height_shading: f64,
}

/// Caller-side rebuild throttling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RebuildConfig {
    /// Minimum time between two rebuilds, in milliseconds.
    pub min_interval_ms: u64,
    /// Minimum camera travel between two rebuilds.
    pub min_camera_travel: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            semi_axes: [10.0, 10.0, 10.0],
            seed: "planetoid".to_string(),
            min_distance_buffer: 0.1,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            distance_thresholds: vec![15.0, 30.0, 45.0, 60.0],
            min_level: 2,
            balance_iteration_cap: None,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let age_multipliers = [
            ("crater", 1.5),
            ("volcano", 0.4),
            ("tectonic_plate", 0.8),
            ("dune", 1.2),
            ("glacier", 0.6),
            ("mesa", 1.3),
        ]
        .into_iter()
        .map(|(name, m)| (name.to_string(), m))
        .collect();

        Self {
            base_frequency: 1.2,
            base_amplitude: 0.02,
            detail_frequency: 6.0,
            detail_amplitude: 0.002,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            ocean_frequency: 0.6,
            ocean_amplitude: 0.012,
            water_level: 0.0,
            water_blend: 0.6,
            rotation_axis: [0.0, 0.0, 1.0],
            incident_vector: [1.0, 0.0, 0.0],
            erosion_factor: 0.3,
            age_multipliers,
            tier_distances: vec![3.0, 8.0, 20.0],
            bucket_size: 0.1,
            max_cached_buckets: 65_536,
            disabled_features: Vec::new(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            dithering: true,
            dither_strength: 6.0,
            height_shading: 6.0,
        }
    }
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 250,
            min_camera_travel: 0.05,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for planetoid (`<config_dir>/planetoid`), falling back
/// to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("planetoid"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
