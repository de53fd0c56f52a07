use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the box the molecules move in
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UniverseConfig {
    pub width: f64,
    pub height: f64,
}

// Configuration for the molecule population
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MoleculeConfig {
    pub count: u32,
    pub radius: f64,
    /// Per-axis speed bound: each velocity component is drawn uniformly
    /// from [-average_dimension_speed, average_dimension_speed].
    pub average_dimension_speed: f64,
    /// Seed for the pseudo-random source used at world creation. Fixing
    /// it makes a run fully reproducible.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

// Configuration for the discrete-time physics
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicsConfig {
    /// Increment between two adjacent time values.
    pub delta_t: f64,
    /// What part of a molecule's impulse remains when it hits the border.
    #[serde(default = "default_border_hit_impulse_retained")]
    pub border_hit_impulse_retained: f64,
}

fn default_border_hit_impulse_retained() -> f64 {
    1.0 // Fully elastic border
}

// Configuration for the running statistics
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MeasurementConfig {
    /// Steps per measurement window; border hits are averaged into the
    /// pressure reading over this many clock ticks.
    pub clock_ticks: u32,
    /// Maximum number of path entries kept for the tracked molecule.
    pub random_path_max_length: u32,
}

// Configuration for the driver loop
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_steps: u32,
    pub record_interval_steps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            total_steps: 1000,
            record_interval_steps: 10,
        }
    }
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_snapshots: bool,
    pub save_final_positions: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: "gas".to_string(),
            save_snapshots: true,
            save_final_positions: false,
            format: None,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub universe: UniverseConfig,
    pub molecules: MoleculeConfig,
    pub physics: PhysicsConfig,
    pub measurement: MeasurementConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    ///
    /// Semantic validation (positive dimensions, non-zero counts) is the
    /// engine's job at init time; this only reads and parses.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: SimulationConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }
}
