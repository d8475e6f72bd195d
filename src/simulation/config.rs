//! Tunable simulation parameters
//!
//! Every field has a default, so a TOML file only needs to name what it overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Isometric grid layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Cells per side of the square shop floor
    pub size: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        // Centered in a 1280x720 scene, a quarter of the way down
        Self {
            origin_x: 640.0,
            origin_y: 180.0,
            tile_width: 64.0,
            tile_height: 32.0,
            size: 10,
        }
    }
}

/// Customer movement and patience parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CustomerConfig {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Distance under which a walker counts as arrived
    pub arrival_threshold: f32,
    /// Fractional cell of the doorway on the street
    pub door_col: f32,
    pub door_row: f32,
    pub door_threshold: f32,
    /// Chance to walk in, rolled once per tick while near the door
    pub enter_chance: f32,
    pub queue_col: f32,
    pub queue_row: f32,
    /// Delay after queueing before the first table search
    pub seat_search_delay: f32,
    pub seat_retry_interval: f32,
    /// Seat offset from the table center, in cells
    pub seat_offset: f32,
    pub leave_duration: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            min_speed: 80.0,
            max_speed: 100.0,
            arrival_threshold: 5.0,
            door_col: 3.5,
            door_row: 11.0,
            door_threshold: 12.0,
            enter_chance: 0.05,
            queue_col: 2.0,
            queue_row: 2.0,
            seat_search_delay: 1.5,
            seat_retry_interval: 2.0,
            seat_offset: 0.4,
            leave_duration: 0.5,
            wobble_amplitude: 2.0,
            wobble_frequency: 6.0,
        }
    }
}

/// Customer spawn policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub interval: f32,
    pub max_customers: usize,
    pub spawn_col: f32,
    pub spawn_row: f32,
    /// Screen-space offset from the spawn point to the far end of the street
    pub street_dx: f32,
    pub street_dy: f32,
    pub scene_width: f32,
    pub scene_height: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 5.0,
            max_customers: 5,
            spawn_col: -5.0,
            spawn_row: 11.0,
            street_dx: 1200.0,
            street_dy: 600.0,
            scene_width: 1500.0,
            scene_height: 1000.0,
        }
    }
}

/// Coffee machine stage timings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub roast_duration: f32,
    pub extract_duration: f32,
    /// Minimum progress advance between two reports
    pub report_step: f32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            roast_duration: 2.0,
            extract_duration: 3.0,
            report_step: 0.1,
        }
    }
}

/// Command queue and snapshot publishing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Ticks between snapshot publishes
    pub publish_interval: u32,
    pub max_diagnostics: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            publish_interval: 6,
            max_diagnostics: 64,
        }
    }
}

/// All simulation parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub customers: CustomerConfig,
    pub spawn: SpawnConfig,
    pub machine: MachineConfig,
    pub bridge: BridgeConfig,
}

impl SimConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid simulation config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
