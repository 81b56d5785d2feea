//! Visualizer configuration.
//!
//! A JSON document carrying every parameter of a mode/field computation.
//! Missing fields fall back to the defaults of the interactive calculator
//! (a 5.2 × 2.6 × 3.8 m room probed at 60 Hz with Q = 40).

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::field::{EXPENSIVE_VOLUME_RESOLUTION, FieldParams, sample_count, volume_sample_count};
use crate::modes::DEFAULT_SPEED_OF_SOUND;
use crate::room::RectangularRoom;

/// Distance kept between a slice and the floor or ceiling (m)
pub const SLICE_WALL_MARGIN: f64 = 0.001;

/// Complete set of visualizer inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisualizerConfig {
    /// Room dimensions: x = length, y = height, z = width (m)
    #[serde(default = "default_room")]
    pub room: RectangularRoom,
    /// Mode enumeration ceiling (Hz)
    #[serde(default = "default_max_frequency")]
    pub max_frequency: f64,
    /// Speed of sound (m/s)
    #[serde(default = "default_speed_of_sound")]
    pub speed_of_sound: f64,
    /// Probe frequency for the pressure field (Hz)
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Resonance sharpness (damping)
    #[serde(default = "default_q_factor")]
    pub q_factor: f64,
    /// Height of the horizontal slice (m)
    #[serde(default = "default_slice_y")]
    pub slice_y: f64,
    /// Minimum normalized value shown in the volume view
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: f64,
    /// Slice sampling resolution `[res_x, res_z]`
    #[serde(default = "default_slice_resolution")]
    pub slice_resolution: [usize; 2],
    /// Volume sampling resolution per axis
    #[serde(default = "default_volume_resolution")]
    pub volume_resolution: usize,
}

fn default_room() -> RectangularRoom {
    RectangularRoom {
        length_x: 5.2,
        length_y: 2.6,
        length_z: 3.8,
    }
}
fn default_max_frequency() -> f64 {
    300.0
}
fn default_speed_of_sound() -> f64 {
    DEFAULT_SPEED_OF_SOUND
}
fn default_frequency() -> f64 {
    60.0
}
fn default_q_factor() -> f64 {
    40.0
}
fn default_slice_y() -> f64 {
    1.2
}
fn default_volume_threshold() -> f64 {
    0.65
}
fn default_slice_resolution() -> [usize; 2] {
    [160, 160]
}
fn default_volume_resolution() -> usize {
    34
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            room: default_room(),
            max_frequency: default_max_frequency(),
            speed_of_sound: default_speed_of_sound(),
            frequency: default_frequency(),
            q_factor: default_q_factor(),
            slice_y: default_slice_y(),
            volume_threshold: default_volume_threshold(),
            slice_resolution: default_slice_resolution(),
            volume_resolution: default_volume_resolution(),
        }
    }
}

impl VisualizerConfig {
    /// Probe parameters (unvalidated)
    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            frequency: self.frequency,
            q_factor: self.q_factor,
        }
    }

    /// Slice height kept strictly inside the room
    pub fn effective_slice_y(&self) -> f64 {
        clamp_slice_height(self.slice_y, self.room.length_y)
    }
}

/// Keep a slice height at least [`SLICE_WALL_MARGIN`] away from floor and ceiling.
///
/// Rooms lower than twice the margin get their mid-height.
pub fn clamp_slice_height(y: f64, height: f64) -> f64 {
    if height <= 2.0 * SLICE_WALL_MARGIN {
        return height / 2.0;
    }
    y.max(SLICE_WALL_MARGIN).min(height - SLICE_WALL_MARGIN)
}

/// Load a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<VisualizerConfig> {
    let text = fs::read_to_string(path)?;
    let config: VisualizerConfig = serde_json::from_str(&text)?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the configuration is valid
    pub is_valid: bool,
    /// Problems that make a computation fail
    pub errors: Vec<String>,
    /// Legal but suspicious settings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error (marks result as invalid)
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

/// Validate a configuration before running any computation.
pub fn validate_config(config: &VisualizerConfig) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if let Err(e) = config.room.validate() {
        result.add_error(e.to_string());
    }

    if !(config.max_frequency.is_finite() && config.max_frequency > 0.0) {
        result.add_error(format!(
            "max_frequency ({}) must be positive",
            config.max_frequency
        ));
    }

    if !(config.speed_of_sound.is_finite() && config.speed_of_sound > 0.0) {
        result.add_error(format!(
            "speed_of_sound ({}) must be positive",
            config.speed_of_sound
        ));
    }

    if let Err(e) = config.field_params().validate() {
        result.add_error(e.to_string());
    } else if config.frequency > config.max_frequency {
        result.add_warning(format!(
            "frequency ({} Hz) is above max_frequency ({} Hz); modes above the ceiling are ignored",
            config.frequency, config.max_frequency
        ));
    }

    if !(0.0..=1.0).contains(&config.volume_threshold) {
        result.add_error(format!(
            "volume_threshold ({}) must lie in [0, 1]",
            config.volume_threshold
        ));
    }

    if !(0.0..=config.room.length_y).contains(&config.slice_y) {
        result.add_warning(format!(
            "slice_y ({} m) is outside the room height; it will be clamped",
            config.slice_y
        ));
    }

    let [res_x, res_z] = config.slice_resolution;
    if let Err(e) = sample_count(&[("res_x", res_x), ("res_z", res_z)]) {
        result.add_error(format!("slice_resolution ({}x{}): {}", res_x, res_z, e));
    }

    match volume_sample_count(config.volume_resolution) {
        Err(e) => result.add_error(format!("volume_resolution: {}", e)),
        Ok(count) if config.volume_resolution > EXPENSIVE_VOLUME_RESOLUTION => {
            result.add_warning(format!(
                "volume_resolution ({}) means {} samples per update",
                config.volume_resolution, count
            ));
        }
        Ok(_) => {}
    }

    result
}
