//! WASM bindings for the room mode visualizer
//!
//! Modes and configurations cross the boundary as JSON strings; fields and
//! color buffers as typed arrays (`Float32Array` / `Uint8Array`) in the flat
//! layouts documented in [`crate::field`].

use wasm_bindgen::prelude::*;

use crate::cloud::threshold_points;
use crate::colormap::scalars_to_rgba;
use crate::config::{VisualizerConfig, validate_config};
use crate::error::RoomModesError;
use crate::field::{synthesize_slice, synthesize_volume};
use crate::modes::{ModeCounts, RoomMode, calculate_room_modes};
use crate::room::RectangularRoom;

fn js_error(e: RoomModesError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("JSON error: {}", e)))
}

/// Get room modes as JSON
///
/// Returns `{"modes": [...], "counts": {"total", "axial", "tangential", "oblique"}}`.
#[wasm_bindgen]
pub fn get_room_modes(
    length_x: f64,
    length_y: f64,
    length_z: f64,
    max_frequency: f64,
    speed_of_sound: f64,
) -> Result<String, JsValue> {
    let room = RectangularRoom::new(length_x, length_y, length_z).map_err(js_error)?;
    let modes = calculate_room_modes(&room, max_frequency, speed_of_sound).map_err(js_error)?;
    let counts = ModeCounts::from_modes(&modes);
    to_json(&serde_json::json!({ "modes": modes, "counts": counts }))
}

fn parse_config(config_json: &str) -> Result<VisualizerConfig, JsValue> {
    let config: VisualizerConfig = serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid JSON: {}", e)))?;
    Ok(config)
}

fn modes_for(config: &VisualizerConfig) -> Result<Vec<RoomMode>, JsValue> {
    calculate_room_modes(&config.room, config.max_frequency, config.speed_of_sound)
        .map_err(js_error)
}

/// Normalized horizontal slice at the configured (clamped) height
///
/// Flat `res_x * res_z` array indexed `ix * res_z + iz`.
#[wasm_bindgen]
pub fn compute_slice(config_json: &str) -> Result<Vec<f32>, JsValue> {
    let config = parse_config(config_json)?;
    let modes = modes_for(&config)?;
    let [res_x, res_z] = config.slice_resolution;
    let field = synthesize_slice(
        &config.room,
        &modes,
        &config.field_params(),
        config.effective_slice_y(),
        res_x,
        res_z,
    )
    .map_err(js_error)?;
    Ok(field.iter().map(|&v| v as f32).collect())
}

/// Normalized volume, flat `res³` array indexed `iy * res * res + ix * res + iz`
#[wasm_bindgen]
pub fn compute_volume(config_json: &str) -> Result<Vec<f32>, JsValue> {
    let config = parse_config(config_json)?;
    let modes = modes_for(&config)?;
    let field = synthesize_volume(
        &config.room,
        &modes,
        &config.field_params(),
        config.volume_resolution,
    )
    .map_err(js_error)?;
    Ok(field.iter().map(|&v| v as f32).collect())
}

/// Point cloud of volume cells at or above `volume_threshold`
///
/// Returns `{"positions": [x0, y0, z0, ...], "colors": [r0, g0, b0, ...]}`.
#[wasm_bindgen]
pub fn compute_point_cloud(config_json: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let modes = modes_for(&config)?;
    let field = synthesize_volume(
        &config.room,
        &modes,
        &config.field_params(),
        config.volume_resolution,
    )
    .map_err(js_error)?;
    let cloud =
        threshold_points(&config.room, &field, config.volume_threshold).map_err(js_error)?;
    to_json(&serde_json::json!({
        "positions": cloud.flat_positions(),
        "colors": cloud.flat_colors(),
    }))
}

/// Turbo-colorize normalized scalars into an RGBA8 buffer
#[wasm_bindgen]
pub fn colorize(scalars: &[f32]) -> Vec<u8> {
    let values: Vec<f64> = scalars.iter().map(|&v| v as f64).collect();
    scalars_to_rgba(&values)
}

/// Create a default configuration JSON
#[wasm_bindgen]
pub fn create_default_config() -> Result<String, JsValue> {
    to_json(&VisualizerConfig::default())
}

/// Validate a configuration JSON and return any errors
#[wasm_bindgen]
pub fn validate_config_json(config_json: &str) -> String {
    match serde_json::from_str::<VisualizerConfig>(config_json) {
        Ok(config) => {
            let result = validate_config(&config);
            serde_json::json!({
                "valid": result.is_valid,
                "errors": result.errors,
                "warnings": result.warnings,
            })
            .to_string()
        }
        Err(e) => serde_json::json!({"valid": false, "error": e.to_string()}).to_string(),
    }
}
