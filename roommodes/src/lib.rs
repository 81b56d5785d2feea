//! Room Modes - resonance modes and modal pressure fields of rectangular rooms
//!
//! This crate computes the numeric core of an interactive room mode
//! visualizer:
//! - Enumeration of axial, tangential and oblique modes below a frequency ceiling
//! - Steady-state modal pressure on a horizontal slice or a volumetric grid,
//!   weighted by a Lorentzian resonance curve and normalized to `[0, 1]`
//! - Turbo colormapping of normalized fields into RGBA8 buffers
//! - Thresholded point clouds for volumetric views
//!
//! Every computation is a pure function of its arguments. Results are fresh
//! buffers owned by the caller; recompute them whenever an input changes.
//!
//! ```
//! use roommodes::{FieldParams, RectangularRoom, calculate_room_modes, synthesize_slice};
//!
//! let room = RectangularRoom::new(5.2, 2.6, 3.8)?;
//! let modes = calculate_room_modes(&room, 300.0, roommodes::DEFAULT_SPEED_OF_SOUND)?;
//! let params = FieldParams::new(60.0, 40.0)?;
//! let slice = synthesize_slice(&room, &modes, &params, 1.2, 32, 32)?;
//! let rgba = roommodes::scalars_to_rgba(slice.as_slice().unwrap_or_default());
//! assert_eq!(rgba.len(), 4 * 32 * 32);
//! # Ok::<(), roommodes::RoomModesError>(())
//! ```

/// Thresholded point clouds from volumes
pub mod cloud;
/// Scalar to RGB / RGBA8 mapping
pub mod colormap;
/// JSON configuration and validation
pub mod config;
/// Error types
pub mod error;
/// Modal pressure field synthesis
pub mod field;
/// Room mode enumeration
pub mod modes;
/// Room geometry
pub mod room;
/// WebAssembly bindings
#[cfg(feature = "wasm")]
pub mod wasm;

pub use cloud::{PointCloud, threshold_points};
pub use colormap::{RGBA_ALPHA, Rgb, scalars_to_rgba, scalars_to_rgba_with, turbo};
pub use config::{VisualizerConfig, ValidationResult, load_config, validate_config};
pub use error::{Result, RoomModesError};
pub use field::{FieldParams, pressure_at, synthesize_slice, synthesize_volume};
pub use modes::{
    DEFAULT_SPEED_OF_SOUND, ModeCounts, ModeType, RoomMode, calculate_room_modes,
};
pub use room::{Point3D, RectangularRoom};
