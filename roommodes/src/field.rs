//! Modal pressure field synthesis.
//!
//! The steady-state pressure at a point is a superposition of standing waves:
//!
//! p(x,y,z) = Σ W(f, f_nmp) * cos(n*π*x/Lx) * cos(m*π*y/Ly) * cos(p*π*z/Lz)
//!
//! Where W is a Lorentzian resonance curve centered on the mode frequency with
//! bandwidth f_nmp / Q (floored at [`MIN_BANDWIDTH_HZ`]). Rigid walls put a
//! pressure antinode on every wall, hence the cosine shapes; an axis with a
//! zero index contributes a factor of exactly 1.
//!
//! Sampled fields are min–max normalized to `[0, 1]` over the whole buffer.
//! Layouts are row-major: a slice has shape `(res_x, res_z)` and is indexed
//! `ix * res_z + iz`; a volume has shape `(res, res, res)` with axes
//! `[iy, ix, iz]` and is indexed `iy * res * res + ix * res + iz`.

use log::{debug, warn};
use ndarray::{Array2, Array3};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{Result, RoomModesError, positive_finite};
use crate::modes::RoomMode;
use crate::room::{Point3D, RectangularRoom, cell_center};

/// Floor applied to Q before computing a bandwidth
pub const MIN_Q: f64 = 1e-3;

/// Narrowest resonance bandwidth (Hz)
pub const MIN_BANDWIDTH_HZ: f64 = 0.5;

/// Volume resolutions above this many cells per axis are logged as expensive
pub const EXPENSIVE_VOLUME_RESOLUTION: usize = 64;

/// Probe parameters shared by every synthesis entry point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldParams {
    /// Probe frequency (Hz)
    pub frequency: f64,
    /// Resonance sharpness (damping)
    pub q_factor: f64,
}

impl FieldParams {
    pub fn new(frequency: f64, q_factor: f64) -> Result<Self> {
        let params = Self {
            frequency,
            q_factor,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frequency.is_finite() && self.frequency >= 0.0) {
            return Err(RoomModesError::InvalidProbeFrequency {
                value: self.frequency,
            });
        }
        if !positive_finite(self.q_factor) {
            return Err(RoomModesError::InvalidQFactor {
                value: self.q_factor,
            });
        }
        Ok(())
    }
}

/// Resonance bandwidth of a mode at damping `q_factor`.
pub fn mode_bandwidth(mode_frequency: f64, q_factor: f64) -> f64 {
    (mode_frequency / q_factor.max(MIN_Q)).max(MIN_BANDWIDTH_HZ)
}

/// Lorentzian response of a mode at `mode_frequency` driven at `frequency`.
///
/// Equals 1 on resonance and falls to 1/2 one bandwidth away.
pub fn lorentzian_weight(frequency: f64, mode_frequency: f64, q_factor: f64) -> f64 {
    let r = (frequency - mode_frequency) / mode_bandwidth(mode_frequency, q_factor);
    1.0 / (1.0 + r * r)
}

/// Standing-wave shape of `mode` at `point`.
pub fn mode_shape(mode: &RoomMode, room: &RectangularRoom, point: &Point3D) -> f64 {
    shape(mode.indices(), wavenumbers(room, mode), point.x, point.y, point.z)
}

fn wavenumbers(room: &RectangularRoom, mode: &RoomMode) -> [f64; 3] {
    [
        PI * mode.nx as f64 / room.length_x,
        PI * mode.ny as f64 / room.length_y,
        PI * mode.nz as f64 / room.length_z,
    ]
}

/// Product of per-axis cosines; an axis with a zero index contributes exactly 1.
fn shape(indices: [u32; 3], k: [f64; 3], x: f64, y: f64, z: f64) -> f64 {
    let factor = |axis: usize, coord: f64| {
        if indices[axis] == 0 {
            1.0
        } else {
            (k[axis] * coord).cos()
        }
    };
    factor(0, x) * factor(1, y) * factor(2, z)
}

/// A mode with its wavenumbers and resonance weight resolved for one probe.
struct WeightedMode {
    indices: [u32; 3],
    k: [f64; 3],
    weight: f64,
}

impl WeightedMode {
    fn contribution(&self, x: f64, y: f64, z: f64) -> f64 {
        self.weight * shape(self.indices, self.k, x, y, z)
    }
}

fn weigh_modes(
    room: &RectangularRoom,
    modes: &[RoomMode],
    params: &FieldParams,
) -> Result<Vec<WeightedMode>> {
    modes
        .iter()
        .enumerate()
        .map(|(index, mode)| {
            let indices = mode.indices();
            if indices == [0, 0, 0] || !positive_finite(mode.frequency) {
                return Err(RoomModesError::InvalidMode {
                    index,
                    indices,
                    frequency: mode.frequency,
                });
            }
            Ok(WeightedMode {
                indices,
                k: wavenumbers(room, mode),
                weight: lorentzian_weight(params.frequency, mode.frequency, params.q_factor),
            })
        })
        .collect()
}

fn superpose(weighted: &[WeightedMode], x: f64, y: f64, z: f64) -> f64 {
    weighted.iter().map(|m| m.contribution(x, y, z)).sum()
}

fn check_resolution(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(RoomModesError::ZeroResolution { name });
    }
    Ok(())
}

/// Total number of samples for a grid with the given per-axis resolutions.
///
/// Fails on a zero resolution, or when the count would not fit in a
/// `Vec<f64>`.
pub fn sample_count(axes: &[(&'static str, usize)]) -> Result<usize> {
    let limit = isize::MAX as usize / std::mem::size_of::<f64>();
    axes.iter().try_fold(1usize, |count, &(name, value)| {
        check_resolution(name, value)?;
        count
            .checked_mul(value)
            .filter(|&n| n <= limit)
            .ok_or(RoomModesError::ResolutionTooLarge { name, value })
    })
}

/// Number of samples in a `res`³ volume.
pub fn volume_sample_count(res: usize) -> Result<usize> {
    sample_count(&[("res", res), ("res", res), ("res", res)])
}

/// Raw (unnormalized) modal pressure at a single point.
///
/// # Errors
/// Fails on an invalid room or probe, or on a mode with all-zero indices or
/// a non-positive frequency.
pub fn pressure_at(
    room: &RectangularRoom,
    modes: &[RoomMode],
    params: &FieldParams,
    point: &Point3D,
) -> Result<f64> {
    room.validate()?;
    params.validate()?;
    let weighted = weigh_modes(room, modes, params)?;
    Ok(superpose(&weighted, point.x, point.y, point.z))
}

/// Rescale `values` in place so the smallest becomes 0 and the largest 1.
///
/// A flat buffer (including one produced by an empty mode set) becomes all
/// zeros.
pub fn normalize_in_place(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    let span = if span > 0.0 { span } else { 1.0 };
    for v in values.iter_mut() {
        *v = (*v - min) / span;
    }
}

/// Sample the normalized pressure field on the horizontal plane at height `y_plane`.
///
/// Returns an array of shape `(res_x, res_z)`.
///
/// # Errors
/// Fails on an invalid room, probe or mode, a plane outside `[0, length_y]`,
/// or a zero or oversized resolution. An empty `modes` slice is valid and
/// yields zeros.
pub fn synthesize_slice(
    room: &RectangularRoom,
    modes: &[RoomMode],
    params: &FieldParams,
    y_plane: f64,
    res_x: usize,
    res_z: usize,
) -> Result<Array2<f64>> {
    room.validate()?;
    params.validate()?;
    if !(y_plane.is_finite() && (0.0..=room.length_y).contains(&y_plane)) {
        return Err(RoomModesError::SlicePlaneOutOfRange {
            y: y_plane,
            height: room.length_y,
        });
    }
    let count = sample_count(&[("res_x", res_x), ("res_z", res_z)])?;
    let weighted = weigh_modes(room, modes, params)?;

    debug!(
        "Synthesizing {}x{} slice at y={:.3} m, {:.1} Hz, Q={:.1}, {} modes",
        res_x,
        res_z,
        y_plane,
        params.frequency,
        params.q_factor,
        modes.len()
    );

    let mut values: Vec<f64> = (0..count)
        .into_par_iter()
        .map(|idx| {
            let x = cell_center(idx / res_z, room.length_x, res_x);
            let z = cell_center(idx % res_z, room.length_z, res_z);
            superpose(&weighted, x, y_plane, z)
        })
        .collect();

    normalize_in_place(&mut values);
    Ok(Array2::from_shape_vec((res_x, res_z), values)?)
}

/// Sample the normalized pressure field on a uniform `res`³ grid.
///
/// Returns an array of shape `(res, res, res)` with axes `[iy, ix, iz]`.
/// Cost grows as `res³ × modes.len()`.
///
/// # Errors
/// Fails on an invalid room, probe or mode, or a zero or oversized resolution.
pub fn synthesize_volume(
    room: &RectangularRoom,
    modes: &[RoomMode],
    params: &FieldParams,
    res: usize,
) -> Result<Array3<f64>> {
    room.validate()?;
    params.validate()?;
    let count = volume_sample_count(res)?;
    let weighted = weigh_modes(room, modes, params)?;

    if res > EXPENSIVE_VOLUME_RESOLUTION {
        warn!(
            "Volume resolution {} means {} samples x {} modes; expect slow updates",
            res,
            count,
            modes.len()
        );
    }
    debug!(
        "Synthesizing {}^3 volume, {:.1} Hz, Q={:.1}, {} modes",
        res,
        params.frequency,
        params.q_factor,
        modes.len()
    );

    let plane = res * res;
    let mut values: Vec<f64> = (0..count)
        .into_par_iter()
        .map(|idx| {
            let y = cell_center(idx / plane, room.length_y, res);
            let x = cell_center((idx / res) % res, room.length_x, res);
            let z = cell_center(idx % res, room.length_z, res);
            superpose(&weighted, x, y, z)
        })
        .collect();

    normalize_in_place(&mut values);
    Ok(Array3::from_shape_vec((res, res, res), values)?)
}
