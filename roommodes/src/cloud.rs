//! Thresholded point cloud extraction from a synthesized volume.
//!
//! A renderer draws one colored point per volume cell whose normalized
//! pressure reaches the threshold. Points are emitted in buffer order
//! (`iy`, then `ix`, then `iz`).

use ndarray::Array3;
use serde::Serialize;

use crate::colormap::{Rgb, turbo};
use crate::error::{Result, RoomModesError};
use crate::room::{Point3D, RectangularRoom};

/// Points and colors of the cells above a threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointCloud {
    /// Cell centers (m)
    pub positions: Vec<Point3D>,
    /// Turbo color of each point's normalized value
    pub colors: Vec<Rgb>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions flattened to `[x0, y0, z0, x1, ...]` for vertex buffers
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    /// Colors flattened to `[r0, g0, b0, r1, ...]` for vertex buffers
    pub fn flat_colors(&self) -> Vec<f32> {
        self.colors
            .iter()
            .flat_map(|c| c.map(|v| v as f32))
            .collect()
    }
}

/// Collect every cell of `volume` whose value is at least `threshold`.
///
/// `volume` must be a cubic field as returned by
/// [`synthesize_volume`](crate::field::synthesize_volume).
pub fn threshold_points(
    room: &RectangularRoom,
    volume: &Array3<f64>,
    threshold: f64,
) -> Result<PointCloud> {
    room.validate()?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(RoomModesError::ThresholdOutOfRange { value: threshold });
    }
    let (res, res_x, res_z) = volume.dim();
    if res == 0 || res != res_x || res != res_z {
        return Err(RoomModesError::Shape(ndarray::ShapeError::from_kind(
            ndarray::ErrorKind::IncompatibleShape,
        )));
    }

    let mut cloud = PointCloud::default();
    for ((iy, ix, iz), &v) in volume.indexed_iter() {
        if v >= threshold {
            cloud.positions.push(room.cell_center(ix, iy, iz, res));
            cloud.colors.push(turbo(v));
        }
    }
    Ok(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldParams, synthesize_volume};
    use crate::modes::{DEFAULT_SPEED_OF_SOUND, calculate_room_modes};

    fn reference_room() -> RectangularRoom {
        RectangularRoom::new(5.2, 2.6, 3.8).unwrap()
    }

    fn reference_volume(res: usize) -> Array3<f64> {
        let room = reference_room();
        let modes = calculate_room_modes(&room, 300.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        let params = FieldParams::new(60.0, 40.0).unwrap();
        synthesize_volume(&room, &modes, &params, res).unwrap()
    }

    #[test]
    fn test_threshold_selects_matching_cells() {
        let room = reference_room();
        let volume = reference_volume(10);
        let cloud = threshold_points(&room, &volume, 0.65).unwrap();

        let expected = volume.iter().filter(|&&v| v >= 0.65).count();
        assert_eq!(cloud.len(), expected);
        assert_eq!(cloud.colors.len(), expected);
        assert!(!cloud.is_empty());
        for p in &cloud.positions {
            assert!(room.contains(p));
        }
    }

    #[test]
    fn test_threshold_extremes() {
        let room = reference_room();
        let volume = reference_volume(6);
        assert_eq!(threshold_points(&room, &volume, 0.0).unwrap().len(), 216);
        // normalized maximum is exactly 1
        assert!(threshold_points(&room, &volume, 1.0).unwrap().len() >= 1);
    }

    #[test]
    fn test_points_follow_buffer_order() {
        let room = RectangularRoom::new(2.0, 2.0, 2.0).unwrap();
        let mut volume = Array3::<f64>::zeros((2, 2, 2));
        volume[[0, 1, 0]] = 1.0;
        volume[[1, 0, 1]] = 0.9;
        let cloud = threshold_points(&room, &volume, 0.5).unwrap();
        assert_eq!(
            cloud.positions,
            vec![Point3D::new(1.5, 0.5, 0.5), Point3D::new(0.5, 1.5, 1.5)]
        );
        assert_eq!(cloud.colors[0], turbo(1.0));
        assert_eq!(cloud.flat_positions(), vec![1.5, 0.5, 0.5, 0.5, 1.5, 1.5]);
        assert_eq!(cloud.flat_colors().len(), 6);
    }

    #[test]
    fn test_invalid_threshold_and_shape() {
        let room = reference_room();
        let volume = reference_volume(4);
        assert!(matches!(
            threshold_points(&room, &volume, 1.5),
            Err(RoomModesError::ThresholdOutOfRange { .. })
        ));
        assert!(threshold_points(&room, &volume, f64::NAN).is_err());

        let skewed = Array3::<f64>::zeros((2, 3, 2));
        assert!(matches!(
            threshold_points(&room, &skewed, 0.5),
            Err(RoomModesError::Shape(_))
        ));
    }
}
