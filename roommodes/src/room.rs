//! Room geometry.
//!
//! Axes follow the visualizer convention: x is the room length, y the height
//! (vertical) and z the width. All lengths are in meters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoomModesError, positive_finite};

/// 3D point in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rectangular room with rigid walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RectangularRoom {
    /// Length along x (m)
    pub length_x: f64,
    /// Height along y (m)
    pub length_y: f64,
    /// Width along z (m)
    pub length_z: f64,
}

impl RectangularRoom {
    /// Build a room, rejecting any non-positive or non-finite dimension.
    pub fn new(length_x: f64, length_y: f64, length_z: f64) -> Result<Self> {
        let room = Self {
            length_x,
            length_y,
            length_z,
        };
        room.validate()?;
        Ok(room)
    }

    /// Check the dimensions of a room built from public fields or deserialized.
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in [
            ("x", self.length_x),
            ("y", self.length_y),
            ("z", self.length_z),
        ] {
            if !positive_finite(value) {
                return Err(RoomModesError::NonPositiveDimension { axis, value });
            }
        }
        Ok(())
    }

    /// Dimensions as `[x, y, z]`
    pub fn dimensions(&self) -> [f64; 3] {
        [self.length_x, self.length_y, self.length_z]
    }

    pub fn volume(&self) -> f64 {
        self.length_x * self.length_y * self.length_z
    }

    /// Whether a point lies inside the room (walls included)
    pub fn contains(&self, p: &Point3D) -> bool {
        (0.0..=self.length_x).contains(&p.x)
            && (0.0..=self.length_y).contains(&p.y)
            && (0.0..=self.length_z).contains(&p.z)
    }

    /// Center of the sampling cell `(ix, iy, iz)` on a grid of `res` cells per axis.
    pub fn cell_center(&self, ix: usize, iy: usize, iz: usize, res: usize) -> Point3D {
        Point3D::new(
            cell_center(ix, self.length_x, res),
            cell_center(iy, self.length_y, res),
            cell_center(iz, self.length_z, res),
        )
    }
}

/// Coordinate of the center of cell `index` when `length` is split into `res` cells.
///
/// Samples never sit on a wall: the first one is half a cell in.
pub fn cell_center(index: usize, length: f64, res: usize) -> f64 {
    (index as f64 + 0.5) * (length / res as f64)
}
