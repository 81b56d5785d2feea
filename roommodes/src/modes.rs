//! Room mode enumeration.
//!
//! Room modes occur at frequencies where standing waves form between parallel surfaces.
//! - Axial modes: Standing waves between one pair of parallel walls (n,0,0), (0,m,0), or (0,0,p)
//! - Tangential modes: Standing waves between two pairs of walls (n,m,0), (n,0,p), or (0,m,p)
//! - Oblique modes: Standing waves between all three pairs of walls (n,m,p)
//!
//! Formula: f = (c/2) * sqrt((n/Lx)² + (m/Ly)² + (p/Lz)²)

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RoomModesError, positive_finite};
use crate::room::RectangularRoom;

/// Speed of sound in air at about 20 °C (m/s)
pub const DEFAULT_SPEED_OF_SOUND: f64 = 343.0;

/// Slack added to the frequency ceiling so boundary modes survive rounding
pub const FREQUENCY_EPSILON: f64 = 1e-6;

/// Mode classification by the number of zero indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModeType {
    /// Two zero indices
    Axial,
    /// One zero index
    Tangential,
    /// No zero index
    Oblique,
}

impl ModeType {
    /// Classify mode indices. Returns `None` for the `(0,0,0)` triple.
    pub fn classify(nx: u32, ny: u32, nz: u32) -> Option<Self> {
        let zero_count = [nx, ny, nz].iter().filter(|&&n| n == 0).count();
        match zero_count {
            2 => Some(ModeType::Axial),
            1 => Some(ModeType::Tangential),
            0 => Some(ModeType::Oblique),
            _ => None,
        }
    }
}

impl fmt::Display for ModeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeType::Axial => write!(f, "axial"),
            ModeType::Tangential => write!(f, "tangential"),
            ModeType::Oblique => write!(f, "oblique"),
        }
    }
}

/// Represents a room resonant mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoomMode {
    /// Half-wavelength count along x (length)
    pub nx: u32,
    /// Half-wavelength count along y (height)
    pub ny: u32,
    /// Half-wavelength count along z (width)
    pub nz: u32,
    /// Resonant frequency in Hz
    #[serde(rename = "f", alias = "frequency")]
    pub frequency: f64,
    #[serde(rename = "type", alias = "mode_type")]
    pub mode_type: ModeType,
    /// Description of the mode (e.g., "1,0,0 - Length mode (X)")
    pub description: String,
}

impl RoomMode {
    /// Mode indices as `[nx, ny, nz]`
    pub fn indices(&self) -> [u32; 3] {
        [self.nx, self.ny, self.nz]
    }
}

/// Resonant frequency of mode `(nx, ny, nz)`.
pub fn mode_frequency(
    room: &RectangularRoom,
    speed_of_sound: f64,
    nx: u32,
    ny: u32,
    nz: u32,
) -> f64 {
    let kx = nx as f64 / room.length_x;
    let ky = ny as f64 / room.length_y;
    let kz = nz as f64 / room.length_z;
    0.5 * speed_of_sound * (kx * kx + ky * ky + kz * kz).sqrt()
}

fn describe(nx: u32, ny: u32, nz: u32) -> String {
    match (nx, ny, nz) {
        (n, 0, 0) => format!("{},0,0 - Length mode (X)", n),
        (0, m, 0) => format!("0,{},0 - Height mode (Y)", m),
        (0, 0, p) => format!("0,0,{} - Width mode (Z)", p),
        (n, 0, p) => format!("{},0,{} - Floor tangential", n, p),
        (n, m, 0) => format!("{},{},0 - Side tangential", n, m),
        (0, m, p) => format!("0,{},{} - End tangential", m, p),
        (n, m, p) => format!("{},{},{} - Oblique", n, m, p),
    }
}

/// Upper bound on the mode index along an axis of length `length`.
///
/// This is the number of half-wavelengths of `max_frequency` that fit along the
/// axis, rounded up.
pub fn max_mode_index(length: f64, max_frequency: f64, speed_of_sound: f64) -> u32 {
    (2.0 * length * max_frequency / speed_of_sound).ceil() as u32
}

/// Calculate room modes for a rectangular room
///
/// Every index triple up to the per-axis bound from [`max_mode_index`] is
/// visited; a mode is kept when its frequency is at most
/// `max_frequency + FREQUENCY_EPSILON`. The result is sorted by ascending
/// frequency, and degenerate modes keep their discovery order.
///
/// # Errors
/// Fails when `max_frequency` or `speed_of_sound` is not positive and finite,
/// or when the room has an invalid dimension.
pub fn calculate_room_modes(
    room: &RectangularRoom,
    max_frequency: f64,
    speed_of_sound: f64,
) -> Result<Vec<RoomMode>> {
    room.validate()?;
    if !positive_finite(max_frequency) {
        return Err(RoomModesError::NonPositiveMaxFrequency {
            value: max_frequency,
        });
    }
    if !positive_finite(speed_of_sound) {
        return Err(RoomModesError::NonPositiveSpeedOfSound {
            value: speed_of_sound,
        });
    }

    let n_max_x = max_mode_index(room.length_x, max_frequency, speed_of_sound);
    let n_max_y = max_mode_index(room.length_y, max_frequency, speed_of_sound);
    let n_max_z = max_mode_index(room.length_z, max_frequency, speed_of_sound);
    debug!(
        "Enumerating modes up to {:.1} Hz with index bounds ({}, {}, {})",
        max_frequency, n_max_x, n_max_y, n_max_z
    );

    let mut modes = Vec::new();
    for nx in 0..=n_max_x {
        for ny in 0..=n_max_y {
            for nz in 0..=n_max_z {
                let Some(mode_type) = ModeType::classify(nx, ny, nz) else {
                    continue;
                };

                let frequency = mode_frequency(room, speed_of_sound, nx, ny, nz);
                if frequency > max_frequency + FREQUENCY_EPSILON {
                    continue;
                }

                modes.push(RoomMode {
                    nx,
                    ny,
                    nz,
                    frequency,
                    mode_type,
                    description: describe(nx, ny, nz),
                });
            }
        }
    }

    // Stable sort: degenerate modes keep discovery order
    modes.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));

    debug!("Found {} modes", modes.len());
    Ok(modes)
}

/// Mode totals per class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModeCounts {
    pub total: usize,
    pub axial: usize,
    pub tangential: usize,
    pub oblique: usize,
}

impl ModeCounts {
    pub fn from_modes(modes: &[RoomMode]) -> Self {
        modes.iter().fold(Self::default(), |mut counts, mode| {
            counts.total += 1;
            match mode.mode_type {
                ModeType::Axial => counts.axial += 1,
                ModeType::Tangential => counts.tangential += 1,
                ModeType::Oblique => counts.oblique += 1,
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_room() -> RectangularRoom {
        RectangularRoom::new(5.2, 2.6, 3.8).unwrap()
    }

    #[test]
    fn test_lowest_modes_of_reference_room() {
        let modes = calculate_room_modes(&reference_room(), 300.0, DEFAULT_SPEED_OF_SOUND)
            .unwrap();

        let first = &modes[0];
        assert_eq!(first.indices(), [1, 0, 0]);
        assert_eq!(first.mode_type, ModeType::Axial);
        assert!((first.frequency - 343.0 / (2.0 * 5.2)).abs() < 1e-9);
        assert!((first.frequency - 32.98).abs() < 0.01);

        let height_mode = modes
            .iter()
            .find(|m| m.indices() == [0, 1, 0])
            .expect("(0,1,0) should be below 300 Hz");
        assert_eq!(height_mode.mode_type, ModeType::Axial);
        assert!((height_mode.frequency - 65.96).abs() < 0.01);
    }

    #[test]
    fn test_modes_sorted_bounded_and_positive() {
        let modes = calculate_room_modes(&reference_room(), 200.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        assert!(!modes.is_empty());
        for pair in modes.windows(2) {
            assert!(pair[0].frequency <= pair[1].frequency);
        }
        for m in &modes {
            assert!(m.frequency > 0.0);
            assert!(m.frequency <= 200.0 + FREQUENCY_EPSILON);
            assert_ne!(m.indices(), [0, 0, 0]);
        }
    }

    #[test]
    fn test_classification_matches_zero_count() {
        let modes = calculate_room_modes(&reference_room(), 250.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        for m in &modes {
            let zeros = m.indices().iter().filter(|&&n| n == 0).count();
            let expected = match zeros {
                2 => ModeType::Axial,
                1 => ModeType::Tangential,
                _ => ModeType::Oblique,
            };
            assert_eq!(m.mode_type, expected, "mode {:?}", m.indices());
        }
    }

    #[test]
    fn test_boundary_mode_is_kept() {
        // (1,0,0) of a 1.715 m axis sits exactly at 100 Hz
        let room = RectangularRoom::new(1.715, 1.0, 1.0).unwrap();
        let modes = calculate_room_modes(&room, 100.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        assert!(modes.iter().any(|m| m.indices() == [1, 0, 0]));
    }

    #[test]
    fn test_degenerate_modes_keep_discovery_order() {
        // Cube: (1,0,0), (0,1,0), (0,0,1) share one frequency
        let room = RectangularRoom::new(2.0, 2.0, 2.0).unwrap();
        let modes = calculate_room_modes(&room, 100.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        let first_three: Vec<[u32; 3]> = modes.iter().take(3).map(|m| m.indices()).collect();
        assert_eq!(first_three, vec![[0, 0, 1], [0, 1, 0], [1, 0, 0]]);
    }

    #[test]
    fn test_ceiling_below_first_mode_gives_empty_set() {
        let modes = calculate_room_modes(&reference_room(), 10.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        assert!(modes.is_empty());
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let room = reference_room();
        assert!(matches!(
            calculate_room_modes(&room, 0.0, 343.0),
            Err(RoomModesError::NonPositiveMaxFrequency { .. })
        ));
        assert!(matches!(
            calculate_room_modes(&room, -5.0, 343.0),
            Err(RoomModesError::NonPositiveMaxFrequency { .. })
        ));
        assert!(matches!(
            calculate_room_modes(&room, 300.0, 0.0),
            Err(RoomModesError::NonPositiveSpeedOfSound { .. })
        ));

        let bad_room = RectangularRoom {
            length_x: 5.0,
            length_y: 0.0,
            length_z: 3.0,
        };
        assert!(matches!(
            calculate_room_modes(&bad_room, 300.0, 343.0),
            Err(RoomModesError::NonPositiveDimension { axis: "y", .. })
        ));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(describe(2, 0, 0), "2,0,0 - Length mode (X)");
        assert_eq!(describe(0, 1, 0), "0,1,0 - Height mode (Y)");
        assert_eq!(describe(0, 0, 3), "0,0,3 - Width mode (Z)");
        assert_eq!(describe(1, 0, 1), "1,0,1 - Floor tangential");
        assert_eq!(describe(1, 1, 1), "1,1,1 - Oblique");
    }

    #[test]
    fn test_counts() {
        let modes = calculate_room_modes(&reference_room(), 120.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        let counts = ModeCounts::from_modes(&modes);
        assert_eq!(counts.total, modes.len());
        assert_eq!(counts.axial + counts.tangential + counts.oblique, counts.total);
        assert!(counts.axial >= 3);
        assert_eq!(ModeCounts::from_modes(&[]), ModeCounts::default());
    }

    #[test]
    fn test_max_mode_index() {
        assert_eq!(max_mode_index(5.2, 300.0, 343.0), 10);
        assert_eq!(max_mode_index(2.0, 343.0, 343.0), 4);
    }

    #[test]
    fn test_mode_json_field_names() {
        let modes = calculate_room_modes(&reference_room(), 40.0, DEFAULT_SPEED_OF_SOUND).unwrap();
        let json = serde_json::to_value(&modes[0]).unwrap();
        assert_eq!(json["type"], "axial");
        assert!((json["f"].as_f64().unwrap() - modes[0].frequency).abs() < 1e-12);
        assert_eq!(json["nx"], 1);

        let parsed: RoomMode = serde_json::from_str(
            r#"{"nx": 0, "ny": 1, "nz": 0, "frequency": 65.96, "mode_type": "axial", "description": ""}"#,
        )
        .unwrap();
        assert_eq!(parsed.mode_type, ModeType::Axial);
        assert_eq!(parsed.indices(), [0, 1, 0]);
    }
}
