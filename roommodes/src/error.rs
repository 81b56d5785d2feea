//! Error types for the roommodes crate.
//!
//! Every public computation validates its inputs at the boundary and reports
//! the offending parameter through [`RoomModesError`]. Degenerate but valid
//! numeric situations (no modes below the ceiling, a flat field) are not
//! errors.

use thiserror::Error;

/// Error type for room mode and field computations.
#[derive(Debug, Error)]
pub enum RoomModesError {
    /// A room dimension is zero, negative or not finite.
    #[error("room dimension {axis} must be a positive finite length, got {value}")]
    NonPositiveDimension {
        /// Axis name ("x", "y" or "z").
        axis: &'static str,
        /// The rejected value in meters.
        value: f64,
    },

    /// The mode enumeration ceiling is zero, negative or not finite.
    #[error("maximum frequency must be positive and finite, got {value} Hz")]
    NonPositiveMaxFrequency {
        /// The rejected value in Hz.
        value: f64,
    },

    /// The speed of sound is zero, negative or not finite.
    #[error("speed of sound must be positive and finite, got {value} m/s")]
    NonPositiveSpeedOfSound {
        /// The rejected value in m/s.
        value: f64,
    },

    /// The damping factor is zero, negative or not finite.
    #[error("Q factor must be positive and finite, got {value}")]
    InvalidQFactor {
        /// The rejected Q.
        value: f64,
    },

    /// The probe frequency is negative or not finite.
    #[error("probe frequency must be non-negative and finite, got {value} Hz")]
    InvalidProbeFrequency {
        /// The rejected value in Hz.
        value: f64,
    },

    /// The slice plane lies outside `[0, height]`.
    #[error("slice height {y} m is outside the room height [0, {height}] m")]
    SlicePlaneOutOfRange {
        /// Requested plane height.
        y: f64,
        /// Room height along y.
        height: f64,
    },

    /// A visualization threshold lies outside `[0, 1]`.
    #[error("threshold must lie in [0, 1], got {value}")]
    ThresholdOutOfRange {
        /// The rejected threshold.
        value: f64,
    },

    /// A sampling resolution is zero.
    #[error("sampling resolution '{name}' must be at least 1")]
    ZeroResolution {
        /// Which resolution parameter ("res_x", "res_z" or "res").
        name: &'static str,
    },

    /// A sampling resolution yields more samples than fit in memory addressing.
    #[error("sampling resolution '{name}' = {value} overflows the sample count")]
    ResolutionTooLarge {
        /// Which resolution parameter ("res_x", "res_z" or "res").
        name: &'static str,
        /// The rejected resolution.
        value: usize,
    },

    /// A supplied mode has a non-positive or non-finite frequency, or all-zero indices.
    #[error("mode #{index} is invalid: indices {indices:?}, frequency {frequency} Hz")]
    InvalidMode {
        /// Position of the mode in the supplied slice.
        index: usize,
        /// `[nx, ny, nz]` of the rejected mode.
        indices: [u32; 3],
        /// Its frequency in Hz.
        frequency: f64,
    },

    /// A field buffer does not match its declared shape.
    #[error("field shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// I/O error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for roommodes operations.
pub type Result<T> = std::result::Result<T, RoomModesError>;

impl RoomModesError {
    /// Returns true if this error reports a parameter outside its domain.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RoomModesError::NonPositiveDimension { .. }
                | RoomModesError::NonPositiveMaxFrequency { .. }
                | RoomModesError::NonPositiveSpeedOfSound { .. }
                | RoomModesError::InvalidQFactor { .. }
                | RoomModesError::InvalidProbeFrequency { .. }
                | RoomModesError::SlicePlaneOutOfRange { .. }
                | RoomModesError::ThresholdOutOfRange { .. }
                | RoomModesError::ZeroResolution { .. }
                | RoomModesError::ResolutionTooLarge { .. }
                | RoomModesError::InvalidMode { .. }
        )
    }

    /// Returns true if this is a file/IO or parsing error.
    pub fn is_io_error(&self) -> bool {
        matches!(self, RoomModesError::Io(_) | RoomModesError::Json(_))
    }
}

/// Accept `value` if it is finite and strictly positive.
pub(crate) fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_classified() {
        let err = RoomModesError::InvalidQFactor { value: 0.0 };
        assert!(err.is_input_error());
        assert!(!err.is_io_error());

        let err = RoomModesError::ZeroResolution { name: "res" };
        assert!(err.is_input_error());

        let err = RoomModesError::ResolutionTooLarge {
            name: "res",
            value: usize::MAX,
        };
        assert!(err.is_input_error());

        let err = RoomModesError::InvalidMode {
            index: 2,
            indices: [1, 0, 0],
            frequency: f64::NAN,
        };
        assert!(err.is_input_error());
        assert!(err.to_string().contains("mode #2"));
    }

    #[test]
    fn test_io_errors_are_classified() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RoomModesError = io.into();
        assert!(err.is_io_error());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_message_names_the_parameter() {
        let err = RoomModesError::NonPositiveDimension {
            axis: "y",
            value: -1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("dimension y"), "got: {}", msg);
        assert!(msg.contains("-1"), "got: {}", msg);
    }

    #[test]
    fn test_positive_finite() {
        assert!(positive_finite(1e-9));
        assert!(!positive_finite(0.0));
        assert!(!positive_finite(-2.0));
        assert!(!positive_finite(f64::NAN));
        assert!(!positive_finite(f64::INFINITY));
    }
}
