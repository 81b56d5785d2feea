//! JSON documents written by the command-line tool.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use roommodes::{ModeCounts, PointCloud, RectangularRoom, RoomMode};

/// Enumerated modes with their per-class totals
#[derive(Debug, Serialize)]
pub struct ModesOutput<'a> {
    pub room: RectangularRoom,
    pub max_frequency: f64,
    pub speed_of_sound: f64,
    pub counts: ModeCounts,
    pub modes: &'a [RoomMode],
}

/// A sampled, normalized field
#[derive(Debug, Serialize)]
pub struct FieldOutput {
    /// "slice" or "volume"
    pub kind: &'static str,
    pub room: RectangularRoom,
    pub frequency: f64,
    pub q_factor: f64,
    /// Slice height; absent for volumes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// `[res_x, res_z]` or `[res, res, res]`
    pub shape: Vec<usize>,
    /// Row-major normalized values
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgba: Option<Vec<u8>>,
}

/// Volume cells at or above a threshold
#[derive(Debug, Serialize)]
pub struct CloudOutput<'a> {
    pub room: RectangularRoom,
    pub frequency: f64,
    pub q_factor: f64,
    pub resolution: usize,
    pub threshold: f64,
    pub count: usize,
    #[serde(flatten)]
    pub cloud: &'a PointCloud,
}

/// Write `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match path {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Human-readable mode table
pub fn print_mode_table(modes: &[RoomMode], counts: &ModeCounts) {
    println!(
        "{:>9}  {:>3} {:>3} {:>3}  {:<10}  description",
        "freq (Hz)", "nx", "ny", "nz", "type"
    );
    for mode in modes {
        println!(
            "{:>9.2}  {:>3} {:>3} {:>3}  {:<10}  {}",
            mode.frequency,
            mode.nx,
            mode.ny,
            mode.nz,
            mode.mode_type.to_string(),
            mode.description
        );
    }
    println!(
        "Total: {} | Axial: {} | Tangential: {} | Oblique: {}",
        counts.total, counts.axial, counts.tangential, counts.oblique
    );
}
