//! Room Modes - rectangular room mode calculator and pressure field sampler
//!
//! Enumerates the resonant modes of a rectangular room and samples the
//! steady-state modal pressure field on a horizontal slice or a volumetric
//! grid. Results are written as JSON for an external renderer.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use schemars::schema_for;
use std::path::PathBuf;

use roommodes::config::clamp_slice_height;
use roommodes::{
    ModeCounts, VisualizerConfig, calculate_room_modes, load_config, scalars_to_rgba,
    synthesize_slice, synthesize_volume, threshold_points, validate_config,
};

mod output;

use output::{CloudOutput, FieldOutput, ModesOutput, print_mode_table, write_json};

/// Room Modes - standing waves in rectangular rooms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration file (missing fields use defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Room length along x (m)
    #[arg(long, global = true)]
    length_x: Option<f64>,

    /// Room height along y (m)
    #[arg(long, global = true)]
    length_y: Option<f64>,

    /// Room width along z (m)
    #[arg(long, global = true)]
    length_z: Option<f64>,

    /// Mode enumeration ceiling (Hz)
    #[arg(long, global = true)]
    max_frequency: Option<f64>,

    /// Speed of sound (m/s)
    #[arg(long, global = true)]
    speed_of_sound: Option<f64>,

    /// Probe frequency for field synthesis (Hz)
    #[arg(short, long, global = true)]
    frequency: Option<f64>,

    /// Q factor (damping) of every mode
    #[arg(short, long, global = true)]
    q_factor: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the modes below the frequency ceiling
    Modes {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Output file for JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample the normalized field on a horizontal slice
    Slice {
        /// Slice height (m), clamped inside the room
        #[arg(short, long)]
        y: Option<f64>,

        /// Samples along x
        #[arg(long)]
        res_x: Option<usize>,

        /// Samples along z
        #[arg(long)]
        res_z: Option<usize>,

        /// Include the turbo RGBA8 buffer
        #[arg(long)]
        rgba: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample the normalized field on a cubic grid
    Volume {
        /// Samples per axis
        #[arg(long)]
        res: Option<usize>,

        /// Emit only cells at or above this normalized value as a point cloud
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Include the turbo RGBA8 buffer (ignored with --threshold)
        #[arg(long)]
        rgba: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the configuration and report problems
    Validate,

    /// Print the JSON schema of the configuration file
    Schema,
}

fn build_config(args: &Args) -> Result<VisualizerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => VisualizerConfig::default(),
    };

    if let Some(v) = args.length_x {
        config.room.length_x = v;
    }
    if let Some(v) = args.length_y {
        config.room.length_y = v;
    }
    if let Some(v) = args.length_z {
        config.room.length_z = v;
    }
    if let Some(v) = args.max_frequency {
        config.max_frequency = v;
    }
    if let Some(v) = args.speed_of_sound {
        config.speed_of_sound = v;
    }
    if let Some(v) = args.frequency {
        config.frequency = v;
    }
    if let Some(v) = args.q_factor {
        config.q_factor = v;
    }

    match &args.command {
        Command::Slice {
            y, res_x, res_z, ..
        } => {
            if let Some(y) = y {
                config.slice_y = *y;
            }
            if let Some(r) = res_x {
                config.slice_resolution[0] = *r;
            }
            if let Some(r) = res_z {
                config.slice_resolution[1] = *r;
            }
        }
        Command::Volume { res, threshold, .. } => {
            if let Some(r) = res {
                config.volume_resolution = *r;
            }
            if let Some(t) = threshold {
                config.volume_threshold = *t;
            }
        }
        _ => {}
    }

    Ok(config)
}

fn check_config(config: &VisualizerConfig) -> Result<()> {
    let result = validate_config(config);
    for warning in &result.warnings {
        warn!("{}", warning);
    }
    if !result.is_valid {
        return Err(anyhow!(
            "Invalid configuration:\n  {}",
            result.errors.join("\n  ")
        ));
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger with default level INFO (use RUST_LOG env var to override)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Command::Schema = args.command {
        let schema = schema_for!(VisualizerConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let config = build_config(&args)?;
    debug!("Effective configuration: {:?}", config);
    check_config(&config)?;

    let room = config.room;
    let modes = calculate_room_modes(&room, config.max_frequency, config.speed_of_sound)
        .context("Mode enumeration failed")?;
    let counts = ModeCounts::from_modes(&modes);
    info!(
        "Room {:.2} x {:.2} x {:.2} m: {} modes up to {:.0} Hz",
        room.length_x, room.length_y, room.length_z, counts.total, config.max_frequency
    );

    match &args.command {
        Command::Modes { json, output } => {
            if *json || output.is_some() {
                let doc = ModesOutput {
                    room,
                    max_frequency: config.max_frequency,
                    speed_of_sound: config.speed_of_sound,
                    counts,
                    modes: &modes,
                };
                write_json(&doc, output.as_deref())?;
            } else {
                print_mode_table(&modes, &counts);
            }
        }
        Command::Slice { rgba, output, .. } => {
            let y = clamp_slice_height(config.slice_y, room.length_y);
            let [res_x, res_z] = config.slice_resolution;
            let field = synthesize_slice(&room, &modes, &config.field_params(), y, res_x, res_z)
                .context("Slice synthesis failed")?;
            let values = field.into_raw_vec_and_offset().0;
            let doc = FieldOutput {
                kind: "slice",
                room,
                frequency: config.frequency,
                q_factor: config.q_factor,
                y: Some(y),
                shape: vec![res_x, res_z],
                rgba: rgba.then(|| scalars_to_rgba(&values)),
                values,
            };
            write_json(&doc, output.as_deref())?;
        }
        Command::Volume {
            threshold,
            rgba,
            output,
            ..
        } => {
            let res = config.volume_resolution;
            let field = synthesize_volume(&room, &modes, &config.field_params(), res)
                .context("Volume synthesis failed")?;

            if threshold.is_some() {
                let cloud = threshold_points(&room, &field, config.volume_threshold)?;
                info!(
                    "{} of {} cells at or above {:.2}",
                    cloud.len(),
                    field.len(),
                    config.volume_threshold
                );
                let doc = CloudOutput {
                    room,
                    frequency: config.frequency,
                    q_factor: config.q_factor,
                    resolution: res,
                    threshold: config.volume_threshold,
                    count: cloud.len(),
                    cloud: &cloud,
                };
                write_json(&doc, output.as_deref())?;
            } else {
                let values = field.into_raw_vec_and_offset().0;
                let doc = FieldOutput {
                    kind: "volume",
                    room,
                    frequency: config.frequency,
                    q_factor: config.q_factor,
                    y: None,
                    shape: vec![res, res, res],
                    rgba: rgba.then(|| scalars_to_rgba(&values)),
                    values,
                };
                write_json(&doc, output.as_deref())?;
            }
        }
        Command::Validate => {
            info!("Configuration is valid");
        }
        Command::Schema => unreachable!("handled above"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from([
            "roommodes",
            "--length-x",
            "6.0",
            "-q",
            "12",
            "slice",
            "--res-x",
            "40",
            "-y",
            "0.5",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.room.length_x, 6.0);
        assert_eq!(config.room.length_y, 2.6);
        assert_eq!(config.q_factor, 12.0);
        assert_eq!(config.slice_resolution, [40, 160]);
        assert_eq!(config.slice_y, 0.5);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["roommodes", "volume", "--res", "12", "-f", "80"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.volume_resolution, 12);
        assert_eq!(config.frequency, 80.0);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let args = Args::parse_from(["roommodes", "--length-y", "0", "validate"]);
        let config = build_config(&args).unwrap();
        let err = check_config(&config).unwrap_err();
        assert!(err.to_string().contains("dimension y"));
    }
}
