// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Lattice curve inspector.
//!
//! Loads `bfm_lattice.toml` (or runs on defaults with `--no-config`), prints
//! the index of every site for small boxes and a locality summary comparing
//! all curve modes on the configured box.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use bfm_lattice::config::{apply_cli_overrides, LatticeConfig, LoggingSection};
use bfm_lattice::curves::{stage_for_launch, BoxExtent, ConstantBank, CurveMode, SpaceFillingCurve};
use bfm_lattice::observability::{
    debug_flags_help, init_logging_with_options, parse_debug_flags, LoggingOptions,
};
use tracing::{debug, info, warn};

/// Sites above which the index table is skipped
const TABLE_MAX_VOLUME: u64 = 512;

/// Sites above which the locality summary samples a sub-box
const LOCALITY_MAX_EDGE: u32 = 64;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: curve_inspect [--config <path> | --no-config] [--box <n>] [--box-x <n>] \
         [--box-y <n>] [--box-z <n>] [--curve <zorder|linear|linear_pow2>] [--log-level <level>]\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

struct Args {
    config_path: Option<PathBuf>,
    no_config: bool,
    overrides: HashMap<String, String>,
}

fn next_value(args: &mut impl Iterator<Item = String>) -> String {
    args.next().unwrap_or_else(|| usage_and_exit())
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config_path: None,
        no_config: false,
        overrides: HashMap::new(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let key = match arg.as_str() {
            "--config" => {
                parsed.config_path = Some(PathBuf::from(next_value(&mut args)));
                continue;
            }
            "--no-config" => {
                parsed.no_config = true;
                continue;
            }
            "--box" => {
                let v = next_value(&mut args);
                for key in ["box_y", "box_z"] {
                    parsed.overrides.insert(key.to_string(), v.clone());
                }
                parsed.overrides.insert("box_x".to_string(), v);
                continue;
            }
            "--box-x" => "box_x",
            "--box-y" => "box_y",
            "--box-z" => "box_z",
            "--curve" => "curve",
            "--log-level" => "log_level",
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => continue,
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        };
        parsed.overrides.insert(key.to_string(), next_value(&mut args));
    }

    parsed
}

fn load_config(args: &Args) -> Result<LatticeConfig> {
    if args.no_config {
        let mut config = LatticeConfig::default();
        apply_cli_overrides(&mut config, &args.overrides)?;
        return Ok(config);
    }
    let config = bfm_lattice::config::load_config(args.config_path.as_deref(), Some(&args.overrides))
        .context("Failed to load lattice config")?;
    Ok(config)
}

fn logging_options(section: &LoggingSection) -> LoggingOptions {
    LoggingOptions {
        level: section.level.clone(),
        file_logging: section.file_logging,
        log_dir: section.log_dir.clone(),
        ..LoggingOptions::default()
    }
}

fn print_index_table(curve: &SpaceFillingCurve, extent: BoxExtent) {
    for z in 0..extent.z() {
        println!("z = {z}");
        for y in (0..extent.y()).rev() {
            let row: Vec<String> = (0..extent.x())
                .map(|x| format!("{:>4}", curve.linearize(x, y, z)))
                .collect();
            println!("  y={y:<3}{}", row.join(""));
        }
    }
}

/// Mean |index difference| between each site and its +x, +y, +z neighbours
fn locality(curve: &SpaceFillingCurve, extent: BoxExtent) -> [f64; 3] {
    let [ex, ey, ez] = extent.as_array().map(|e| e.min(LOCALITY_MAX_EDGE));
    let mut sums = [0u64; 3];
    let mut sites = 0u64;
    for z in 0..ez {
        for y in 0..ey {
            for x in 0..ex {
                let here = curve.linearize(x, y, z) as i64;
                let neighbours = [
                    curve.linearize(x + 1, y, z),
                    curve.linearize(x, y + 1, z),
                    curve.linearize(x, y, z + 1),
                ];
                for (sum, there) in sums.iter_mut().zip(neighbours) {
                    *sum += (there as i64 - here).unsigned_abs();
                }
                sites += 1;
            }
        }
    }
    sums.map(|s| s as f64 / sites as f64)
}

fn run() -> Result<()> {
    let args = parse_args();
    let config = load_config(&args)?;

    let _guard = init_logging_with_options(&parse_debug_flags(), &logging_options(&config.logging))
        .context("Failed to initialize logging")?;

    let curve = bfm_lattice::curve_from_config(&config)?;
    let generation = stage_for_launch(ConstantBank::global(), &curve)?;

    let extent = config.lattice.extent()?;
    let mode = config.lattice.curve_mode()?;
    info!("box {} with curve {}", extent, mode);
    debug!(
        "device constants (generation {}): {:?}",
        generation,
        curve.device_constants()
    );

    if extent.volume() <= TABLE_MAX_VOLUME {
        println!("Index table ({mode}, box {extent}):");
        print_index_table(&curve, extent);
    } else {
        debug!("box volume {} too large for index table", extent.volume());
    }

    println!();
    println!("Locality: mean |index step| to +x / +y / +z neighbour");
    for candidate in CurveMode::ALL {
        match SpaceFillingCurve::new(extent, candidate) {
            Ok(other) => {
                let [dx, dy, dz] = locality(&other, extent);
                let marker = if candidate == mode { "*" } else { " " };
                println!("{marker} {candidate:<12} {dx:>10.2} {dy:>10.2} {dz:>10.2}");
            }
            Err(e) => warn!("{} unavailable for box {}: {}", candidate, extent, e),
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("curve_inspect: {e:#}");
        process::exit(1);
    }
}
