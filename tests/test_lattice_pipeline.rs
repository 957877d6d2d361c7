// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Lattice Pipeline Integration Tests
//!
//! Config file -> validated curve -> staged constants -> host and device
//! batches, the way a simulation driver uses the crates together.

use std::collections::HashMap;
use std::fs;

use bfm_lattice::curves::checked_device_linearize_batch;
use bfm_lattice::prelude::*;
use proptest::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("bfm_lattice.toml");
    fs::write(&path, body).unwrap();
    path
}

// ============================================================================
// TEST 1: File to staged lattice
// ============================================================================

#[test]
fn test_open_lattice_stages_constants() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[lattice]\nbox_x = 8\nbox_y = 8\nbox_z = 8\ncurve = \"zorder\"\n",
    );
    let bank = ConstantBank::new();

    let (config, curve) = bfm_lattice::open_lattice(Some(&path), None, Some(&bank)).unwrap();

    assert_eq!(config.lattice.curve, "zorder");
    assert_eq!(bank.generation(), 1);
    assert_eq!(bank.snapshot().unwrap(), curve.device_constants());

    let coords: Vec<[i32; 3]> = vec![[0, 0, 0], [1, 1, 1], [9, -7, 1], [7, 7, 7]];
    let host = linearize_batch(&curve, &coords).unwrap();
    let device = checked_device_linearize_batch(&bank, &curve, &coords).unwrap();
    assert_eq!(host, vec![0, 7, 7, 511]);
    assert_eq!(host, device);

    println!("✅ Config -> staged lattice - PASSED");
}

#[test]
fn test_open_lattice_defaults_to_global_bank() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[lattice]\nbox_x = 4\nbox_y = 4\nbox_z = 4\ncurve = \"linear\"\n",
    );

    let (_, curve) = bfm_lattice::open_lattice(Some(&path), None, None).unwrap();

    let global = ConstantBank::global();
    assert!(global.generation() >= 1);
    let coords = [[3i32, 3, 3], [-1, 0, 0]];
    assert_eq!(
        checked_device_linearize_batch(global, &curve, &coords).unwrap(),
        vec![63, 3]
    );
}

#[test]
fn test_cli_override_switches_curve() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "[lattice]\nbox_x = 8\nbox_y = 8\nbox_z = 8\n");
    let bank = ConstantBank::new();

    let mut cli = HashMap::new();
    cli.insert("curve".to_string(), "linear".to_string());
    let (_, curve) = bfm_lattice::open_lattice(Some(&path), Some(&cli), Some(&bank)).unwrap();

    assert_eq!(curve.mode(), Some(CurveMode::Linear));
    assert_eq!(curve.linearize(1u32, 2, 3), 1 + 16 + 192);
}

// ============================================================================
// TEST 2: Invalid configurations are refused before anything is staged
// ============================================================================

#[test]
fn test_pow2_curve_with_odd_box_is_refused() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[lattice]\nbox_x = 3\nbox_y = 4\nbox_z = 8\ncurve = \"linear_pow2\"\n",
    );
    let bank = ConstantBank::new();

    let err = bfm_lattice::open_lattice(Some(&path), None, Some(&bank)).unwrap_err();
    assert!(format!("{err:#}").contains("lattice.box_x = 3"), "{err:#}");
    assert!(!bank.is_staged());
}

#[test]
fn test_curve_from_config_reports_curve_error_chain() {
    // Validation passes (zorder accepts any size) so the facade builds directly
    let mut config = LatticeConfig::default();
    config.lattice.box_x = 3;
    let curve = bfm_lattice::curve_from_config(&config).unwrap();
    assert!(!curve.pow2_available());

    // Switching that facade to mask/shift mode fails with the box diagnostics
    let mut curve = curve;
    let err = curve.set_mode(CurveMode::LinearPowOfTwo).unwrap_err();
    assert!(err.to_string().contains("boxX=3"));
    assert_eq!(curve.mode(), Some(CurveMode::ZOrder));
}

// ============================================================================
// TEST 3: Host and device agree for every mode through the umbrella API
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_umbrella_host_device_agreement(
        log_x in 0u32..=5,
        log_y in 0u32..=5,
        log_z in 0u32..=5,
        coords in prop::collection::vec(prop::array::uniform3(-500i32..500), 1..64),
    ) {
        let extent = BoxExtent::new(1 << log_x, 1 << log_y, 1 << log_z).unwrap();
        let bank = ConstantBank::new();
        for mode in CurveMode::ALL {
            let curve = SpaceFillingCurve::new(extent, mode).unwrap();
            stage_for_launch(&bank, &curve).unwrap();
            let host = linearize_batch(&curve, &coords).unwrap();
            let device = device_linearize_batch(&bank, mode, &coords).unwrap();
            prop_assert_eq!(host, device);
        }
    }
}
