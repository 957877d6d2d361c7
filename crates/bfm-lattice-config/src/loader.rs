// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values, missing keys take defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LatticeConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "BFM_LATTICE_CONFIG_PATH";

/// Find the lattice configuration file
///
/// Search order:
/// 1. `BFM_LATTICE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./bfm_lattice.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found, cannot be read, contains
/// invalid TOML, or an override value cannot be parsed. Semantic checks live
/// in [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<LatticeConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: LatticeConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

fn parse_extent(source: &str, value: &str) -> ConfigResult<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        ConfigError::InvalidValue(format!(
            "{} must be a non-negative integer, got '{}'",
            source, value
        ))
    })
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `BFM_LATTICE_BOX_X` -> `lattice.box_x`
/// - `BFM_LATTICE_BOX_Y` -> `lattice.box_y`
/// - `BFM_LATTICE_BOX_Z` -> `lattice.box_z`
/// - `BFM_LATTICE_CURVE` -> `lattice.curve`
/// - `BFM_LATTICE_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut LatticeConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("BFM_LATTICE_BOX_X") {
        config.lattice.box_x = parse_extent("BFM_LATTICE_BOX_X", &value)?;
    }
    if let Ok(value) = env::var("BFM_LATTICE_BOX_Y") {
        config.lattice.box_y = parse_extent("BFM_LATTICE_BOX_Y", &value)?;
    }
    if let Ok(value) = env::var("BFM_LATTICE_BOX_Z") {
        config.lattice.box_z = parse_extent("BFM_LATTICE_BOX_Z", &value)?;
    }
    if let Ok(value) = env::var("BFM_LATTICE_CURVE") {
        config.lattice.curve = value;
    }
    if let Ok(value) = env::var("BFM_LATTICE_LOG_LEVEL") {
        config.logging.level = value;
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - CLI arguments by key (e.g., `{"box_x": "32", "curve": "linear"}`)
pub fn apply_cli_overrides(
    config: &mut LatticeConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("box_x") {
        config.lattice.box_x = parse_extent("--box-x", value)?;
    }
    if let Some(value) = cli_args.get("box_y") {
        config.lattice.box_y = parse_extent("--box-y", value)?;
    }
    if let Some(value) = cli_args.get("box_z") {
        config.lattice.box_z = parse_extent("--box-z", value)?;
    }
    if let Some(value) = cli_args.get("curve") {
        config.lattice.curve = value.clone();
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: [&str; 5] = [
        "BFM_LATTICE_BOX_X",
        "BFM_LATTICE_BOX_Y",
        "BFM_LATTICE_BOX_Z",
        "BFM_LATTICE_CURVE",
        "BFM_LATTICE_LOG_LEVEL",
    ];

    fn clear_overrides() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_lattice.toml");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing_file() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nope.toml");

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_overrides();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[lattice]").unwrap();
        writeln!(file, "box_x = 16").unwrap();
        writeln!(file, "curve = \"linear\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.lattice.box_x, 16);
        assert_eq!(config.lattice.box_y, 64);
        assert_eq!(config.lattice.curve, "linear");
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = LatticeConfig::default();

        env::set_var("BFM_LATTICE_BOX_Z", "128");
        env::set_var("BFM_LATTICE_CURVE", "linear_pow2");
        let result = apply_environment_overrides(&mut config);
        clear_overrides();

        result.unwrap();
        assert_eq!(config.lattice.box_z, 128);
        assert_eq!(config.lattice.curve, "linear_pow2");
    }

    #[test]
    fn test_environment_override_rejects_garbage() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = LatticeConfig::default();

        env::set_var("BFM_LATTICE_BOX_X", "-4");
        let result = apply_environment_overrides(&mut config);
        clear_overrides();

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
        assert_eq!(config.lattice.box_x, 64);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LatticeConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("box_x".to_string(), "32".to_string());
        cli_args.insert("log_level".to_string(), "debug".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.lattice.box_x, 32);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_overrides();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[lattice]").unwrap();
        writeln!(file, "box_x = 8").unwrap();
        writeln!(file, "box_y = 8").unwrap();

        env::set_var("BFM_LATTICE_BOX_X", "16");
        env::set_var("BFM_LATTICE_BOX_Y", "16");

        let mut cli_args = HashMap::new();
        cli_args.insert("box_x".to_string(), "32".to_string());

        let result = load_config(Some(&config_path), Some(&cli_args));
        clear_overrides();
        let config = result.unwrap();

        // CLI wins for x, env wins for y (no CLI override)
        assert_eq!(config.lattice.box_x, 32);
        assert_eq!(config.lattice.box_y, 16);
    }
}
