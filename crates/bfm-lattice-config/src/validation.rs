// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so a user fixes the file once.

use bfm_lattice_curves::{floor_log2, CurveMode, MAX_DENSE_ZORDER_EXTENT};

use crate::{ConfigError, ConfigResult, LatticeConfig};

/// Log levels accepted in `logging.level`
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

/// Largest extent per axis for which Z-order indices stay distinct.
///
/// The z lane is shifted up by 2 after dilution, so bit 10 of z falls out
/// of the 32-bit index.
pub const MAX_ZORDER_EXTENT: u32 = MAX_DENSE_ZORDER_EXTENT;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    ZeroExtent { field: String },
    UnknownCurve { name: String },
    NotPowerOfTwo { field: String, value: u64 },
    ZOrderLaneOverflow { field: String, value: u32 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroExtent { field } => write!(f, "{} must be at least 1", field),
            Self::UnknownCurve { name } => write!(
                f,
                "lattice.curve = '{}' is not one of zorder, linear, linear_pow2",
                name
            ),
            Self::NotPowerOfTwo { field, value } => write!(
                f,
                "{} = {} is not a power of two (required by curve linear_pow2, nearest lower is {})",
                field,
                value,
                1u64 << floor_log2(*value)
            ),
            Self::ZOrderLaneOverflow { field, value } => write!(
                f,
                "{} = {} exceeds the zorder limit of {}",
                field, value, MAX_ZORDER_EXTENT
            ),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Zero box extents
/// - Unknown curve names
/// - Power-of-two extents when the curve is `linear_pow2`
/// - Extents beyond the Z-order lane width when the curve is `zorder`
/// - Unknown log levels
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &LatticeConfig) -> ConfigResult<()> {
    let errors = collect_validation_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every validation problem in `config`, in file order
pub fn collect_validation_errors(config: &LatticeConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_extents(config, &mut errors);
    validate_curve(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn extent_fields(config: &LatticeConfig) -> [(&'static str, u32); 3] {
    [
        ("lattice.box_x", config.lattice.box_x),
        ("lattice.box_y", config.lattice.box_y),
        ("lattice.box_z", config.lattice.box_z),
    ]
}

fn validate_extents(config: &LatticeConfig, errors: &mut Vec<ConfigValidationError>) {
    for (field, value) in extent_fields(config) {
        if value == 0 {
            errors.push(ConfigValidationError::ZeroExtent {
                field: field.to_string(),
            });
        }
    }
}

fn validate_curve(config: &LatticeConfig, errors: &mut Vec<ConfigValidationError>) {
    let mode = match config.lattice.curve_mode() {
        Ok(mode) => mode,
        Err(_) => {
            errors.push(ConfigValidationError::UnknownCurve {
                name: config.lattice.curve.clone(),
            });
            return;
        }
    };

    match mode {
        CurveMode::LinearPowOfTwo => {
            for (field, value) in extent_fields(config) {
                if value != 0 && !value.is_power_of_two() {
                    errors.push(ConfigValidationError::NotPowerOfTwo {
                        field: field.to_string(),
                        value: value as u64,
                    });
                }
            }
        }
        CurveMode::ZOrder => {
            for (field, value) in extent_fields(config) {
                if value > MAX_ZORDER_EXTENT {
                    errors.push(ConfigValidationError::ZOrderLaneOverflow {
                        field: field.to_string(),
                        value,
                    });
                }
            }
        }
        CurveMode::Linear => {}
    }
}

fn validate_logging(config: &LatticeConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }
    if config.logging.file_logging && config.logging.log_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.log_dir".to_string(),
            reason: "must be set when file_logging is enabled".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatticeSection, LoggingSection};

    fn config(box_x: u32, box_y: u32, box_z: u32, curve: &str) -> LatticeConfig {
        LatticeConfig {
            lattice: LatticeSection {
                box_x,
                box_y,
                box_z,
                curve: curve.to_string(),
            },
            logging: LoggingSection::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LatticeConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_extent() {
        let errors = collect_validation_errors(&config(8, 0, 8, "linear"));
        assert_eq!(
            errors,
            vec![ConfigValidationError::ZeroExtent {
                field: "lattice.box_y".to_string()
            }]
        );
    }

    #[test]
    fn test_pow2_curve_requires_power_of_two() {
        let errors = collect_validation_errors(&config(3, 4, 12, "linear_pow2"));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ConfigValidationError::NotPowerOfTwo {
                field: "lattice.box_x".to_string(),
                value: 3
            }
        );
        assert!(errors[1].to_string().contains("lattice.box_z = 12"));
        assert!(errors[1].to_string().contains("nearest lower is 8"));

        // Same box is fine for the row-major modulo curve
        assert!(collect_validation_errors(&config(3, 4, 12, "linear")).is_empty());
    }

    #[test]
    fn test_zorder_lane_limit() {
        assert!(collect_validation_errors(&config(1024, 1024, 1024, "zorder")).is_empty());

        // z = 1024 and z = 0 would share index 0
        let errors = collect_validation_errors(&config(8, 8, 2048, "zorder"));
        assert_eq!(
            errors,
            vec![ConfigValidationError::ZOrderLaneOverflow {
                field: "lattice.box_z".to_string(),
                value: 2048
            }]
        );
        assert!(errors[0].to_string().contains("limit of 1024"));

        let errors = collect_validation_errors(&config(4096, 8, 8, "zorder"));
        assert!(matches!(
            errors.as_slice(),
            [ConfigValidationError::ZOrderLaneOverflow { value: 4096, .. }]
        ));

        // The row-major curve has no lane budget
        assert!(collect_validation_errors(&config(8, 8, 2048, "linear")).is_empty());
    }

    #[test]
    fn test_unknown_curve_and_level_are_both_reported() {
        let mut bad = config(8, 8, 8, "hilbert");
        bad.logging.level = "verbose".to_string();

        let err = validate_config(&bad).unwrap_err().to_string();
        assert!(err.contains("lattice.curve = 'hilbert'"), "{}", err);
        assert!(err.contains("logging.level"), "{}", err);
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut cfg = LatticeConfig::default();
        cfg.logging.level = "WARNING".to_string();
        assert!(validate_config(&cfg).is_ok());
    }
}
