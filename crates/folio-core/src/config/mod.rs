pub mod builtin;
pub mod schema;

use crate::error::FolioError;
use schema::LayoutConfig;
use std::path::Path;

/// Load a layout configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<LayoutConfig, FolioError> {
    let content = std::fs::read_to_string(path).map_err(|e| FolioError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a layout configuration from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<LayoutConfig, FolioError> {
    let config: LayoutConfig = serde_json::from_str(json).map_err(|e| FolioError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a layout configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<LayoutConfig, FolioError> {
    let config: LayoutConfig = serde_json::from_str(json).map_err(FolioError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that every threshold is usable.
pub fn validate_config(config: &LayoutConfig) -> Result<(), FolioError> {
    let distances = [
        ("row_threshold", config.row_threshold),
        ("column_gap", config.column_gap),
        ("line_threshold", config.line_threshold),
        ("max_row_gap", config.max_row_gap),
        ("font_scale", config.font_scale),
        ("min_font_size", config.min_font_size),
    ];
    for (name, value) in distances {
        if !value.is_finite() || value <= 0.0 {
            return Err(FolioError::ConfigInvalid(format!(
                "{} must be a positive number, got {}",
                name, value
            )));
        }
    }

    if !config.column_slack.is_finite() || config.column_slack < 0.0 {
        return Err(FolioError::ConfigInvalid(format!(
            "column_slack must not be negative, got {}",
            config.column_slack
        )));
    }

    if !config.max_font_size.is_finite() || config.max_font_size < config.min_font_size {
        return Err(FolioError::ConfigInvalid(format!(
            "max_font_size ({}) must be at least min_font_size ({})",
            config.max_font_size, config.min_font_size
        )));
    }

    if config.heading_max_len == 0 || config.colon_heading_max_len == 0 {
        return Err(FolioError::ConfigInvalid(
            "heading lengths must be greater than zero".into(),
        ));
    }

    if config.vendor_scan_lines == 0 {
        return Err(FolioError::ConfigInvalid(
            "vendor_scan_lines must be greater than zero".into(),
        ));
    }

    Ok(())
}
