use crate::config::schema::LayoutConfig;
use crate::config::validate_config;
use crate::error::FolioError;

const DEFAULT_JSON: &str = include_str!("../../../../config/default.json");
const DENSE_JSON: &str = include_str!("../../../../config/dense.json");

/// Available predefined configurations.
pub const PRESETS: &[&str] = &["default", "dense"];

/// Load a predefined configuration by name.
pub fn load_preset(name: &str) -> Result<LayoutConfig, FolioError> {
    let json = match name {
        "default" => DEFAULT_JSON,
        "dense" => DENSE_JSON,
        _ => {
            return Err(FolioError::ConfigInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    parse_preset(name, json)
}

fn parse_preset(name: &str, json: &str) -> Result<LayoutConfig, FolioError> {
    let config: LayoutConfig = serde_json::from_str(json)?;
    validate_config(&config).map_err(|e| match e {
        FolioError::ConfigInvalid(msg) => FolioError::ConfigInvalid(format!("preset '{name}': {msg}")),
        other => other,
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_matches_default_impl() {
        let cfg = load_preset("default").unwrap();
        let fallback = LayoutConfig::default();
        assert_eq!(cfg.row_threshold, fallback.row_threshold);
        assert_eq!(cfg.column_gap, fallback.column_gap);
        assert_eq!(cfg.column_slack, fallback.column_slack);
        assert_eq!(cfg.line_threshold, fallback.line_threshold);
        assert_eq!(cfg.max_font_size, fallback.max_font_size);
    }

    #[test]
    fn test_all_presets_validate() {
        for name in PRESETS {
            let cfg = load_preset(name).unwrap();
            assert!(validate_config(&cfg).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_preset_rejected_at_load() {
        let err = parse_preset("broken", r#"{ "name": "broken", "row_threshold": 0.0 }"#).unwrap_err();
        assert!(matches!(err, FolioError::ConfigInvalid(ref msg) if msg.contains("broken")));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("sparse").is_err());
    }
}
