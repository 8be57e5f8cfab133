use folio_core::config::{builtin, load_config};
use folio_core::error::FolioError;
use std::path::Path;

use crate::output;

pub fn list() -> Result<(), FolioError> {
    println!("Available predefined configs:\n");
    for name in builtin::PRESETS {
        let cfg = builtin::load_preset(name)?;
        println!(
            "  {:<8} rows {}pt, column gap {}pt, table gap {}pt",
            name, cfg.row_threshold, cfg.column_gap, cfg.max_row_gap
        );
        if let Some(ref desc) = cfg.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), FolioError> {
    let cfg = builtin::load_preset(preset)?;
    println!("{}", output::json::render(&cfg)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FolioError> {
    let cfg = load_config(file)?;

    println!("Config '{}' is valid.", cfg.name);
    println!(
        "  Rows: {}pt  Lines: {}pt  Columns: gap {}pt, slack {}pt  Tables: gap {}pt",
        cfg.row_threshold, cfg.line_threshold, cfg.column_gap, cfg.column_slack, cfg.max_row_gap
    );
    println!(
        "  Glyph font size: {} to {} (scale {})",
        cfg.min_font_size, cfg.max_font_size, cfg.font_scale
    );

    // Legal but likely to merge unrelated content.
    let mut warnings = Vec::new();
    if cfg.column_slack >= cfg.column_gap {
        warnings.push(format!(
            "column_slack ({}) is not smaller than column_gap ({}); fragments may land in the previous column",
            cfg.column_slack, cfg.column_gap
        ));
    }
    if cfg.max_row_gap < cfg.row_threshold {
        warnings.push(format!(
            "max_row_gap ({}) is below row_threshold ({}); every table row will be split",
            cfg.max_row_gap, cfg.row_threshold
        ));
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
