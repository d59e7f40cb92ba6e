use floorscan_core::config::{load_config, resolve_config};
use floorscan_core::error::FloorscanError;
use std::path::Path;

pub fn show(config_file: Option<&Path>) -> Result<(), FloorscanError> {
    let config = resolve_config(config_file)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FloorscanError> {
    let config = load_config(file)?;

    println!("Config '{}' is valid.", file.display());
    println!("  Max vertical gap:       {}", config.max_vertical_gap);
    println!("  Min horizontal overlap: {}", config.min_horizontal_overlap);
    println!(
        "  Code length:            {}..={}",
        config.code_min_len, config.code_max_len
    );

    // Check for potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    if config.max_vertical_gap == 0.0 {
        warnings.push("max_vertical_gap is 0; only touching blocks will pair into rooms".to_string());
    }
    if config.code_max_len > 8 {
        warnings.push(format!(
            "code_max_len {} may classify uppercase room names as codes",
            config.code_max_len
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
