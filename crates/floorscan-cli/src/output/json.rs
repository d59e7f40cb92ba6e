use floorscan_core::error::FloorscanError;
use floorscan_core::model::PageResult;
use std::path::Path;

pub fn print(pages: &[PageResult]) -> Result<(), FloorscanError> {
    let json = serde_json::to_string_pretty(pages)?;
    println!("{json}");
    Ok(())
}

pub fn write(pages: &[PageResult], path: &Path) -> Result<(), FloorscanError> {
    let json = serde_json::to_string_pretty(pages)?;
    std::fs::write(path, json)?;
    Ok(())
}
