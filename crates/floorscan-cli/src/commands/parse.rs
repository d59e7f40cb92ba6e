use floorscan_core::config::resolve_config;
use floorscan_core::error::FloorscanError;
use floorscan_core::extraction::pdftotext::PdftotextExtractor;
use floorscan_core::extraction::Granularity;
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    granularity: Granularity,
) -> Result<(), FloorscanError> {
    let config = resolve_config(config_file.as_deref())?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::with_granularity(granularity);
    let report = floorscan_core::parse_pdf(&pdf_bytes, &extractor, &config)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&report.pages, &path)?;
            eprintln!(
                "Parsed {} page(s), written to {}",
                report.pages.len(),
                path.display()
            );
            output::table::print_skipped_summary(&report);
        }
        None => match output_format {
            "json" => output::json::print(&report.pages)?,
            _ => println!("{}", output::table::format_report(&report)),
        },
    }

    Ok(())
}
