use floorscan_core::annotate::raster::PageRasterizer;
use floorscan_core::config::resolve_config;
use floorscan_core::error::FloorscanError;
use floorscan_core::extraction::pdftotext::PdftotextExtractor;
use std::path::{Path, PathBuf};

use super::annotate::{background_rasterizer, page_stem, write_pages};
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    json_file: PathBuf,
    out_dir: PathBuf,
    config_file: Option<PathBuf>,
) -> Result<(), FloorscanError> {
    if !pdf_file.exists() {
        return Err(FloorscanError::Extraction(format!(
            "input PDF not found at {}",
            pdf_file.display()
        )));
    }
    let config = resolve_config(config_file.as_deref())?;

    remove_stale_outputs(&pdf_file, &json_file, &out_dir)?;

    eprintln!("Processing {}...", pdf_file.display());
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let rasterizer = background_rasterizer(true);
    let (report, rendered) = floorscan_core::annotate_pdf(
        &pdf_bytes,
        &extractor,
        &config,
        rasterizer.as_ref().map(|r| r as &dyn PageRasterizer),
    )?;

    output::json::write(&report.pages, &json_file)?;
    eprintln!("Extracted data to {}", json_file.display());
    output::table::print_skipped_summary(&report);

    write_pages(&rendered, &pdf_file, &out_dir)?;
    eprintln!(
        "Saved {} annotated page(s) to {}",
        rendered.len(),
        out_dir.display()
    );

    Ok(())
}

/// Delete the JSON file and the `<stem>_page<N>.svg` files a previous run
/// wrote. Nothing else in `out_dir` is touched.
fn remove_stale_outputs(
    pdf_file: &Path,
    json_file: &Path,
    out_dir: &Path,
) -> Result<(), FloorscanError> {
    if same_file(pdf_file, json_file) {
        return Err(FloorscanError::Extraction(format!(
            "JSON output {} would overwrite the input PDF",
            json_file.display()
        )));
    }
    if is_inside(pdf_file, out_dir) {
        return Err(FloorscanError::Extraction(format!(
            "input PDF {} is inside the output directory {}; choose another --out-dir",
            pdf_file.display(),
            out_dir.display()
        )));
    }

    if json_file.is_file() {
        std::fs::remove_file(json_file)?;
        log::debug!("removed stale {}", json_file.display());
    }
    if !out_dir.is_dir() {
        return Ok(());
    }

    let stem = page_stem(pdf_file);
    for entry in std::fs::read_dir(out_dir)? {
        let path = entry?.path();
        let is_stale = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| is_page_svg(n, &stem));
        if is_stale {
            std::fs::remove_file(&path)?;
            log::debug!("removed stale {}", path.display());
        }
    }
    Ok(())
}

/// Matches `<stem>_page<digits>.svg`.
fn is_page_svg(name: &str, stem: &str) -> bool {
    name.strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix("_page"))
        .and_then(|rest| rest.strip_suffix(".svg"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn is_inside(file: &Path, dir: &Path) -> bool {
    match (file.canonicalize(), dir.canonicalize()) {
        (Ok(file), Ok(dir)) => file.starts_with(dir),
        _ => false,
    }
}
