use floorscan_core::annotate::raster::{PageRasterizer, PdftoppmRasterizer};
use floorscan_core::config::resolve_config;
use floorscan_core::error::FloorscanError;
use floorscan_core::extraction::pdftotext::PdftotextExtractor;
use floorscan_core::extraction::Granularity;
use floorscan_core::AnnotatedPage;
use std::path::{Path, PathBuf};

pub fn run(
    pdf_file: PathBuf,
    out_dir: PathBuf,
    config_file: Option<PathBuf>,
    granularity: Granularity,
    background: bool,
) -> Result<(), FloorscanError> {
    let config = resolve_config(config_file.as_deref())?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::with_granularity(granularity);
    let rasterizer = background_rasterizer(background);

    let (_, rendered) = floorscan_core::annotate_pdf(
        &pdf_bytes,
        &extractor,
        &config,
        rasterizer.as_ref().map(|r| r as &dyn PageRasterizer),
    )?;

    let written = write_pages(&rendered, &pdf_file, &out_dir)?;
    for path in &written {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

/// The rasterizer to use, or None when disabled or pdftoppm is missing.
pub fn background_rasterizer(enabled: bool) -> Option<PdftoppmRasterizer> {
    if !enabled {
        return None;
    }
    if !PdftoppmRasterizer::is_available() {
        log::warn!("pdftoppm not found; annotated pages will have no background");
        return None;
    }
    Some(PdftoppmRasterizer::new())
}

/// File stem used to name annotated pages.
pub fn page_stem(pdf_file: &Path) -> String {
    pdf_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "floorplan".into())
}

/// Write `<stem>_page<N>.svg` for every page into `out_dir`.
pub fn write_pages(
    rendered: &[AnnotatedPage],
    pdf_file: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, FloorscanError> {
    std::fs::create_dir_all(out_dir)?;
    let stem = page_stem(pdf_file);

    let mut written = Vec::with_capacity(rendered.len());
    for page in rendered {
        let path = out_dir.join(format!("{}_page{}.svg", stem, page.page_number));
        std::fs::write(&path, &page.svg)?;
        log::info!("page {}: {} box(es)", page.page_number, page.box_count);
        written.push(path);
    }
    Ok(written)
}
