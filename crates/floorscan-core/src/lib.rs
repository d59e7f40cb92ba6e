pub mod annotate;
pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;

use annotate::raster::PageRasterizer;
use annotate::svg::render_page_svg;
use config::ExtractionConfig;
use error::FloorscanError;
use extraction::{FragmentSource, PageFragments};
use model::ExtractionReport;

/// Main API entry point: extract rooms, dimensions and codes from a PDF.
///
/// Returns one PageResult per page in page order. A document without any
/// text yields an empty report; only extraction failures are errors.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    source: &dyn FragmentSource,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, FloorscanError> {
    let pages = source.extract_pages(pdf_bytes)?;
    log::info!(
        "{}: extracted {} page(s)",
        source.backend_name(),
        pages.len()
    );
    Ok(parsing::parse_pages(&pages, config))
}

/// One annotated page rendering.
#[derive(Debug, Clone)]
pub struct AnnotatedPage {
    pub page_number: usize,
    pub svg: String,
    pub box_count: usize,
}

/// Extract a PDF and render each page's annotations as SVG.
///
/// With a rasterizer, every page is drawn over its own rendering; if
/// rasterizing fails the page falls back to boxes only.
pub fn annotate_pdf(
    pdf_bytes: &[u8],
    source: &dyn FragmentSource,
    config: &ExtractionConfig,
    rasterizer: Option<&dyn PageRasterizer>,
) -> Result<(ExtractionReport, Vec<AnnotatedPage>), FloorscanError> {
    let pages = source.extract_pages(pdf_bytes)?;
    let report = parsing::parse_pages(&pages, config);
    let rendered = render_pages(pdf_bytes, &pages, &report, rasterizer)?;
    Ok((report, rendered))
}

fn render_pages(
    pdf_bytes: &[u8],
    pages: &[PageFragments],
    report: &ExtractionReport,
    rasterizer: Option<&dyn PageRasterizer>,
) -> Result<Vec<AnnotatedPage>, FloorscanError> {
    let mut out = Vec::with_capacity(pages.len());

    for (page, result) in pages.iter().zip(&report.pages) {
        let background = match rasterizer {
            Some(r) => match r.rasterize_page(pdf_bytes, page.page_number) {
                Ok(png) => Some(png),
                Err(e) => {
                    log::warn!(
                        "page {}: rendering without background: {}",
                        page.page_number,
                        e
                    );
                    None
                }
            },
            None => None,
        };

        let svg = render_page_svg(result, page.width, page.height, background.as_deref())?;
        out.push(AnnotatedPage {
            page_number: page.page_number,
            svg,
            box_count: result.record_count(),
        });
    }

    Ok(out)
}
