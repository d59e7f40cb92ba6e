pub mod assemble;
pub mod classify;
pub mod dimension;

use crate::config::ExtractionConfig;
use crate::extraction::PageFragments;
use crate::model::ExtractionReport;
use assemble::assemble_page;

/// Parse extracted page fragments into one PageResult per page.
///
/// Pages are independent; a page without fragments yields an empty
/// result rather than an error.
pub fn parse_pages(pages: &[PageFragments], config: &ExtractionConfig) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for page in pages {
        let assembly = assemble_page(page.page_number, &page.fragments, config);
        report.pages.push(assembly.result);
        report.skipped.extend(assembly.skipped);
    }

    report
}
