pub mod pdftotext;

use crate::error::FloorscanError;
use crate::model::Fragment;

/// How finely the source page is cut into fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    /// One fragment per text block; block text is its lines joined by `\n`.
    #[default]
    Block,
    /// One fragment per text line.
    Line,
}

/// Fragments extracted from a single page, in scan order.
#[derive(Debug, Clone)]
pub struct PageFragments {
    /// 1-based page number.
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub fragments: Vec<Fragment>,
}

/// Trait for text-with-geometry extraction backends.
pub trait FragmentSource: Send + Sync {
    /// Extract positioned text fragments from PDF bytes, one entry per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, FloorscanError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
