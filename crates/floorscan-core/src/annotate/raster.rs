use crate::error::FloorscanError;
use std::io::Write;
use std::process::Command;

/// Renders a PDF page to PNG for use as an annotation background.
pub trait PageRasterizer {
    /// Render 1-based `page_number` at 72 dpi, so pixels equal points.
    fn rasterize_page(&self, pdf_bytes: &[u8], page_number: usize) -> Result<Vec<u8>, FloorscanError>;
}

/// Rasterizer backed by `pdftoppm` (from poppler-utils).
#[derive(Debug, Default)]
pub struct PdftoppmRasterizer;

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        PdftoppmRasterizer
    }

    /// Check if pdftoppm is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize_page(&self, pdf_bytes: &[u8], page_number: usize) -> Result<Vec<u8>, FloorscanError> {
        let dir = tempfile::tempdir().map_err(|e| FloorscanError::Render(e.to_string()))?;
        let pdf_path = dir.path().join("page.pdf");
        let prefix = dir.path().join("page");
        std::fs::File::create(&pdf_path)?.write_all(pdf_bytes)?;

        let page = page_number.to_string();
        let output = Command::new("pdftoppm")
            .args(["-png", "-r", "72", "-singlefile", "-f", &page, "-l", &page])
            .arg(&pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|e| FloorscanError::Render(format!("pdftoppm failed: {}", e)))?;

        if !output.status.success() {
            return Err(FloorscanError::Render(format!(
                "pdftoppm exited with {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(std::fs::read(prefix.with_extension("png"))?)
    }
}
