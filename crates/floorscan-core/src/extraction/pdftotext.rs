use crate::error::FloorscanError;
use crate::extraction::{FragmentSource, Granularity, PageFragments};
use crate::model::{BBox, Fragment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which reports blocks, lines and words with
/// their boxes in points, origin top-left.
pub struct PdftotextExtractor {
    granularity: Granularity,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor {
            granularity: Granularity::default(),
        }
    }

    pub fn with_granularity(granularity: Granularity) -> Self {
        PdftotextExtractor { granularity }
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSource for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, FloorscanError> {
        // Write PDF bytes to a temp file
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| FloorscanError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| FloorscanError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FloorscanError::PdftotextNotFound
                } else {
                    FloorscanError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(FloorscanError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_xml(&xml, self.granularity)?;
        log::debug!(
            "pdftotext: {} page(s), {} fragment(s)",
            pages.len(),
            pages.iter().map(|p| p.fragments.len()).sum::<usize>()
        );
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Words collected for the `<line>` or `<block>` being read.
struct OpenSpan {
    bbox: BBox,
    parts: Vec<String>,
}

/// Read the XHTML produced by `pdftotext -bbox-layout`.
pub fn parse_bbox_xml(
    xml: &str,
    granularity: Granularity,
) -> Result<Vec<PageFragments>, FloorscanError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageFragments> = Vec::new();
    let mut page: Option<PageFragments> = None;
    let mut block: Option<OpenSpan> = None;
    let mut line: Option<OpenSpan> = None;
    let mut in_word = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => page = Some(open_page(&e, pages.len() + 1)?),
                b"block" => {
                    block = Some(OpenSpan {
                        bbox: read_bbox(&e)?,
                        parts: Vec::new(),
                    })
                }
                b"line" => {
                    line = Some(OpenSpan {
                        bbox: read_bbox(&e)?,
                        parts: Vec::new(),
                    })
                }
                b"word" => in_word = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"page" {
                    pages.push(open_page(&e, pages.len() + 1)?);
                }
            }
            Ok(Event::Text(t)) => {
                if in_word {
                    let word = t
                        .unescape()
                        .map_err(|err| FloorscanError::MalformedLayout(err.to_string()))?;
                    let word = word.trim();
                    if let (Some(open), false) = (line.as_mut(), word.is_empty()) {
                        open.parts.push(word.to_string());
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"word" => in_word = false,
                b"line" => {
                    let Some(closed) = line.take() else {
                        continue;
                    };
                    let text = closed.parts.join(" ");
                    if text.is_empty() {
                        continue;
                    }
                    match granularity {
                        Granularity::Line => {
                            if let Some(p) = page.as_mut() {
                                let index = p.page_number - 1;
                                p.fragments.push(Fragment::new(text, closed.bbox, index));
                            }
                        }
                        Granularity::Block => {
                            if let Some(b) = block.as_mut() {
                                b.parts.push(text);
                            }
                        }
                    }
                }
                b"block" => {
                    let Some(closed) = block.take() else {
                        continue;
                    };
                    if granularity == Granularity::Block && !closed.parts.is_empty() {
                        if let Some(p) = page.as_mut() {
                            let index = p.page_number - 1;
                            p.fragments
                                .push(Fragment::new(closed.parts.join("\n"), closed.bbox, index));
                        }
                    }
                }
                b"page" => {
                    if let Some(p) = page.take() {
                        pages.push(p);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FloorscanError::MalformedLayout(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn open_page(tag: &BytesStart<'_>, page_number: usize) -> Result<PageFragments, FloorscanError> {
    Ok(PageFragments {
        page_number,
        width: read_f64(tag, "width")?,
        height: read_f64(tag, "height")?,
        fragments: Vec::new(),
    })
}

fn read_bbox(tag: &BytesStart<'_>) -> Result<BBox, FloorscanError> {
    Ok(BBox {
        x0: read_f64(tag, "xMin")?,
        y0: read_f64(tag, "yMin")?,
        x1: read_f64(tag, "xMax")?,
        y1: read_f64(tag, "yMax")?,
    })
}

fn read_f64(tag: &BytesStart<'_>, name: &str) -> Result<f64, FloorscanError> {
    let tag_name = String::from_utf8_lossy(tag.name().as_ref()).to_string();
    let attr = tag
        .try_get_attribute(name)
        .map_err(|e| FloorscanError::MalformedLayout(e.to_string()))?
        .ok_or_else(|| {
            FloorscanError::MalformedLayout(format!(
                "<{}> is missing attribute '{}'",
                tag_name, name
            ))
        })?;
    let value = attr
        .unescape_value()
        .map_err(|e| FloorscanError::MalformedLayout(e.to_string()))?;
    value.trim().parse().map_err(|_| {
        FloorscanError::MalformedLayout(format!(
            "<{}> attribute '{}' is not a number: {:?}",
            tag_name, name, value
        ))
    })
}
