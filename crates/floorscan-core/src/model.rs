use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Axis-aligned box in page coordinates (y grows downward).
///
/// Serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// A box is degenerate if any coordinate is non-finite or it has no area.
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Length of the intersection of the two x-ranges (0 when disjoint).
    pub fn horizontal_overlap(&self, other: &BBox) -> f64 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Distance from the bottom of `self` to the top of `below`.
    ///
    /// Negative when the boxes overlap vertically.
    pub fn vertical_gap_to(&self, below: &BBox) -> f64 {
        below.y0 - self.y1
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// One unit of extracted text with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub bbox: BBox,
    /// 0-based page index.
    pub page_index: usize,
}

impl Fragment {
    pub fn new(text: impl Into<String>, bbox: BBox, page_index: usize) -> Self {
        Fragment {
            text: text.into(),
            bbox,
            page_index,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.text.trim().is_empty() || self.bbox.is_degenerate()
    }
}

/// A linear measurement normalized to inches.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionValue(f64);

impl DimensionValue {
    /// Combine a parsed feet / inches / fraction triple.
    pub fn from_parts(feet: f64, inches: f64, fraction: f64) -> Self {
        DimensionValue(feet * 12.0 + inches + fraction)
    }

    pub fn from_inches(inches: f64) -> Self {
        DimensionValue(inches)
    }

    pub fn inches(&self) -> f64 {
        self.0
    }
}

/// Renders as `F' I"`, e.g. `8' 2.5"`.
impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let feet = (self.0 / 12.0).floor();
        let inches = self.0 - feet * 12.0;
        write!(f, "{feet}' {inches}\"")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// Name line and dimension line as they appeared, joined by a newline.
    pub raw_text: String,
    pub length_in: DimensionValue,
    pub width_in: DimensionValue,
    pub bbox: BBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherDimension {
    pub raw: String,
    pub inches: DimensionValue,
    pub bbox: BBox,
}

/// A short uppercase token such as `OTS`.
///
/// The box is kept for annotation only; records serialize the bare text.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub text: String,
    pub bbox: BBox,
}

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    /// 1-based page number.
    pub page: usize,
    pub rooms: Vec<Room>,
    pub other_dimensions: Vec<OtherDimension>,
    #[serde(serialize_with = "serialize_code_texts")]
    pub codes: Vec<Code>,
}

impl PageResult {
    pub fn empty(page: usize) -> Self {
        PageResult {
            page,
            rooms: Vec::new(),
            other_dimensions: Vec::new(),
            codes: Vec::new(),
        }
    }

    pub fn code_texts(&self) -> Vec<&str> {
        self.codes.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn record_count(&self) -> usize {
        self.rooms.len() + self.other_dimensions.len() + self.codes.len()
    }
}

fn serialize_code_texts<S: Serializer>(codes: &[Code], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(codes.len()))?;
    for code in codes {
        seq.serialize_element(&code.text)?;
    }
    seq.end()
}

/// Why a fragment did not end up in any record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Blank text or a degenerate box.
    Malformed,
    /// Matched neither the dimension nor the code grammar.
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFragment {
    pub page: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// Output records for every page plus diagnostics for dropped fragments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    pub pages: Vec<PageResult>,
    pub skipped: Vec<SkippedFragment>,
}
