pub mod raster;
pub mod svg;

use crate::error::FloorscanError;
use crate::model::{BBox, PageResult};
use std::fmt;

/// Box colors; one per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Rooms
    Green,
    /// Other dimensions
    Red,
    /// Codes
    Blue,
}

impl Color {
    /// RGB components in `0.0..=1.0`.
    pub fn rgb(&self) -> (f64, f64, f64) {
        match self {
            Color::Green => (0.0, 1.0, 0.0),
            Color::Red => (1.0, 0.0, 0.0),
            Color::Blue => (0.0, 0.0, 1.0),
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Color::Green => "#00ff00",
            Color::Red => "#ff0000",
            Color::Blue => "#0000ff",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Green => write!(f, "green"),
            Color::Red => write!(f, "red"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

/// A rectangle to draw over the source page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub bbox: BBox,
    pub color: Color,
    pub stroke_width: f64,
}

const ROOM_STROKE: f64 = 1.5;
const DEFAULT_STROKE: f64 = 1.0;

/// Map a page's records to drawable boxes: rooms, then other dimensions,
/// then codes. Every code occurrence gets its own box.
pub fn to_annotations(page: &PageResult) -> Vec<Annotation> {
    let rooms = page.rooms.iter().map(|r| Annotation {
        bbox: r.bbox,
        color: Color::Green,
        stroke_width: ROOM_STROKE,
    });
    let others = page.other_dimensions.iter().map(|d| Annotation {
        bbox: d.bbox,
        color: Color::Red,
        stroke_width: DEFAULT_STROKE,
    });
    let codes = page.codes.iter().map(|c| Annotation {
        bbox: c.bbox,
        color: Color::Blue,
        stroke_width: DEFAULT_STROKE,
    });
    rooms.chain(others).chain(codes).collect()
}

/// Anything rectangles can be drawn on.
pub trait DrawingSurface {
    fn draw_rect(&mut self, bbox: &BBox, color: Color, width: f64) -> Result<(), FloorscanError>;
}

/// Draw every annotation of `page` onto `surface`. Returns the box count.
pub fn render_annotations(
    page: &PageResult,
    surface: &mut dyn DrawingSurface,
) -> Result<usize, FloorscanError> {
    let annotations = to_annotations(page);
    for a in &annotations {
        surface.draw_rect(&a.bbox, a.color, a.stroke_width)?;
    }
    Ok(annotations.len())
}
