use crate::annotate::{render_annotations, Color, DrawingSurface};
use crate::error::FloorscanError;
use crate::model::{BBox, PageResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// Drawing surface that produces one SVG document for a page.
///
/// Coordinates are page points with the origin top-left, which is what
/// pdftotext reports, so boxes land on the rasterized page unchanged.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    background: Option<String>,
    rects: Vec<(BBox, Color, f64)>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        SvgSurface {
            width,
            height,
            background: None,
            rects: Vec::new(),
        }
    }

    /// Place a PNG rendering of the page underneath the boxes.
    pub fn with_background_png(mut self, png: &[u8]) -> Self {
        self.background = Some(format!("data:image/png;base64,{}", BASE64.encode(png)));
        self
    }

    /// Serialize the surface as an SVG document.
    pub fn finish(&self) -> Result<String, FloorscanError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let width = num(self.width);
        let height = num(self.height);
        let view_box = format!("0 0 {} {}", width, height);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(render_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("svg").with_attributes([
                ("xmlns", "http://www.w3.org/2000/svg"),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("viewBox", view_box.as_str()),
            ])))
            .map_err(render_err)?;

        if let Some(href) = &self.background {
            writer
                .write_event(Event::Empty(BytesStart::new("image").with_attributes([
                    ("x", "0"),
                    ("y", "0"),
                    ("width", width.as_str()),
                    ("height", height.as_str()),
                    ("href", href.as_str()),
                ])))
                .map_err(render_err)?;
        }

        for (bbox, color, stroke) in &self.rects {
            let (x, y) = (num(bbox.x0), num(bbox.y0));
            let (w, h) = (num(bbox.width()), num(bbox.height()));
            let stroke_width = num(*stroke);
            writer
                .write_event(Event::Empty(BytesStart::new("rect").with_attributes([
                    ("x", x.as_str()),
                    ("y", y.as_str()),
                    ("width", w.as_str()),
                    ("height", h.as_str()),
                    ("fill", "none"),
                    ("stroke", color.hex()),
                    ("stroke-width", stroke_width.as_str()),
                ])))
                .map_err(render_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("svg")))
            .map_err(render_err)?;

        String::from_utf8(writer.into_inner()).map_err(render_err)
    }
}

impl DrawingSurface for SvgSurface {
    fn draw_rect(&mut self, bbox: &BBox, color: Color, width: f64) -> Result<(), FloorscanError> {
        self.rects.push((*bbox, color, width));
        Ok(())
    }
}

/// Render a page's annotations as a standalone SVG document.
pub fn render_page_svg(
    page: &PageResult,
    width: f64,
    height: f64,
    background_png: Option<&[u8]>,
) -> Result<String, FloorscanError> {
    let mut surface = SvgSurface::new(width, height);
    if let Some(png) = background_png {
        surface = surface.with_background_png(png);
    }
    render_annotations(page, &mut surface)?;
    surface.finish()
}

fn num(v: f64) -> String {
    format!("{:.2}", v)
}

fn render_err(e: impl std::fmt::Display) -> FloorscanError {
    FloorscanError::Render(e.to_string())
}
