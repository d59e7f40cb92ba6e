use crate::config::ExtractionConfig;
use crate::model::DimensionValue;
use crate::parsing::dimension::{parse_dimension, parse_two_part};

/// What a single line of fragment text looks like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    /// `LENGTH x WIDTH`
    TwoPartDimension(DimensionValue, DimensionValue),
    Dimension(DimensionValue),
    Code,
    /// Any other non-empty line; a candidate room name.
    Name,
    Blank,
}

impl LineKind {
    pub fn is_name(&self) -> bool {
        matches!(self, LineKind::Name)
    }
}

/// Classify one line of text.
///
/// The order matters: a two-part dimension is never read as a name, and a
/// code token is never read as a name either.
pub fn classify_line(line: &str, config: &ExtractionConfig) -> LineKind {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some((length, width)) = parse_two_part(line) {
        return LineKind::TwoPartDimension(length, width);
    }

    if let Some(value) = parse_dimension(line) {
        return LineKind::Dimension(value);
    }

    if is_code(line, config) {
        return LineKind::Code;
    }

    LineKind::Name
}

/// Classify every line of a fragment's text, keeping the trimmed line.
pub fn classify_fragment<'a>(text: &'a str, config: &ExtractionConfig) -> Vec<(&'a str, LineKind)> {
    text.lines()
        .map(|line| (line.trim(), classify_line(line, config)))
        .collect()
}

/// A short token made only of ASCII uppercase letters (e.g. `OTS`, `WIC`).
pub fn is_code(s: &str, config: &ExtractionConfig) -> bool {
    let s = s.trim();
    let len = s.chars().count();
    len >= config.code_min_len
        && len <= config.code_max_len
        && s.chars().all(|c| c.is_ascii_uppercase())
}
