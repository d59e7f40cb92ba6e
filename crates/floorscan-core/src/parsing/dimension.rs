use crate::model::DimensionValue;

/// Parse a single dimension string into inches.
///
/// Handles formats like:
/// - `8' 2 1/2"` / `8'-2-1/2"` -> 98.5
/// - `10' 8"` / `10'-8"` -> 128
/// - `6'6"` -> 78
/// - `10'` / `7.5'` -> 120 / 90
/// - `6 1/2"` -> 6.5
/// - `6"` -> 6
///
/// The closing inch mark may be omitted after a feet component (`8' 2`),
/// but an inches-only value needs its mark, so bare numbers return `None`.
pub fn parse_dimension(s: &str) -> Option<DimensionValue> {
    let cleaned = clean(s);
    if cleaned.is_empty() {
        return None;
    }

    GRAMMAR.iter().find_map(|(name, matcher)| {
        let parts = matcher(&cleaned)?;
        log::trace!("dimension {:?} matched {}", s, name);
        Some(parts.value()).filter(|v| v.inches().is_finite())
    })
}

/// Parse a `LENGTH x WIDTH` string into its two dimensions.
///
/// Splits on the first `x`/`X`; both sides must parse on their own.
pub fn parse_two_part(s: &str) -> Option<(DimensionValue, DimensionValue)> {
    let (left, right) = split_two_part(s)?;
    Some((parse_dimension(left)?, parse_dimension(right)?))
}

/// True if `s` has the shape of a two-part dimension (an `x` separator with
/// a unit mark on both sides), regardless of whether the sides parse.
pub fn looks_like_two_part(s: &str) -> bool {
    match split_two_part(s) {
        Some((left, right)) => has_unit_mark(left) && has_unit_mark(right),
        None => false,
    }
}

fn split_two_part(s: &str) -> Option<(&str, &str)> {
    let idx = s.find(['x', 'X'])?;
    let left = s[..idx].trim();
    let right = s[idx + 1..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, right))
}

fn has_unit_mark(s: &str) -> bool {
    s.chars().any(|c| is_feet_mark(c) || is_inch_mark(c))
}

/// Trim whitespace and stray hyphens, and fold typographic primes to ASCII.
fn clean(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .chars()
        .map(|c| {
            if is_feet_mark(c) {
                '\''
            } else if is_inch_mark(c) {
                '"'
            } else {
                c
            }
        })
        .collect()
}

fn is_feet_mark(c: char) -> bool {
    matches!(c, '\'' | '\u{2032}' | '\u{2019}' | '\u{2018}')
}

fn is_inch_mark(c: char) -> bool {
    matches!(c, '"' | '\u{2033}' | '\u{201D}' | '\u{201C}')
}

/// Structured result of one matcher before summation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FeetInches {
    feet: f64,
    inches: f64,
    fraction: f64,
}

impl FeetInches {
    fn value(self) -> DimensionValue {
        DimensionValue::from_parts(self.feet, self.inches, self.fraction)
    }
}

type Matcher = fn(&str) -> Option<FeetInches>;

/// Tried in order; later entries are more permissive.
const GRAMMAR: &[(&str, Matcher)] = &[
    ("feet-inches-fraction", feet_inches_fraction),
    ("feet-inches-spaced", feet_inches_spaced),
    ("feet-inches-tight", feet_inches_tight),
    ("feet", feet_only),
    ("inches-fraction", inches_fraction),
    ("inches", inches_only),
];

fn feet_inches_fraction(s: &str) -> Option<FeetInches> {
    let mut sc = Scanner::new(s);
    let feet = sc.number()?;
    sc.skip_ws();
    sc.feet_mark()?;
    sc.separator();
    let inches = sc.number()?;
    if !sc.gap() {
        return None;
    }
    let fraction = sc.fraction()?;
    sc.skip_ws();
    sc.inch_mark();
    sc.end()?;
    Some(FeetInches {
        feet,
        inches,
        fraction,
    })
}

fn feet_inches_spaced(s: &str) -> Option<FeetInches> {
    let mut sc = Scanner::new(s);
    let feet = sc.number()?;
    sc.skip_ws();
    sc.feet_mark()?;
    if !sc.gap() {
        return None;
    }
    let inches = sc.number()?;
    sc.skip_ws();
    sc.inch_mark();
    sc.end()?;
    Some(FeetInches {
        feet,
        inches,
        fraction: 0.0,
    })
}

fn feet_inches_tight(s: &str) -> Option<FeetInches> {
    let mut sc = Scanner::new(s);
    let feet = sc.number()?;
    sc.skip_ws();
    sc.feet_mark()?;
    let inches = sc.number()?;
    sc.skip_ws();
    sc.inch_mark();
    sc.end()?;
    Some(FeetInches {
        feet,
        inches,
        fraction: 0.0,
    })
}

fn feet_only(s: &str) -> Option<FeetInches> {
    let mut sc = Scanner::new(s);
    let feet = sc.number()?;
    sc.skip_ws();
    sc.feet_mark()?;
    sc.end()?;
    Some(FeetInches {
        feet,
        inches: 0.0,
        fraction: 0.0,
    })
}

fn inches_fraction(s: &str) -> Option<FeetInches> {
    let mut sc = Scanner::new(s);
    let inches = sc.number()?;
    if !sc.gap() {
        return None;
    }
    let fraction = sc.fraction()?;
    sc.skip_ws();
    if !sc.inch_mark() {
        return None;
    }
    sc.end()?;
    Some(FeetInches {
        feet: 0.0,
        inches,
        fraction,
    })
}

fn inches_only(s: &str) -> Option<FeetInches> {
    let mut sc = Scanner::new(s);
    let inches = sc.number()?;
    sc.skip_ws();
    if !sc.inch_mark() {
        return None;
    }
    sc.end()?;
    Some(FeetInches {
        feet: 0.0,
        inches,
        fraction: 0.0,
    })
}

/// Byte cursor over an already-cleaned dimension string.
struct Scanner<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Scanner { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos > start
    }

    /// Whitespace and/or one hyphen between two components.
    fn gap(&mut self) -> bool {
        let ws = self.skip_ws();
        let hyphen = self.eat('-');
        self.skip_ws();
        ws || hyphen
    }

    /// Optional gap, used right after a feet mark.
    fn separator(&mut self) {
        self.gap();
    }

    fn digits(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// Integer or decimal number (`7`, `7.5`).
    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        self.digits()?;
        let checkpoint = self.pos;
        if self.eat('.') && self.digits().is_none() {
            self.pos = checkpoint;
        }
        self.s[start..self.pos]
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// `N/D` with a non-zero denominator, resolved to a decimal.
    fn fraction(&mut self) -> Option<f64> {
        let numerator: u32 = self.digits()?.parse().ok()?;
        if !self.eat('/') {
            return None;
        }
        let denominator: u32 = self.digits()?.parse().ok()?;
        if denominator == 0 {
            return None;
        }
        Some(f64::from(numerator) / f64::from(denominator))
    }

    fn feet_mark(&mut self) -> Option<()> {
        self.eat('\'').then_some(())
    }

    fn inch_mark(&mut self) -> bool {
        self.eat('"')
    }

    fn end(&self) -> Option<()> {
        self.rest().is_empty().then_some(())
    }
}
