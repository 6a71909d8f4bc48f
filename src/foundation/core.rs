use crate::foundation::error::{BandtreeError, BandtreeResult};

pub use kurbo::{Point, Rect};

/// Year used when neither a membership nor its band carries any date.
pub const UNKNOWN_YEAR: f64 = 1970.0;

/// Half-open span of (possibly fractional) years `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct YearSpan {
    pub start: f64,
    pub end: f64, // exclusive
}

impl YearSpan {
    pub fn new(start: f64, end: f64) -> BandtreeResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(BandtreeError::validation("YearSpan bounds must be finite"));
        }
        if start > end {
            return Err(BandtreeError::validation("YearSpan start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_years(self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    pub fn midpoint(self) -> f64 {
        self.start + (self.end - self.start) / 2.0
    }

    /// Closed containment; used by the midpoint activity test.
    pub fn contains(self, year: f64) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn intersects(self, other: YearSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Whole-year rendering of a fractional year.
pub fn display_year(year: f64) -> i64 {
    year.trunc() as i64
}

/// Penetration (in pixels) below which two boxes still count as touching.
pub const OVERLAP_EPSILON: f64 = 1e-6;

/// Axis-aligned overlap test after growing both rectangles by `margin` on every side.
///
/// Touching edges do not count as overlap, nor does penetration within [`OVERLAP_EPSILON`]
/// left over from float rounding.
pub fn overlaps_with_margin(a: Rect, b: Rect, margin: f64) -> bool {
    let a = a.inflate(margin, margin);
    let b = b.inflate(margin, margin);
    let depth_x = a.x1.min(b.x1) - a.x0.max(b.x0);
    let depth_y = a.y1.min(b.y1) - a.y0.max(b.y0);
    depth_x > OVERLAP_EPSILON && depth_y > OVERLAP_EPSILON
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
