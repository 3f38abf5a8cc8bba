//! Page-level types.

use serde::{Deserialize, Serialize};

/// Half-open vertical interval `[start, end)` a page projects from document
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpan {
    /// First document y on the page
    pub start: f64,

    /// First document y past the page
    pub end: f64,
}

impl PageSpan {
    /// Create a span from its bounds.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Span of a 0-indexed page of the given height.
    pub fn for_page(page_index: u32, page_height: f64) -> Self {
        let start = page_height * f64::from(page_index);
        Self::new(start, start + page_height)
    }

    /// Check if a document y lies on the page.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.start && y < self.end
    }

    /// Check if `[top, top + height)` intersects the page.
    ///
    /// Zero-height extents behave like a point at `top`.
    pub fn overlaps(&self, top: f64, height: f64) -> bool {
        if height <= 0.0 {
            return self.contains(top);
        }
        top < self.end && top + height > self.start
    }

    /// Check if `[top, top + height)` lies entirely on the page.
    pub fn contains_extent(&self, top: f64, height: f64) -> bool {
        top >= self.start && top + height.max(0.0) <= self.end
    }

    /// Translate a document y into page-local coordinates.
    pub fn to_local(&self, y: f64) -> f64 {
        y - self.start
    }

    /// Page height.
    pub fn height(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open() {
        let span = PageSpan::new(0.0, 100.0);
        assert!(span.contains(0.0));
        assert!(span.contains(99.999));
        assert!(!span.contains(100.0));
        assert!(!span.contains(-0.5));
    }

    #[test]
    fn test_overlap_and_containment() {
        let span = PageSpan::new(100.0, 200.0);

        // straddles the top boundary
        assert!(span.overlaps(80.0, 40.0));
        assert!(!span.contains_extent(80.0, 40.0));

        // fully inside
        assert!(span.overlaps(120.0, 10.0));
        assert!(span.contains_extent(120.0, 10.0));

        // touching edges do not overlap
        assert!(!span.overlaps(60.0, 40.0));
        assert!(!span.overlaps(200.0, 10.0));

        // point extents
        assert!(span.overlaps(100.0, 0.0));
        assert!(!span.overlaps(200.0, 0.0));
    }

    #[test]
    fn test_to_local() {
        let span = PageSpan::for_page(2, 50.0);
        assert_eq!(span.to_local(130.0), 30.0);
        assert_eq!(span.height(), 50.0);
    }
}
