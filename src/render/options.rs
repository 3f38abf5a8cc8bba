//! Rendering options and configuration.

use std::ops::RangeInclusive;

use kurbo::Size;

/// Options for rendering pages into draw lists.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render for printing or export (not supported)
    pub printing: bool,

    /// Size of the target surface; page coordinates are scaled to fit
    pub target_size: Option<Size>,

    /// Content layers to emit
    pub layers: Layers,

    /// Page selection
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request printing output.
    pub fn with_printing(mut self, printing: bool) -> Self {
        self.printing = printing;
        self
    }

    /// Set the target surface size.
    pub fn with_target_size(mut self, width: f64, height: f64) -> Self {
        self.target_size = Some(Size::new(width, height));
        self
    }

    /// Set the layers to emit.
    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }

    /// Emit ink strokes only.
    pub fn ink_only(mut self) -> Self {
        self.layers = Layers {
            ink: true,
            images: false,
            text: false,
        };
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set specific pages.
    pub fn with_page_list(mut self, pages: Vec<u32>) -> Self {
        self.page_selection = PageSelection::Pages(pages);
        self
    }
}

/// Content layers of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layers {
    /// Handwriting strokes
    pub ink: bool,
    /// Raster images
    pub images: bool,
    /// Text blocks and the global text store
    pub text: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            ink: true,
            images: true,
            text: true,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                pages.extend(start..=end);
            } else {
                pages.push(part.parse().map_err(|_| "Invalid page number")?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_selection_parse() {
        assert!(matches!(PageSelection::parse("all"), Ok(PageSelection::All)));
        assert!(matches!(PageSelection::parse(""), Ok(PageSelection::All)));

        if let Ok(PageSelection::Range(range)) = PageSelection::parse("1-10") {
            assert_eq!(*range.start(), 1);
            assert_eq!(*range.end(), 10);
        } else {
            panic!("Expected Range");
        }

        if let Ok(PageSelection::Pages(pages)) = PageSelection::parse("5,1,3,3-4") {
            assert_eq!(pages, vec![1, 3, 4, 5]);
        } else {
            panic!("Expected Pages");
        }

        assert!(PageSelection::parse("1,x").is_err());
    }

    #[test]
    fn test_page_selection_includes() {
        assert!(PageSelection::All.includes(100));
        assert!(PageSelection::Range(2..=3).includes(2));
        assert!(!PageSelection::Pages(vec![1, 3]).includes(2));
    }

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_target_size(1200.0, 1696.8)
            .ink_only()
            .with_page_range(1..=2);
        assert_eq!(options.target_size, Some(Size::new(1200.0, 1696.8)));
        assert!(options.layers.ink);
        assert!(!options.layers.images);
        assert!(!options.printing);
        assert!(options.page_selection.includes(2));
    }
}
