//! Parsing options and configuration.

/// Page width used when the session declares none (or a reflowable layout).
pub const DEFAULT_PAGE_WIDTH: f64 = 500.0;

/// Aspect ratio used for unknown paper identifiers (DIN A-series).
pub const DEFAULT_PAGE_RATIO: f64 = 1.414;

/// Options for opening note documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode while deriving page geometry
    pub error_mode: ErrorMode,

    /// Fallback page width
    pub default_page_width: f64,

    /// Fallback page aspect ratio
    pub default_page_ratio: f64,

    /// Page-membership test for media objects
    pub overlap: OverlapPolicy,

    /// Whether multi-page rendering runs in parallel
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (fall back to defaults instead of failing).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the fallback page width.
    pub fn with_default_page_width(mut self, width: f64) -> Self {
        self.default_page_width = width;
        self
    }

    /// Set the fallback page ratio.
    pub fn with_default_page_ratio(mut self, ratio: f64) -> Self {
        self.default_page_ratio = ratio;
        self
    }

    /// Set the media overlap policy.
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            default_page_width: DEFAULT_PAGE_WIDTH,
            default_page_ratio: DEFAULT_PAGE_RATIO,
            overlap: OverlapPolicy::Intersect,
            parallel: true,
        }
    }
}

/// Error handling mode during open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Resolve errors in page geometry abort open
    #[default]
    Strict,
    /// Fall back to default geometry and continue
    Lenient,
}

/// How media objects are assigned to pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Include objects whose vertical extent intersects the page
    #[default]
    Intersect,
    /// Include only objects that fit entirely on the page
    Contain,
}
