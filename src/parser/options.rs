//! Extraction options and configuration.

/// Options for extracting page content.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// What to do when an image cannot be resolved
    pub error_mode: ErrorMode,

    /// Whether to descend into Form XObjects drawn by the page
    pub include_form_xobjects: bool,

    /// Maximum nesting depth for Form XObjects
    pub max_form_depth: usize,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole call on the first unresolvable image.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip unresolvable images and report them (the default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable descending into Form XObjects.
    pub fn with_form_xobjects(mut self, include: bool) -> Self {
        self.include_form_xobjects = include;
        self
    }

    /// Set maximum Form XObject nesting depth.
    pub fn with_max_form_depth(mut self, depth: usize) -> Self {
        self.max_form_depth = depth;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            include_form_xobjects: true,
            max_form_depth: 8,
        }
    }
}

/// Error handling mode for image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Skip the failed image, record it, and continue
    #[default]
    Lenient,
}
