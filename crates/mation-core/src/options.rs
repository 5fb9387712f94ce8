//! Per-call conversion options.

/// Options for a single conversion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// Convert the whole document element instead of `<body>` only.
    pub whole_document: bool,
    /// Collapse whitespace runs in text nodes outside `<pre>` to one space.
    pub normalize_whitespace: bool,
    /// Trim leading and trailing whitespace of the final result.
    pub trim: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            whole_document: false,
            normalize_whitespace: true,
            trim: false,
        }
    }
}

impl ConvertOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert the whole document element.
    #[must_use]
    pub fn with_whole_document(mut self, whole_document: bool) -> Self {
        self.whole_document = whole_document;
        self
    }

    /// Enable or disable whitespace normalization.
    #[must_use]
    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    /// Enable or disable trimming of the final result.
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}
