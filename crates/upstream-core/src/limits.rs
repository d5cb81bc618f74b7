//! Parse limit configuration.
//!
//! Ceilings are abuse guards, not retry points: exceeding one is immediately
//! terminal for the request being decoded. Defaults follow the form options
//! of a typical HTTP host framework.

/// Default maximum multipart boundary length. RFC 2046 recommends 70
/// characters; hosts commonly allow 128.
pub const DEFAULT_MAX_BOUNDARY_LENGTH: usize = 128;

/// Default maximum size of one section's header block (16 KiB).
pub const DEFAULT_MAX_PART_HEADER_BYTES: usize = 16 * 1024;

/// Default maximum length of one form field value (4 MiB).
pub const DEFAULT_MAX_FIELD_VALUE_BYTES: usize = 4 * 1024 * 1024;

/// Default maximum number of accumulated form values across all keys.
pub const DEFAULT_MAX_VALUE_COUNT: usize = 1024;

/// Configuration for one streaming decode pass.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum boundary token length accepted from the content-type header.
    max_boundary_length: usize,
    /// Maximum size of a single section's header block in bytes.
    max_part_header_bytes: usize,
    /// Maximum decoded length of a single form field value in bytes.
    max_field_value_bytes: usize,
    /// Maximum total form value count across all keys.
    max_value_count: usize,
    /// When set, truncated boundary framing mid-stream fails the whole decode
    /// instead of salvaging the sections already parsed.
    strict_framing: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_boundary_length: DEFAULT_MAX_BOUNDARY_LENGTH,
            max_part_header_bytes: DEFAULT_MAX_PART_HEADER_BYTES,
            max_field_value_bytes: DEFAULT_MAX_FIELD_VALUE_BYTES,
            max_value_count: DEFAULT_MAX_VALUE_COUNT,
            strict_framing: false,
        }
    }
}

impl Limits {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum boundary token length.
    #[must_use]
    pub fn max_boundary_length(mut self, len: usize) -> Self {
        self.max_boundary_length = len;
        self
    }

    /// Set the maximum section header block size.
    #[must_use]
    pub fn max_part_header_bytes(mut self, bytes: usize) -> Self {
        self.max_part_header_bytes = bytes;
        self
    }

    /// Set the maximum form field value length.
    #[must_use]
    pub fn max_field_value_bytes(mut self, bytes: usize) -> Self {
        self.max_field_value_bytes = bytes;
        self
    }

    /// Set the maximum total form value count.
    #[must_use]
    pub fn max_value_count(mut self, count: usize) -> Self {
        self.max_value_count = count;
        self
    }

    /// Fail the whole decode on truncated boundary framing instead of keeping
    /// the sections parsed so far.
    #[must_use]
    pub fn strict_framing(mut self, strict: bool) -> Self {
        self.strict_framing = strict;
        self
    }

    /// Get the maximum boundary token length.
    #[must_use]
    pub fn get_max_boundary_length(&self) -> usize {
        self.max_boundary_length
    }

    /// Get the maximum section header block size.
    #[must_use]
    pub fn get_max_part_header_bytes(&self) -> usize {
        self.max_part_header_bytes
    }

    /// Get the maximum form field value length.
    #[must_use]
    pub fn get_max_field_value_bytes(&self) -> usize {
        self.max_field_value_bytes
    }

    /// Get the maximum total form value count.
    #[must_use]
    pub fn get_max_value_count(&self) -> usize {
        self.max_value_count
    }

    /// Whether truncated framing is a hard failure.
    #[must_use]
    pub fn get_strict_framing(&self) -> bool {
        self.strict_framing
    }
}
