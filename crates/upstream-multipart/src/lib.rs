//! Streaming `multipart/form-data` decoder.
//!
//! Splits a forward-only request body stream into ordered sections at
//! boundary markers, hands each file section to a caller-supplied handler as
//! a single-pass byte stream (file payload is never buffered), accumulates
//! field sections into an ordered [`FormValues`](upstream_core::FormValues)
//! store, and optionally binds the finished store onto a typed model with
//! validation.
//!
//! Entry points: [`stream_sections`] (per-file callback + accumulated
//! fields) and [`stream_model`] (same, plus model binding). The lower-level
//! [`SectionReader`] is public for callers that want to pull sections
//! themselves.

pub mod boundary;
pub mod disposition;
pub mod encoding;
pub mod file;
pub mod reader;
pub mod stream;

// Re-export commonly used types
pub use boundary::parse_boundary;
pub use disposition::{classify, ContentDisposition, SectionKind};
pub use encoding::resolve_encoding;
pub use file::FilePart;
pub use reader::{BodyStream, HeaderMap, Section, SectionReader};
pub use stream::{stream_model, stream_sections, DrainFiles, FileHandler};
