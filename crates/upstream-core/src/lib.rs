//! Upstream Core Library
//!
//! This crate provides the shared types of the upstream multipart decoder:
//! the error taxonomy, parse limit configuration, the ordered form field
//! accumulator, and the model binder that maps accumulated fields onto a
//! caller-defined record with validation.
//!
//! The wire-level decoding lives in `upstream-multipart`.

pub mod bind;
pub mod error;
pub mod form;
pub mod limits;

// Re-export commonly used types
pub use bind::{bind, parse_field, BindError, BindModel, BoundModel};
pub use error::{ErrorKind, UploadError, UploadResult};
pub use form::FormValues;
pub use limits::Limits;
