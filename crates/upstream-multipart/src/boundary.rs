//! Boundary extraction from the request content-type header.

use upstream_core::{Limits, UploadError, UploadResult};

/// Extract the multipart boundary token from a `Content-Type` header value.
///
/// Accepts any `multipart/*` media type. The returned token has surrounding
/// quotes stripped. Fails before any body byte is read when the media type is
/// not multipart, the boundary parameter is missing or empty, or the boundary
/// exceeds [`Limits::get_max_boundary_length`].
///
/// Content-Type format: `multipart/form-data; boundary=----WebKitFormBoundary...`
pub fn parse_boundary(content_type: &str, limits: &Limits) -> UploadResult<String> {
    let content_type = content_type.trim();
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if !media_type
        .get(.."multipart/".len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"))
    {
        return Err(UploadError::NotMultipart(media_type.to_string()));
    }

    for param in content_type.split(';').skip(1) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("boundary") {
            let boundary = value.trim().trim_matches('"');
            if boundary.is_empty() {
                return Err(UploadError::MissingBoundary);
            }
            if boundary.len() > limits.get_max_boundary_length() {
                return Err(UploadError::BoundaryTooLong {
                    limit: limits.get_max_boundary_length(),
                });
            }
            return Ok(boundary.to_string());
        }
    }

    Err(UploadError::MissingBoundary)
}
