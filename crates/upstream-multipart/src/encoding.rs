//! Text encoding selection for field section values.

use encoding_rs::{Encoding, UTF_8};

/// Choose the encoding for a field section's value from its content-type.
///
/// A missing or unparsable content-type, an unknown charset label, and a
/// UTF-7 label all resolve to UTF-8. UTF-7 is deliberately never honored:
/// its decoding is ambiguous and has been abused for header and content
/// injection. Any other declared charset is honored as-is.
pub fn resolve_encoding(content_type: Option<&str>) -> &'static Encoding {
    let Some(content_type) = content_type else {
        return UTF_8;
    };
    let Some(label) = charset_label(content_type) else {
        return UTF_8;
    };
    if label.eq_ignore_ascii_case("utf-7") {
        return UTF_8;
    }
    Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8)
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn test_missing_content_type_defaults_to_utf8() {
        assert_eq!(resolve_encoding(None), UTF_8);
        assert_eq!(resolve_encoding(Some("text/plain")), UTF_8);
    }

    #[test]
    fn test_declared_charset_honored() {
        assert_eq!(
            resolve_encoding(Some("text/plain; charset=iso-8859-1")),
            WINDOWS_1252
        );
        assert_eq!(
            resolve_encoding(Some(r#"text/plain; charset="ISO-8859-1""#)),
            WINDOWS_1252
        );
    }

    #[test]
    fn test_utf7_never_honored() {
        assert_eq!(resolve_encoding(Some("text/plain; charset=utf-7")), UTF_8);
        assert_eq!(resolve_encoding(Some("text/plain; charset=UTF-7")), UTF_8);
    }

    #[test]
    fn test_unknown_label_defaults_to_utf8() {
        assert_eq!(
            resolve_encoding(Some("text/plain; charset=not-a-charset")),
            UTF_8
        );
    }
}
