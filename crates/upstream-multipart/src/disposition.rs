//! Content-Disposition parsing and section classification.
//!
//! The presence of a `filename` parameter is the sole discriminator between
//! file and field sections; a section without a usable disposition header is
//! skipped entirely (drained, no callback, no accumulation).

/// Parsed `Content-Disposition` attributes of one section.
///
/// Format: `form-data; name="field"; filename="file.txt"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    pub name: Option<String>,
    pub filename: Option<String>,
}

/// How one section participates in the decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    File { name: String, filename: String },
    Field { name: String },
    Unrecognized,
}

impl ContentDisposition {
    /// Parse a raw header value. Returns `None` when the disposition type is
    /// not `form-data`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut params = raw.split(';');
        let disposition_type = params.next()?.trim();
        if !disposition_type.eq_ignore_ascii_case("form-data") {
            return None;
        }

        let mut name = None;
        let mut filename = None;
        for param in params {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.eq_ignore_ascii_case("name") {
                name = Some(unquote(value));
            } else if key.eq_ignore_ascii_case("filename") {
                filename = Some(unquote(value));
            }
        }

        Some(Self { name, filename })
    }

    /// Classify the section this disposition belongs to.
    ///
    /// `filename` presence wins even when it is empty; a disposition with
    /// neither `name` nor `filename` carries no usable identity.
    #[must_use]
    pub fn classify(&self) -> SectionKind {
        match (&self.name, &self.filename) {
            (name, Some(filename)) => SectionKind::File {
                name: name.clone().unwrap_or_default(),
                filename: filename.clone(),
            },
            (Some(name), None) => SectionKind::Field { name: name.clone() },
            (None, None) => SectionKind::Unrecognized,
        }
    }
}

/// Classify a section from its raw `Content-Disposition` header, if any.
#[must_use]
pub fn classify(content_disposition: Option<&str>) -> SectionKind {
    match content_disposition.and_then(ContentDisposition::parse) {
        Some(disposition) => disposition.classify(),
        None => SectionKind::Unrecognized,
    }
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_disposition() {
        let disposition = ContentDisposition::parse(r#"form-data; name="id""#).unwrap();
        assert_eq!(disposition.name.as_deref(), Some("id"));
        assert_eq!(disposition.filename, None);
        assert_eq!(
            disposition.classify(),
            SectionKind::Field {
                name: "id".to_string()
            }
        );
    }

    #[test]
    fn test_parse_file_disposition() {
        let disposition =
            ContentDisposition::parse(r#"form-data; name="files"; filename="xs.png""#).unwrap();
        assert_eq!(
            disposition.classify(),
            SectionKind::File {
                name: "files".to_string(),
                filename: "xs.png".to_string()
            }
        );
    }

    #[test]
    fn test_case_insensitive_params() {
        let disposition =
            ContentDisposition::parse(r#"Form-Data; Name="field"; FileName="upload.txt""#)
                .unwrap();
        assert_eq!(disposition.name.as_deref(), Some("field"));
        assert_eq!(disposition.filename.as_deref(), Some("upload.txt"));
    }

    #[test]
    fn test_empty_filename_still_classifies_as_file() {
        let kind = classify(Some(r#"form-data; name="files"; filename="""#));
        assert_eq!(
            kind,
            SectionKind::File {
                name: "files".to_string(),
                filename: String::new()
            }
        );
    }

    #[test]
    fn test_missing_header_is_unrecognized() {
        assert_eq!(classify(None), SectionKind::Unrecognized);
    }

    #[test]
    fn test_non_form_data_is_unrecognized() {
        assert_eq!(
            classify(Some(r#"attachment; filename="report.pdf""#)),
            SectionKind::Unrecognized
        );
    }

    #[test]
    fn test_anonymous_disposition_is_unrecognized() {
        assert_eq!(classify(Some("form-data")), SectionKind::Unrecognized);
    }
}
