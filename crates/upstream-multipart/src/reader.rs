//! Forward-only section reader over a raw multipart body stream.
//!
//! [`SectionReader`] is a pull-based cursor: `next_section` yields one
//! [`Section`] at a time, and a section's body is readable only until the
//! reader advances. The single-pass invariant is expressed through the borrow
//! checker — a `Section` mutably borrows its reader, so no two sections can
//! be live simultaneously, and requesting the next section first drains any
//! unread bytes of the current one.
//!
//! The scan buffer stays bounded: payload bytes are released to the caller
//! (or discarded on drain) as soon as they are known not to contain a
//! boundary prefix, so file payload is never accumulated in memory.

use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use upstream_core::{Limits, UploadError, UploadResult};

/// Raw request body: a forward-only stream of byte chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

/// Ordered section headers with case-insensitive lookup.
#[derive(Debug, Default, Clone)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    fn push(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Scanning for the first boundary line.
    Preamble,
    /// Buffer is positioned at the start of a `--boundary` line.
    Delimiter,
    /// Inside the body of the most recently returned section.
    SectionBody,
    /// Closing delimiter consumed; no more sections.
    Epilogue,
}

/// Streaming reader that splits a multipart body into sections.
pub struct SectionReader {
    source: BodyStream,
    source_done: bool,
    buf: BytesMut,
    /// `--boundary`, without the preceding CRLF.
    delimiter: Vec<u8>,
    state: ReaderState,
    at_body_start: bool,
    max_part_header_bytes: usize,
}

impl SectionReader {
    pub fn new(boundary: &str, body: BodyStream, limits: &Limits) -> Self {
        Self {
            source: body,
            source_done: false,
            buf: BytesMut::new(),
            delimiter: format!("--{boundary}").into_bytes(),
            state: ReaderState::Preamble,
            at_body_start: true,
            max_part_header_bytes: limits.get_max_part_header_bytes(),
        }
    }

    /// Advance to the next section, draining any unread bytes of the current
    /// one. Returns `None` once the closing delimiter has been consumed.
    pub async fn next_section(&mut self) -> UploadResult<Option<Section<'_>>> {
        if self.state == ReaderState::SectionBody {
            while self.section_chunk().await?.is_some() {}
        }
        if self.state == ReaderState::Preamble {
            self.seek_first_delimiter().await?;
        }
        if self.state == ReaderState::Epilogue {
            return Ok(None);
        }

        // Delimiter state: the buffer starts with `--boundary`; the two bytes
        // after it decide between the next section and the closing delimiter.
        debug_assert!(self.buf.starts_with(&self.delimiter));
        while self.buf.len() < self.delimiter.len() + 2 {
            if !self.fill().await? {
                return Err(UploadError::MalformedBody(
                    "body truncated at boundary delimiter",
                ));
            }
        }

        let suffix_at = self.delimiter.len();
        let suffix = &self.buf[suffix_at..suffix_at + 2];
        if suffix == b"--" {
            self.state = ReaderState::Epilogue;
            tracing::debug!("closing multipart delimiter reached");
            return Ok(None);
        }
        if suffix != b"\r\n" {
            return Err(UploadError::MalformedBody(
                "expected CRLF after boundary delimiter",
            ));
        }
        let _ = self.buf.split_to(suffix_at + 2);

        let headers = self.read_headers().await?;
        self.state = ReaderState::SectionBody;
        Ok(Some(Section {
            reader: self,
            headers,
        }))
    }

    /// Pull one more transport chunk into the scan buffer.
    /// Returns `false` once the transport is exhausted.
    async fn fill(&mut self) -> UploadResult<bool> {
        if self.source_done {
            return Ok(false);
        }
        match self.source.next().await {
            Some(chunk) => {
                self.buf.extend_from_slice(&chunk?);
                Ok(true)
            }
            None => {
                self.source_done = true;
                Ok(false)
            }
        }
    }

    async fn seek_first_delimiter(&mut self) -> UploadResult<()> {
        loop {
            if self.buf.len() >= self.delimiter.len() + 2 {
                // The first delimiter may appear at the very start of the
                // body with no preceding CRLF.
                if self.at_body_start && self.buf.starts_with(&self.delimiter) {
                    let suffix = &self.buf[self.delimiter.len()..self.delimiter.len() + 2];
                    if suffix == b"\r\n" || suffix == b"--" {
                        self.state = ReaderState::Delimiter;
                        return Ok(());
                    }
                }
                match scan_for_delimiter(&self.buf, &self.delimiter) {
                    BodyScan::Delimiter { payload_len } => {
                        // Discard the preamble and the CRLF before the line.
                        let _ = self.buf.split_to(payload_len + 2);
                        self.state = ReaderState::Delimiter;
                        return Ok(());
                    }
                    BodyScan::NeedMore { safe } => {
                        if safe > 0 {
                            let _ = self.buf.split_to(safe);
                            self.at_body_start = false;
                        }
                    }
                }
            }
            if !self.fill().await? {
                return Err(UploadError::MalformedBody(
                    "no multipart boundary found in body",
                ));
            }
        }
    }

    /// Yield the next payload chunk of the live section, or `None` once its
    /// terminating boundary has been reached.
    pub(crate) async fn section_chunk(&mut self) -> UploadResult<Option<Bytes>> {
        if self.state != ReaderState::SectionBody {
            return Ok(None);
        }
        loop {
            match scan_for_delimiter(&self.buf, &self.delimiter) {
                BodyScan::Delimiter { payload_len } => {
                    let payload = self.buf.split_to(payload_len).freeze();
                    // Consume the CRLF that precedes the delimiter line; the
                    // delimiter itself stays for `next_section`.
                    let _ = self.buf.split_to(2);
                    self.state = ReaderState::Delimiter;
                    return Ok((!payload.is_empty()).then_some(payload));
                }
                BodyScan::NeedMore { safe } => {
                    if safe > 0 {
                        return Ok(Some(self.buf.split_to(safe).freeze()));
                    }
                    if !self.fill().await? {
                        return Err(UploadError::MalformedBody(
                            "section body truncated before boundary",
                        ));
                    }
                }
            }
        }
    }

    /// Read the current section's header block, terminated by a blank line.
    async fn read_headers(&mut self) -> UploadResult<HeaderMap> {
        let terminator_at = loop {
            // A blank line right after the boundary means a headerless section.
            if self.buf.len() >= 2 && &self.buf[..2] == b"\r\n" {
                let _ = self.buf.split_to(2);
                return Ok(HeaderMap::default());
            }
            if let Some(pos) = find_subslice(&self.buf, b"\r\n\r\n") {
                break pos;
            }
            if self.buf.len() > self.max_part_header_bytes {
                return Err(UploadError::HeadersTooLarge {
                    limit: self.max_part_header_bytes,
                });
            }
            if !self.fill().await? {
                return Err(UploadError::MalformedBody(
                    "body truncated inside section headers",
                ));
            }
        };
        if terminator_at + 4 > self.max_part_header_bytes {
            return Err(UploadError::HeadersTooLarge {
                limit: self.max_part_header_bytes,
            });
        }

        let block = self.buf.split_to(terminator_at + 4);
        let text = std::str::from_utf8(&block[..terminator_at])
            .map_err(|_| UploadError::MalformedBody("section headers are not valid UTF-8"))?;

        let mut headers = HeaderMap::default();
        for line in text.split("\r\n") {
            if let Some((name, value)) = line.split_once(':') {
                headers.push(name.trim(), value.trim());
            }
        }
        Ok(headers)
    }
}

/// One boundary-delimited unit of the body.
///
/// Holds the reader mutably: the section's body sub-stream is valid only
/// until the reader advances, and advancing drains whatever the caller left
/// unread.
pub struct Section<'r> {
    reader: &'r mut SectionReader,
    headers: HeaderMap,
}

impl Section<'_> {
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }

    #[must_use]
    pub fn content_disposition(&self) -> Option<&str> {
        self.headers.get("Content-Disposition")
    }

    /// Yield the next chunk of this section's body, or `None` at its end.
    pub async fn chunk(&mut self) -> UploadResult<Option<Bytes>> {
        self.reader.section_chunk().await
    }

    /// Buffer the whole section body, failing once `cap` bytes are exceeded.
    /// Used for field values, which are decoded as a unit; file payload goes
    /// through `chunk` and is never buffered here.
    pub(crate) async fn read_value(&mut self, field: &str, cap: usize) -> UploadResult<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.chunk().await? {
            if out.len() + chunk.len() > cap {
                return Err(UploadError::ValueTooLong {
                    field: field.to_string(),
                    limit: cap,
                });
            }
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }
}

enum BodyScan {
    /// Confirmed `CRLF --boundary` line starting after `payload_len` bytes of
    /// plain payload.
    Delimiter { payload_len: usize },
    /// No confirmed delimiter; the first `safe` bytes cannot be part of one.
    NeedMore { safe: usize },
}

/// Scan for a `\r\n--boundary` line followed by CRLF (another section) or
/// `--` (closing delimiter). A boundary-like run with any other suffix is
/// plain payload.
fn scan_for_delimiter(buf: &[u8], delimiter: &[u8]) -> BodyScan {
    let needle_len = 2 + delimiter.len();
    let mut i = 0;
    while i + needle_len + 2 <= buf.len() {
        if buf[i..i + 2] == *b"\r\n" && buf[i + 2..i + needle_len] == *delimiter {
            let suffix = &buf[i + needle_len..i + needle_len + 2];
            if suffix == b"\r\n" || suffix == b"--" {
                return BodyScan::Delimiter { payload_len: i };
            }
        }
        i += 1;
    }
    // Positions past this point could still begin a delimiter once more
    // bytes arrive; everything before them is payload.
    BodyScan::NeedMore {
        safe: buf.len().saturating_sub(needle_len + 1),
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
