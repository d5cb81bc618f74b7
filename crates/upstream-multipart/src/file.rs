//! Lazy handle over a file section's body.

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use upstream_core::UploadResult;

use crate::reader::{HeaderMap, Section};

/// A single uploaded file, readable exactly once and only while it is the
/// reader's current section.
///
/// No payload is buffered: bytes surface through [`chunk`](Self::chunk) (or
/// [`copy_to`](Self::copy_to)) straight off the transport, and the total size
/// is only known after the body has been fully read.
pub struct FilePart<'r, 's> {
    section: &'s mut Section<'r>,
    name: String,
    filename: String,
    consumed: u64,
    finished: bool,
}

impl<'r, 's> FilePart<'r, 's> {
    pub(crate) fn new(section: &'s mut Section<'r>, name: String, filename: String) -> Self {
        Self {
            section,
            name,
            filename,
            consumed: 0,
            finished: false,
        }
    }

    /// The `name` parameter of the section's disposition.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client-supplied filename. May be empty.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.section.content_type()
    }

    #[must_use]
    pub fn content_disposition(&self) -> Option<&str> {
        self.section.content_disposition()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.section.headers()
    }

    /// Total size in bytes, known only once the body has been read to its
    /// end. `None` while unread or partially read.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.finished.then_some(self.consumed)
    }

    /// Bytes handed out so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.consumed
    }

    #[must_use]
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// Yield the next chunk of payload, or `None` at end of file.
    pub async fn chunk(&mut self) -> UploadResult<Option<Bytes>> {
        match self.section.chunk().await? {
            Some(chunk) => {
                self.consumed += chunk.len() as u64;
                Ok(Some(chunk))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    /// Stream the remaining payload into `dest`, returning the number of
    /// bytes written.
    pub async fn copy_to<W>(&mut self, dest: &mut W) -> UploadResult<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0u64;
        while let Some(chunk) = self.chunk().await? {
            dest.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }

    /// Read the remaining payload to its end, discarding it.
    pub async fn drain(&mut self) -> UploadResult<()> {
        while self.chunk().await?.is_some() {}
        Ok(())
    }
}
