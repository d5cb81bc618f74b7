//! Single-pass orchestration over a multipart body: files are handed to a
//! caller callback as they appear, fields are decoded and accumulated, and
//! an optional model is bound from the accumulated fields at the end.

use async_trait::async_trait;
use upstream_core::{bind, BindModel, BoundModel, FormValues, Limits, UploadError, UploadResult};
use validator::Validate;

use crate::boundary::parse_boundary;
use crate::disposition::{classify, SectionKind};
use crate::encoding::resolve_encoding;
use crate::file::FilePart;
use crate::reader::{BodyStream, SectionReader};

/// Receives each uploaded file, in body order, while its bytes are live on
/// the transport. The file must be read within the callback; once it
/// returns, the reader moves on and the payload is gone.
#[async_trait]
pub trait FileHandler: Send {
    async fn on_file(&mut self, file: &mut FilePart<'_, '_>) -> anyhow::Result<()>;
}

/// Handler that discards every file payload. Useful when only the form
/// fields matter.
#[derive(Debug, Default)]
pub struct DrainFiles;

#[async_trait]
impl FileHandler for DrainFiles {
    async fn on_file(&mut self, file: &mut FilePart<'_, '_>) -> anyhow::Result<()> {
        file.drain().await?;
        Ok(())
    }
}

/// Walk the body once: invoke `handler` for each file section and collect
/// every field section into a [`FormValues`].
///
/// Framing errors that surface between sections (truncated preamble,
/// headers, delimiters) end the walk with whatever was collected so far;
/// set [`Limits::strict_framing`] to turn them into hard errors. Errors
/// raised while a section's payload is being consumed always propagate.
#[tracing::instrument(skip(body, limits, handler))]
pub async fn stream_sections<H>(
    body: BodyStream,
    content_type: &str,
    limits: &Limits,
    handler: &mut H,
) -> UploadResult<FormValues>
where
    H: FileHandler,
{
    let boundary = parse_boundary(content_type, limits)?;
    let mut reader = SectionReader::new(&boundary, body, limits);
    let mut form = FormValues::new(limits);

    loop {
        let mut section = match reader.next_section().await {
            Ok(Some(section)) => section,
            Ok(None) => break,
            Err(err @ UploadError::MalformedBody(_)) if !limits.get_strict_framing() => {
                tracing::warn!(error = %err, "malformed body; keeping sections read so far");
                break;
            }
            Err(err) => return Err(err),
        };

        match classify(section.content_disposition()) {
            SectionKind::File { name, filename } => {
                tracing::debug!(field = %name, filename = %filename, "file section");
                let mut file = FilePart::new(&mut section, name, filename);
                handler
                    .on_file(&mut file)
                    .await
                    .map_err(UploadError::Handler)?;
                file.drain().await?;
            }
            SectionKind::Field { name } => {
                let raw = section
                    .read_value(&name, limits.get_max_field_value_bytes())
                    .await?;
                let encoding = resolve_encoding(section.content_type());
                let (value, _, _) = encoding.decode(&raw);
                form.append(&name, value.into_owned())?;
            }
            SectionKind::Unrecognized => {
                tracing::debug!("section without a form-data name; skipping");
            }
        }
    }

    Ok(form)
}

/// [`stream_sections`] followed by binding the collected fields onto a
/// model. Binding and validation failures are recorded on the returned
/// [`BoundModel`] rather than raised.
pub async fn stream_model<T, H>(
    body: BodyStream,
    content_type: &str,
    limits: &Limits,
    handler: &mut H,
) -> UploadResult<BoundModel<T>>
where
    T: BindModel + Validate,
    H: FileHandler,
{
    let form = stream_sections(body, content_type, limits, handler).await?;
    Ok(bind(&form))
}
