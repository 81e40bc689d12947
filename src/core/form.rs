use actix_multipart::{Field, Multipart, MultipartError};
use futures::TryStreamExt;
use thiserror::Error;

use crate::core::attachments::AttachmentKind;
use crate::models::{Attachment, ProposalForm};

/// Content type recorded for file parts that do not declare one
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Errors raised while reading a proposal form
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid document file type. Only PDF and Word documents are allowed.")]
    InvalidDocumentType,

    #[error("Invalid image file type. Only images are allowed.")]
    InvalidImageType,

    #[error("Unexpected field")]
    UnexpectedField(String),

    #[error("File too large")]
    FileTooLarge(AttachmentKind),

    #[error("Field value too long")]
    FieldTooLong(String),

    #[error("Field {0} is not valid UTF-8")]
    InvalidEncoding(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err.to_string())
    }
}

impl UploadError {
    fn invalid_type(kind: AttachmentKind) -> Self {
        match kind {
            AttachmentKind::Document => UploadError::InvalidDocumentType,
            AttachmentKind::Image => UploadError::InvalidImageType,
        }
    }
}

/// Read a multipart body into a [`ProposalForm`]
///
/// A part with a `filename` is a file part. File parts must be named
/// `documentFile` or `imageFile`, appear at most once each, carry an accepted
/// content type and fit in `max_part_bytes`; anything else rejects the whole
/// form. A file part with an empty filename is an unchosen file input and is
/// skipped. Parts without a filename fill the five text fields; text parts
/// under other names are ignored. Attachment bytes are buffered in memory.
pub async fn read_proposal_form(
    mut payload: Multipart,
    max_part_bytes: usize,
) -> Result<ProposalForm, UploadError> {
    let mut form = ProposalForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_string);

        match filename {
            Some(filename) if filename.is_empty() => {
                tracing::debug!("Skipping empty file part '{}'", name);
                drain_part(&mut field).await?;
            }
            Some(filename) => {
                let kind = AttachmentKind::from_field(&name)
                    .ok_or_else(|| UploadError::UnexpectedField(name.clone()))?;
                if form.attachment_slot(kind).is_some() {
                    return Err(UploadError::UnexpectedField(name));
                }

                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
                if !kind.accepts(&content_type) {
                    return Err(UploadError::invalid_type(kind));
                }

                let data = read_part(&mut field, max_part_bytes)
                    .await?
                    .ok_or(UploadError::FileTooLarge(kind))?;

                tracing::debug!(
                    "Received {} '{}' ({}, {} bytes)",
                    kind.field_name(),
                    filename,
                    content_type,
                    data.len()
                );

                *form.attachment_slot(kind) = Some(Attachment {
                    filename,
                    content_type,
                    data,
                });
            }
            None if form.text_slot(&name).is_none() => {
                tracing::debug!("Ignoring unknown text field '{}'", name);
                drain_part(&mut field).await?;
            }
            None => {
                let bytes = read_part(&mut field, max_part_bytes)
                    .await?
                    .ok_or_else(|| UploadError::FieldTooLong(name.clone()))?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| UploadError::InvalidEncoding(name.clone()))?;

                if let Some(slot) = form.text_slot(&name) {
                    *slot = Some(value);
                }
            }
        }
    }

    Ok(form)
}

/// Consume a part without keeping its bytes
async fn drain_part(field: &mut Field) -> Result<(), UploadError> {
    while field.try_next().await?.is_some() {}
    Ok(())
}

/// Buffer one part; `None` once it grows past `limit`
async fn read_part(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, UploadError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > limit {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Some(buf))
}
