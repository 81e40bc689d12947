// Upload handling
pub mod attachments;
pub mod form;

pub use attachments::{AttachmentKind, DEFAULT_MAX_ATTACHMENT_BYTES, DOCUMENT_CONTENT_TYPES};
pub use form::{read_proposal_form, UploadError};
