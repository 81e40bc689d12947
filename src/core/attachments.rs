/// Content types accepted for `documentFile`: PDF and Word
pub const DOCUMENT_CONTENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// 10 MiB per attachment
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// The two attachment slots a proposal carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Document,
    Image,
}

impl AttachmentKind {
    /// Map a multipart field name to its attachment slot
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "documentFile" => Some(Self::Document),
            "imageFile" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            Self::Document => "documentFile",
            Self::Image => "imageFile",
        }
    }

    /// Whether an upload with this content type may be stored in the slot.
    ///
    /// The header value is compared as sent: documents must match one of
    /// [`DOCUMENT_CONTENT_TYPES`] exactly, images must start with `image/`.
    pub fn accepts(self, content_type: &str) -> bool {
        match self {
            Self::Document => DOCUMENT_CONTENT_TYPES.contains(&content_type),
            Self::Image => content_type.starts_with("image/"),
        }
    }

    /// Message returned when the record has no attachment in this slot
    pub fn missing_message(self) -> &'static str {
        match self {
            Self::Document => "Document not found",
            Self::Image => "Image not found",
        }
    }
}
