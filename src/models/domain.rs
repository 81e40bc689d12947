use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AttachmentKind;

/// Binary attachment stored inline with a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(with = "base64_data")]
    pub data: Vec<u8>,
}

/// A stored proposal, including attachment bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub yeshiva: String,
    pub shadchan: String,
    pub details: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "documentFile", default, skip_serializing_if = "Option::is_none")]
    pub document_file: Option<Attachment>,
    #[serde(rename = "imageFile", default, skip_serializing_if = "Option::is_none")]
    pub image_file: Option<Attachment>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Consume the proposal, keeping only the requested attachment
    pub fn into_attachment(self, kind: AttachmentKind) -> Option<Attachment> {
        match kind {
            AttachmentKind::Document => self.document_file,
            AttachmentKind::Image => self.image_file,
        }
    }

    /// Metadata view without attachments, as returned by the listing
    pub fn summary(&self) -> ProposalSummary {
        ProposalSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            yeshiva: self.yeshiva.clone(),
            shadchan: self.shadchan.clone(),
            details: self.details.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Proposal metadata without attachment fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub yeshiva: String,
    pub shadchan: String,
    pub details: String,
    pub notes: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for inserting a proposal
#[derive(Debug, Clone, Default)]
pub struct NewProposal {
    pub name: String,
    pub yeshiva: String,
    pub shadchan: String,
    pub details: String,
    pub notes: String,
    pub document_file: Option<Attachment>,
    pub image_file: Option<Attachment>,
}

/// Field writes applied by an update.
///
/// Every text field is written, including ones the client left out (as empty
/// strings). Attachments are only replaced when present.
#[derive(Debug, Clone, Default)]
pub struct ProposalChanges {
    pub name: String,
    pub yeshiva: String,
    pub shadchan: String,
    pub details: String,
    pub notes: String,
    pub document_file: Option<Attachment>,
    pub image_file: Option<Attachment>,
}

mod base64_data {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
