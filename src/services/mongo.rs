use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::spec::BinarySubtype;
use bson::{doc, Binary, Bson, DateTime, Document};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::models::{Attachment, NewProposal, Proposal, ProposalChanges, ProposalSummary};
use crate::services::store::{parse_id, ProposalStore, StoreError};

/// Database used when neither the settings nor the URI name one
pub const DEFAULT_DATABASE: &str = "shidduchim";

/// Proposal as stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProposalDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    yeshiva: String,
    #[serde(default)]
    shadchan: String,
    #[serde(default)]
    details: String,
    #[serde(default)]
    notes: String,
    #[serde(rename = "documentFile", default, skip_serializing_if = "Option::is_none")]
    document_file: Option<AttachmentDocument>,
    #[serde(rename = "imageFile", default, skip_serializing_if = "Option::is_none")]
    image_file: Option<AttachmentDocument>,
    #[serde(rename = "createdAt")]
    created_at: DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttachmentDocument {
    #[serde(default)]
    filename: String,
    #[serde(rename = "contentType", default)]
    content_type: String,
    data: Binary,
}

impl From<Attachment> for AttachmentDocument {
    fn from(attachment: Attachment) -> Self {
        Self {
            filename: attachment.filename,
            content_type: attachment.content_type,
            data: Binary {
                subtype: BinarySubtype::Generic,
                bytes: attachment.data,
            },
        }
    }
}

impl From<AttachmentDocument> for Attachment {
    fn from(doc: AttachmentDocument) -> Self {
        Self {
            filename: doc.filename,
            content_type: doc.content_type,
            data: doc.data.bytes,
        }
    }
}

impl From<ProposalDocument> for Proposal {
    fn from(doc: ProposalDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            yeshiva: doc.yeshiva,
            shadchan: doc.shadchan,
            details: doc.details,
            notes: doc.notes,
            document_file: doc.document_file.map(Into::into),
            image_file: doc.image_file.map(Into::into),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

impl From<ProposalDocument> for ProposalSummary {
    fn from(doc: ProposalDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            yeshiva: doc.yeshiva,
            shadchan: doc.shadchan,
            details: doc.details,
            notes: doc.notes,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

/// MongoDB-backed proposal store
///
/// Holds the process-wide client handle. The handle is constructed once at
/// startup and should be shut down with [`MongoStore::shutdown`] on exit.
pub struct MongoStore {
    client: Client,
    collection: Collection<ProposalDocument>,
}

impl MongoStore {
    /// Build a client for `uri` and bind the proposal collection.
    ///
    /// The database is `database` if given, else the one named in the URI
    /// path, else [`DEFAULT_DATABASE`]. The driver connects lazily, so an
    /// unreachable server surfaces on the first request, not here.
    pub async fn connect(
        uri: &str,
        database: Option<&str>,
        collection: &str,
    ) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri).await?;
        let database = database
            .map(str::to_string)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(options)?;
        let collection: Collection<ProposalDocument> =
            client.database(&database).collection(collection);

        tracing::info!(
            "MongoDB client ready (database: {}, collection: {})",
            database,
            collection.name()
        );

        Ok(Self { client, collection })
    }

    /// Close pooled connections; call once the HTTP server has stopped
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}

fn attachment_bson(attachment: Attachment) -> Result<Bson, StoreError> {
    Ok(bson::to_bson(&AttachmentDocument::from(attachment))?)
}

fn changes_document(changes: ProposalChanges) -> Result<Document, StoreError> {
    let mut set = doc! {
        "name": changes.name,
        "yeshiva": changes.yeshiva,
        "shadchan": changes.shadchan,
        "details": changes.details,
        "notes": changes.notes,
        "updatedAt": DateTime::now(),
    };

    if let Some(document) = changes.document_file {
        set.insert("documentFile", attachment_bson(document)?);
    }
    if let Some(image) = changes.image_file {
        set.insert("imageFile", attachment_bson(image)?);
    }

    Ok(doc! { "$set": set })
}

#[async_trait]
impl ProposalStore for MongoStore {
    async fn insert(&self, proposal: NewProposal) -> Result<String, StoreError> {
        let now = DateTime::now();
        let document = ProposalDocument {
            id: ObjectId::new(),
            name: proposal.name,
            yeshiva: proposal.yeshiva,
            shadchan: proposal.shadchan,
            details: proposal.details,
            notes: proposal.notes,
            document_file: proposal.document_file.map(Into::into),
            image_file: proposal.image_file.map(Into::into),
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&document).await?;
        tracing::debug!("Inserted proposal {}", document.id);

        Ok(document.id.to_hex())
    }

    async fn list(&self) -> Result<Vec<ProposalSummary>, StoreError> {
        let documents: Vec<ProposalDocument> = self
            .collection
            .find(doc! {})
            .projection(doc! { "documentFile": 0, "imageFile": 0 })
            .await?
            .try_collect()
            .await?;

        tracing::debug!("Listed {} proposals", documents.len());

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Proposal>, StoreError> {
        let oid = parse_id(id)?;
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Into::into))
    }

    async fn update(&self, id: &str, changes: ProposalChanges) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let update = changes_document(changes)?;

        let result = self.collection.update_one(doc! { "_id": oid }, update).await?;
        tracing::debug!("Update of {} matched {} record(s)", id, result.matched_count);

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
