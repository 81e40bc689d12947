use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{NewProposal, Proposal, ProposalChanges, ProposalSummary};
use crate::services::store::{parse_id, ProposalStore, StoreError};

/// In-process proposal store.
///
/// Keeps records in insertion order and issues the same id format as the
/// MongoDB store. Used by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Proposal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn insert(&self, proposal: NewProposal) -> Result<String, StoreError> {
        let now = Utc::now();
        let id = ObjectId::new().to_hex();

        self.records.write().await.push(Proposal {
            id: id.clone(),
            name: proposal.name,
            yeshiva: proposal.yeshiva,
            shadchan: proposal.shadchan,
            details: proposal.details,
            notes: proposal.notes,
            document_file: proposal.document_file,
            image_file: proposal.image_file,
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn list(&self) -> Result<Vec<ProposalSummary>, StoreError> {
        Ok(self.records.read().await.iter().map(Proposal::summary).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Proposal>, StoreError> {
        parse_id(id)?;
        Ok(self.records.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: &str, changes: ProposalChanges) -> Result<bool, StoreError> {
        parse_id(id)?;
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };

        record.name = changes.name;
        record.yeshiva = changes.yeshiva;
        record.shadchan = changes.shadchan;
        record.details = changes.details;
        record.notes = changes.notes;
        if changes.document_file.is_some() {
            record.document_file = changes.document_file;
        }
        if changes.image_file.is_some() {
            record.image_file = changes.image_file;
        }
        record.updated_at = Utc::now();

        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        parse_id(id)?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|p| p.id != id);
        Ok(records.len() < before)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;

    fn new_proposal(name: &str) -> NewProposal {
        NewProposal {
            name: name.to_string(),
            yeshiva: "Ponevezh".to_string(),
            shadchan: "Rabbi Stern".to_string(),
            details: "Looking for a learner".to_string(),
            notes: "call after Pesach".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();
        let id = store.insert(new_proposal("Dovid")).await.unwrap();

        let proposal = store.get(&id).await.unwrap().unwrap();
        assert_eq!(proposal.name, "Dovid");
        assert_eq!(proposal.created_at, proposal.updated_at);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryStore::new();
        store.insert(new_proposal("first")).await.unwrap();
        store.insert(new_proposal("second")).await.unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_update_keeps_attachments_not_supplied() {
        let store = MemoryStore::new();
        let mut proposal = new_proposal("Dovid");
        proposal.image_file = Some(Attachment {
            filename: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![1, 2, 3],
        });
        let id = store.insert(proposal).await.unwrap();

        let updated = store
            .update(&id, ProposalChanges { name: "Dovid Ber".to_string(), ..Default::default() })
            .await
            .unwrap();
        assert!(updated);

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Dovid Ber");
        assert_eq!(stored.notes, "");
        assert_eq!(stored.image_file.unwrap().data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids() {
        let store = MemoryStore::new();
        let unknown = ObjectId::new().to_hex();

        assert!(store.get(&unknown).await.unwrap().is_none());
        assert!(!store.delete(&unknown).await.unwrap());
        assert!(!store.update(&unknown, ProposalChanges::default()).await.unwrap());
        assert!(matches!(store.get("123").await, Err(StoreError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryStore::new();
        let id = store.insert(new_proposal("Dovid")).await.unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
