use async_trait::async_trait;
use bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{NewProposal, Proposal, ProposalChanges, ProposalSummary};

/// Errors that can occur when talking to the proposal store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid proposal id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),
}

impl StoreError {
    /// Malformed ids cannot name a stored record, so they read as "absent"
    pub fn absent_if_invalid_id<T: Default>(result: Result<T, StoreError>) -> Result<T, StoreError> {
        match result {
            Err(StoreError::InvalidId(id)) => {
                tracing::debug!("Treating malformed id '{}' as missing", id);
                Ok(T::default())
            }
            other => other,
        }
    }
}

/// Parse a client-supplied id into the store's native id type
pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Persistence for proposals.
///
/// Every call touches exactly one record except `list`. Ids, `createdAt` and
/// `updatedAt` are assigned by the store.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Insert a record and return its id
    async fn insert(&self, proposal: NewProposal) -> Result<String, StoreError>;

    /// All records in insertion order, without attachments
    async fn list(&self) -> Result<Vec<ProposalSummary>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Proposal>, StoreError>;

    /// Apply `changes`; `false` if no record has this id
    async fn update(&self, id: &str, changes: ProposalChanges) -> Result<bool, StoreError>;

    /// Remove a record; `false` if no record has this id
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_hex_object_ids() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(matches!(parse_id("not-an-id"), Err(StoreError::InvalidId(_))));
        assert!(matches!(parse_id(""), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn test_invalid_id_reads_as_absent() {
        let missing: Result<Option<Proposal>, StoreError> = Err(StoreError::InvalidId("x".into()));
        assert!(StoreError::absent_if_invalid_id(missing).unwrap().is_none());

        let deleted: Result<bool, StoreError> = Err(StoreError::InvalidId("x".into()));
        assert!(!StoreError::absent_if_invalid_id(deleted).unwrap());
    }
}
