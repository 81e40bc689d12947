//! Proposals - CRUD service for shidduch proposals
//!
//! Stores proposal records with an optional document and image attachment
//! and serves them over a small actix-web HTTP API backed by MongoDB.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::ApiError;
pub use models::{Attachment, Proposal, ProposalSummary};
pub use routes::{configure_routes, AppState};
pub use services::{MemoryStore, MongoStore, ProposalStore, StoreError};

