// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Attachment, NewProposal, Proposal, ProposalChanges, ProposalSummary};
pub use requests::{validation_message, ProposalForm};
pub use responses::{CreatedResponse, ErrorResponse, HealthResponse, MessageResponse};
