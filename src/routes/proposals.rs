use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::core::{read_proposal_form, AttachmentKind, DEFAULT_MAX_ATTACHMENT_BYTES};
use crate::error::ApiError;
use crate::models::{validation_message, CreatedResponse, HealthResponse, MessageResponse};
use crate::services::{ProposalStore, StoreError};

const PROPOSAL_NOT_FOUND: &str = "Proposal not found";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProposalStore>,
    pub max_attachment_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn ProposalStore>) -> Self {
        Self {
            store,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }

    pub fn with_max_attachment_bytes(mut self, max_attachment_bytes: usize) -> Self {
        self.max_attachment_bytes = max_attachment_bytes;
        self
    }
}

/// Configure all proposal routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::resource("/proposals")
                .route(web::get().to(list_proposals))
                .route(web::post().to(create_proposal)),
        )
        .service(
            web::resource("/proposals/{id}")
                .route(web::get().to(get_proposal))
                .route(web::put().to(update_proposal))
                .route(web::delete().to(delete_proposal)),
        )
        .route("/proposals/{id}/document", web::get().to(get_document))
        .route("/proposals/{id}/image", web::get().to(get_image));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.store.health_check().await.unwrap_or(false);
    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create a proposal
///
/// POST /proposals (multipart/form-data)
///
/// Text fields `name`, `yeshiva`, `shadchan`, `details` are required and
/// `notes` is optional. Optional file parts: `documentFile` (PDF or Word) and
/// `imageFile` (any image).
async fn create_proposal(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = read_proposal_form(payload, state.max_attachment_bytes).await?;

    if let Err(errors) = form.validate() {
        let message = validation_message(&errors);
        tracing::info!("Create rejected: {}", message);
        return Err(ApiError::BadRequest(message));
    }

    let id = state.store.insert(form.into_new_proposal()).await?;
    tracing::info!("Created proposal {}", id);

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Proposal created successfully".to_string(),
        id,
    }))
}

/// List all proposals without attachment data
///
/// GET /proposals
async fn list_proposals(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let proposals = state.store.list().await?;
    Ok(HttpResponse::Ok().json(proposals))
}

/// GET /proposals/{id}
async fn get_proposal(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let proposal = StoreError::absent_if_invalid_id(state.store.get(&id).await)?
        .ok_or_else(|| ApiError::NotFound(PROPOSAL_NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(proposal))
}

/// GET /proposals/{id}/document
async fn get_document(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    serve_attachment(&state, &id, AttachmentKind::Document).await
}

/// GET /proposals/{id}/image
async fn get_image(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    serve_attachment(&state, &id, AttachmentKind::Image).await
}

/// Respond with the raw attachment bytes under their stored content type
async fn serve_attachment(
    state: &AppState,
    id: &str,
    kind: AttachmentKind,
) -> Result<HttpResponse, ApiError> {
    let attachment = StoreError::absent_if_invalid_id(state.store.get(id).await)?
        .and_then(|proposal| proposal.into_attachment(kind))
        .ok_or_else(|| ApiError::NotFound(kind.missing_message().to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type(attachment.content_type)
        .body(attachment.data))
}

/// Update a proposal
///
/// PUT /proposals/{id} (multipart/form-data, same fields as create)
///
/// All five text fields are written; any the client leaves out are stored as
/// empty. Attachments are replaced only when a new file is supplied.
async fn update_proposal(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = read_proposal_form(payload, state.max_attachment_bytes).await?;

    let updated = StoreError::absent_if_invalid_id(state.store.update(&id, form.into_changes()).await)?;
    if !updated {
        return Err(ApiError::NotFound(PROPOSAL_NOT_FOUND.to_string()));
    }

    tracing::info!("Updated proposal {}", id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Proposal updated successfully")))
}

/// DELETE /proposals/{id}
async fn delete_proposal(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let deleted = StoreError::absent_if_invalid_id(state.store.delete(&id).await)?;
    if !deleted {
        return Err(ApiError::NotFound(PROPOSAL_NOT_FOUND.to_string()));
    }

    tracing::info!("Deleted proposal {}", id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Proposal deleted successfully")))
}
