use validator::{Validate, ValidationErrors};

use crate::core::AttachmentKind;
use crate::models::domain::{Attachment, NewProposal, ProposalChanges};

/// Fields collected from a create or update multipart form
#[derive(Debug, Clone, Default, Validate)]
pub struct ProposalForm {
    #[validate(required(message = "is required"), length(min = 1, message = "is required"))]
    pub name: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, message = "is required"))]
    pub yeshiva: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, message = "is required"))]
    pub shadchan: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, message = "is required"))]
    pub details: Option<String>,
    pub notes: Option<String>,
    pub document_file: Option<Attachment>,
    pub image_file: Option<Attachment>,
}

impl ProposalForm {
    /// Slot for a text field, or `None` if the form has no such field
    pub fn text_slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "name" => Some(&mut self.name),
            "yeshiva" => Some(&mut self.yeshiva),
            "shadchan" => Some(&mut self.shadchan),
            "details" => Some(&mut self.details),
            "notes" => Some(&mut self.notes),
            _ => None,
        }
    }

    pub fn attachment_slot(&mut self, kind: AttachmentKind) -> &mut Option<Attachment> {
        match kind {
            AttachmentKind::Document => &mut self.document_file,
            AttachmentKind::Image => &mut self.image_file,
        }
    }

    /// Call only after `validate()` has passed.
    pub fn into_new_proposal(self) -> NewProposal {
        NewProposal {
            name: self.name.unwrap_or_default(),
            yeshiva: self.yeshiva.unwrap_or_default(),
            shadchan: self.shadchan.unwrap_or_default(),
            details: self.details.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            document_file: self.document_file,
            image_file: self.image_file,
        }
    }

    /// Omitted text fields become empty strings; omitted attachments are left alone.
    // TODO: revisit once clients confirm whether partial updates should merge instead
    pub fn into_changes(self) -> ProposalChanges {
        ProposalChanges {
            name: self.name.unwrap_or_default(),
            yeshiva: self.yeshiva.unwrap_or_default(),
            shadchan: self.shadchan.unwrap_or_default(),
            details: self.details.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            document_file: self.document_file,
            image_file: self.image_file,
        }
    }
}

/// Render validation errors as a single message, fields in name order
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| format!("{} is required", field))
        .collect();
    fields.sort();
    format!("Proposal validation failed: {}", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProposalForm {
        ProposalForm {
            name: Some("Levi".to_string()),
            yeshiva: Some("Mir".to_string()),
            shadchan: Some("Mrs. Klein".to_string()),
            details: Some("Learning in kollel".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_form_validates() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_missing_and_empty_fields_are_reported() {
        let mut form = filled();
        form.name = None;
        form.details = Some(String::new());

        let errors = form.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Proposal validation failed: details is required, name is required"
        );
    }

    #[test]
    fn test_notes_default_to_empty() {
        let proposal = filled().into_new_proposal();
        assert_eq!(proposal.notes, "");
    }

    #[test]
    fn test_changes_blank_out_omitted_fields() {
        let mut form = filled();
        form.yeshiva = None;
        let changes = form.into_changes();
        assert_eq!(changes.yeshiva, "");
        assert_eq!(changes.notes, "");
        assert!(changes.document_file.is_none());
    }

    #[test]
    fn test_text_slot_rejects_unknown_names() {
        let mut form = ProposalForm::default();
        assert!(form.text_slot("notes").is_some());
        assert!(form.text_slot("documentFile").is_none());
        assert!(form.text_slot("age").is_none());
    }
}
