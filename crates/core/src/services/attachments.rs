//! Attachments owned by patients.

use tracing::{info, instrument};

use crate::constants::{ATTACHMENT_NAME_MIN_LEN, ATTACHMENT_TYPE_MIN_LEN};
use crate::error::{RecordError, RecordResult};
use crate::integrity;
use crate::models::{Attachment, RecordId};
use crate::store::EntityStore;
use crate::validation::{optional_text, required_text};

/// A file to attach, before validation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NewAttachment {
    pub name: String,
    pub description: String,
    pub attachment_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for NewAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAttachment")
            .field("name", &self.name)
            .field("attachment_type", &self.attachment_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct AttachmentService {
    store: EntityStore,
}

impl AttachmentService {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    /// Attaches a file to an existing patient.
    ///
    /// The owner check and the insert share one write lock, so an attachment can never be
    /// stored for a patient that a concurrent delete has just removed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the payload is empty, a field is too short, or the patient
    /// does not exist.
    #[instrument(skip(self, new))]
    pub fn add_attachment_to_patient(
        &self,
        patient_id: RecordId,
        new: NewAttachment,
    ) -> RecordResult<Attachment> {
        if new.data.is_empty() {
            return Err(RecordError::InvalidInput("data was empty".into()));
        }
        let name = required_text("name", &new.name, ATTACHMENT_NAME_MIN_LEN)?;
        let attachment_type = required_text("type", &new.attachment_type, ATTACHMENT_TYPE_MIN_LEN)?;

        let attachment = Attachment {
            id: 0,
            patient_id,
            name: name.into_inner(),
            description: optional_text(&new.description),
            attachment_type: attachment_type.into_inner(),
            data: new.data,
        };

        let stored = self.store.with_write(|records| -> RecordResult<Attachment> {
            integrity::validate_patient_id(records, patient_id)?;
            Ok(records.insert_attachment(attachment))
        })?;

        info!(attachment_id = stored.id, bytes = stored.data.len(), "attachment stored");
        Ok(stored)
    }

    /// Removes a single attachment. Its owner is untouched.
    #[instrument(skip(self))]
    pub fn delete_attachment(&self, id: RecordId) -> RecordResult<()> {
        self.store
            .with_write(|records| -> RecordResult<()> {
                records.delete_attachment(id)?;
                Ok(())
            })?;
        info!("attachment deleted");
        Ok(())
    }

    pub fn get_attachment(&self, id: RecordId) -> RecordResult<Attachment> {
        self.store
            .with_read(|records| Ok(records.attachments().get(id)?.clone()))
    }
}
