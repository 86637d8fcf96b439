//! Record types held by the entity store.
//!
//! Ids are allocated by the store and never chosen by callers. Dependents (attachments and
//! diagnosed conditions) refer to their owning patient by id only.

use chrono::{DateTime, Utc};

/// Store-assigned identifier. Positive, strictly increasing per entity kind.
pub type RecordId = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    /// Identifier from an outside system (for example a social security number).
    /// Unique among live patients.
    pub external_identifier: String,
    pub date_of_birth: DateTime<Utc>,
}

/// A file attached to a patient, such as medical imaging or a doctor's report.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub name: String,
    pub description: String,
    pub attachment_type: String,
    pub data: Vec<u8>,
}

// Attachment payloads can be megabytes; keep them out of debug output and logs.
impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("id", &self.id)
            .field("patient_id", &self.patient_id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("attachment_type", &self.attachment_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosedCondition {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub name: String,
    /// Medical code identifying the condition.
    pub code: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// An account allowed to edit records. Immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// A patient together with everything it owns, as returned by search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientRecord {
    pub patient: Patient,
    pub attachments: Vec<Attachment>,
    pub diagnosed_conditions: Vec<DiagnosedCondition>,
}
