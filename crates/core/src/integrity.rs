//! Referential and uniqueness checks that guard store mutations.
//!
//! Every function here takes the already-locked [`Records`], so a check and the mutation it
//! guards run inside one critical section. Callers pass these into
//! [`EntityStore::with_write`](crate::store::EntityStore::with_write) together with the insert or
//! delete they protect.

use crate::error::{RecordError, RecordResult};
use crate::models::RecordId;
use crate::store::Records;

/// Fails with `InvalidInput` unless a patient with `id` exists.
pub fn validate_patient_id(records: &Records, id: RecordId) -> RecordResult<()> {
    if records.patients().count(|patient| patient.id == id) < 1 {
        tracing::warn!(patient_id = id, "reference to unknown patient");
        return Err(RecordError::InvalidInput("patient id not found".into()));
    }
    Ok(())
}

/// Fails with `AlreadyExists` if another patient already holds `external_identifier`.
///
/// `except` excludes one patient from the check so an update can keep its own identifier.
pub fn validate_unique_external_identifier(
    records: &Records,
    external_identifier: &str,
    except: Option<RecordId>,
) -> RecordResult<()> {
    let holders = records.patients().count(|patient| {
        patient.external_identifier == external_identifier && Some(patient.id) != except
    });
    if holders > 0 {
        tracing::warn!("duplicate external identifier rejected");
        return Err(RecordError::AlreadyExists(
            "patient with matching externalIdentifier already exists".into(),
        ));
    }
    Ok(())
}

/// Fails with `AlreadyExists` if `username` is taken.
pub fn validate_unique_username(records: &Records, username: &str) -> RecordResult<()> {
    if records.count_users(|user| user.username == username) > 0 {
        tracing::warn!(username, "duplicate username rejected");
        return Err(RecordError::AlreadyExists("username is already taken".into()));
    }
    Ok(())
}

/// What a cascading patient delete removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub attachments: usize,
    pub diagnosed_conditions: usize,
}

/// Deletes a patient together with every attachment and diagnosed condition it owns.
///
/// Existence is confirmed before anything is touched, so an unknown id leaves the records
/// unchanged. Run under the exclusive lock, readers never observe a partial cascade.
pub fn cascade_delete_patient(records: &mut Records, id: RecordId) -> RecordResult<CascadeSummary> {
    validate_patient_id(records, id)?;

    let summary = CascadeSummary {
        attachments: records.delete_attachments_of(id),
        diagnosed_conditions: records.delete_diagnosed_conditions_of(id),
    };
    records.delete_patient(id)?;

    Ok(summary)
}
