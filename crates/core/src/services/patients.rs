//! Patient management.
//!
//! Creates, updates, deletes and searches patients. Uniqueness of the external identifier is
//! checked inside the same write critical section as the insert or update it guards, and
//! deletion cascades to the patient's attachments and diagnosed conditions under one lock.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::constants::{EXTERNAL_IDENTIFIER_MIN_LEN, PATIENT_NAME_MIN_LEN, PATIENT_PHONE_MIN_LEN};
use crate::error::RecordResult;
use crate::integrity::{self, CascadeSummary};
use crate::models::{Patient, PatientRecord, RecordId};
use crate::query::{self, PatientSearch};
use crate::store::EntityStore;
use crate::validation::{optional_text, required_date, required_text};

/// Caller-supplied patient fields, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientDetails {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub external_identifier: String,
    pub date_of_birth: Option<DateTime<Utc>>,
}

impl PatientDetails {
    /// Validates every field and builds an unsaved patient (id 0; the store assigns the real one).
    fn into_patient(self) -> RecordResult<Patient> {
        let name = required_text("name", &self.name, PATIENT_NAME_MIN_LEN)?;
        let phone_number =
            required_text("phoneNumber", &self.phone_number, PATIENT_PHONE_MIN_LEN)?;
        let external_identifier = required_text(
            "externalIdentifier",
            &self.external_identifier,
            EXTERNAL_IDENTIFIER_MIN_LEN,
        )?;
        let date_of_birth = required_date("dateOfBirth", self.date_of_birth)?;

        Ok(Patient {
            id: 0,
            name: name.into_inner(),
            address: optional_text(&self.address),
            phone_number: phone_number.into_inner(),
            external_identifier: external_identifier.into_inner(),
            date_of_birth,
        })
    }
}

/// Patient operations over a shared [`EntityStore`].
#[derive(Clone, Debug)]
pub struct PatientService {
    store: EntityStore,
}

impl PatientService {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    /// Creates a patient.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a required field is missing or too short.
    /// - `AlreadyExists` if another patient holds the same external identifier. Nothing is
    ///   stored in that case.
    #[instrument(skip_all)]
    pub fn create_patient(&self, details: PatientDetails) -> RecordResult<Patient> {
        let patient = details.into_patient()?;
        debug!("creating patient");

        let created = self.store.with_write(|records| -> RecordResult<Patient> {
            integrity::validate_unique_external_identifier(
                records,
                &patient.external_identifier,
                None,
            )?;
            Ok(records.insert_patient(patient))
        })?;

        info!(patient_id = created.id, "patient created");
        Ok(created)
    }

    /// Replaces every field of an existing patient. Attachments and conditions are kept.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a field is invalid or no patient has `id`.
    /// - `AlreadyExists` if the new external identifier belongs to a different patient.
    #[instrument(skip(self, details), fields(patient_id = id))]
    pub fn update_patient(&self, id: RecordId, details: PatientDetails) -> RecordResult<Patient> {
        let mut patient = details.into_patient()?;
        patient.id = id;

        let updated = self.store.with_write(|records| -> RecordResult<Patient> {
            integrity::validate_patient_id(records, id)?;
            integrity::validate_unique_external_identifier(
                records,
                &patient.external_identifier,
                Some(id),
            )?;
            records.replace_patient(patient.clone())?;
            Ok(patient)
        })?;

        info!("patient updated");
        Ok(updated)
    }

    /// Deletes a patient and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no patient has `id`; nothing is removed in that case.
    #[instrument(skip(self), fields(patient_id = id))]
    pub fn delete_patient(&self, id: RecordId) -> RecordResult<CascadeSummary> {
        let summary = self
            .store
            .with_write(|records| integrity::cascade_delete_patient(records, id))?;

        info!(
            attachments = summary.attachments,
            diagnosed_conditions = summary.diagnosed_conditions,
            "patient deleted"
        );
        Ok(summary)
    }

    /// Finds patients matching any of the given criteria. See [`crate::query`] for the rules.
    pub fn search_patients(&self, search: &PatientSearch) -> RecordResult<Vec<PatientRecord>> {
        let results = self
            .store
            .with_read(|records| -> RecordResult<_> { Ok(query::search_patients(records, search)) })?;
        debug!(matches = results.len(), "patient search complete");
        Ok(results)
    }

    pub fn get_patient(&self, id: RecordId) -> RecordResult<Patient> {
        self.store
            .with_read(|records| Ok(records.patients().get(id)?.clone()))
    }

    /// Fails with `InvalidInput` unless a patient with `id` exists.
    pub fn validate_patient_id(&self, id: RecordId) -> RecordResult<()> {
        self.store
            .with_read(|records| integrity::validate_patient_id(records, id))
    }
}
