//! Diagnosed conditions owned by patients.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::constants::{CONDITION_CODE_MIN_LEN, CONDITION_NAME_MIN_LEN};
use crate::error::RecordResult;
use crate::integrity;
use crate::models::{DiagnosedCondition, RecordId};
use crate::store::EntityStore;
use crate::validation::{optional_text, required_date, required_text};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewDiagnosedCondition {
    pub name: String,
    pub code: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct DiagnosedConditionService {
    store: EntityStore,
}

impl DiagnosedConditionService {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    /// Records a diagnosis against an existing patient.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a field is missing or too short, or the patient does not
    /// exist.
    #[instrument(skip(self, new))]
    pub fn add_diagnosed_condition_to_patient(
        &self,
        patient_id: RecordId,
        new: NewDiagnosedCondition,
    ) -> RecordResult<DiagnosedCondition> {
        let name = required_text("name", &new.name, CONDITION_NAME_MIN_LEN)?;
        let code = required_text("code", &new.code, CONDITION_CODE_MIN_LEN)?;
        let date = required_date("date", new.date)?;

        let condition = DiagnosedCondition {
            id: 0,
            patient_id,
            name: name.into_inner(),
            code: code.into_inner(),
            description: optional_text(&new.description),
            date,
        };

        let stored = self
            .store
            .with_write(|records| -> RecordResult<DiagnosedCondition> {
                integrity::validate_patient_id(records, patient_id)?;
                Ok(records.insert_diagnosed_condition(condition))
            })?;

        info!(condition_id = stored.id, "diagnosed condition recorded");
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub fn delete_diagnosed_condition(&self, id: RecordId) -> RecordResult<()> {
        self.store.with_write(|records| -> RecordResult<()> {
            records.delete_diagnosed_condition(id)?;
            Ok(())
        })?;
        info!("diagnosed condition deleted");
        Ok(())
    }

    pub fn get_diagnosed_condition(&self, id: RecordId) -> RecordResult<DiagnosedCondition> {
        self.store
            .with_read(|records| Ok(records.diagnosed_conditions().get(id)?.clone()))
    }
}
