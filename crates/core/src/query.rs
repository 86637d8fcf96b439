//! Multi-criteria patient search.
//!
//! Matching is permissive: a patient is returned when *any* non-empty criterion matches,
//! whether that criterion targets the patient itself, one of its attachments or one of its
//! diagnosed conditions. Comparisons are exact and case-sensitive. A search with every
//! criterion empty returns nothing.
//!
//! Each search scans every collection once and rebuilds its per-patient indexes from scratch,
//! so the cost is `O(patients + attachments + conditions)` with nothing kept between calls.

use std::collections::{HashMap, HashSet};

use crate::models::{Attachment, DiagnosedCondition, PatientRecord, RecordId};
use crate::store::Records;

/// Search criteria. Empty strings mean "not searching on this field".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientSearch {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub external_identifier: String,
    pub diagnosed_condition_name: String,
    pub diagnosed_condition_code: String,
    pub attachment_name: String,
    pub attachment_type: String,
}

impl PatientSearch {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.address,
            &self.phone,
            &self.external_identifier,
            &self.diagnosed_condition_name,
            &self.diagnosed_condition_code,
            &self.attachment_name,
            &self.attachment_type,
        ]
        .iter()
        .all(|field| field.is_empty())
    }
}

/// An empty criterion never matches, not even an empty value.
fn criterion_matches(criterion: &str, value: &str) -> bool {
    !criterion.is_empty() && criterion == value
}

/// Runs `search` against one consistent view of the records.
///
/// Every returned patient carries its complete attachment and condition lists, not only the
/// entries that caused the match. Results are ordered by patient id.
pub fn search_patients(records: &Records, search: &PatientSearch) -> Vec<PatientRecord> {
    if search.is_empty() {
        return Vec::new();
    }

    let mut matched: HashSet<RecordId> = HashSet::new();
    let mut conditions_by_patient: HashMap<RecordId, Vec<DiagnosedCondition>> = HashMap::new();
    let mut attachments_by_patient: HashMap<RecordId, Vec<Attachment>> = HashMap::new();

    for condition in records.diagnosed_conditions().scan() {
        if criterion_matches(&search.diagnosed_condition_code, &condition.code)
            || criterion_matches(&search.diagnosed_condition_name, &condition.name)
        {
            matched.insert(condition.patient_id);
        }
        conditions_by_patient
            .entry(condition.patient_id)
            .or_default()
            .push(condition.clone());
    }

    for attachment in records.attachments().scan() {
        if criterion_matches(&search.attachment_name, &attachment.name)
            || criterion_matches(&search.attachment_type, &attachment.attachment_type)
        {
            matched.insert(attachment.patient_id);
        }
        attachments_by_patient
            .entry(attachment.patient_id)
            .or_default()
            .push(attachment.clone());
    }

    let mut results = Vec::new();
    for patient in records.patients().scan() {
        let matches_self = criterion_matches(&search.name, &patient.name)
            || criterion_matches(&search.phone, &patient.phone_number)
            || criterion_matches(&search.address, &patient.address)
            || criterion_matches(&search.external_identifier, &patient.external_identifier);

        if matches_self || matched.contains(&patient.id) {
            results.push(PatientRecord {
                patient: patient.clone(),
                attachments: attachments_by_patient.remove(&patient.id).unwrap_or_default(),
                diagnosed_conditions: conditions_by_patient
                    .remove(&patient.id)
                    .unwrap_or_default(),
            });
        }
    }

    results
}
