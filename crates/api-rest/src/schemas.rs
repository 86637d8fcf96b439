//! Wire types for the REST API.
//!
//! JSON field names are camelCase. Request fields default to empty so that a missing field is
//! reported by domain validation with a field-specific message rather than a parse error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use mcg_core::{
    Attachment, DiagnosedCondition, NewDiagnosedCondition, Patient, PatientDetails,
    PatientRecord, PatientSearch, RecordId,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub token: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientReq {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub external_identifier: String,
    pub date_of_birth: Option<DateTime<Utc>>,
}

impl From<PatientReq> for PatientDetails {
    fn from(req: PatientReq) -> Self {
        PatientDetails {
            name: req.name,
            address: req.address,
            phone_number: req.phone_number,
            external_identifier: req.external_identifier,
            date_of_birth: req.date_of_birth,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRes {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub external_identifier: String,
    pub date_of_birth: DateTime<Utc>,
}

impl From<Patient> for PatientRes {
    fn from(p: Patient) -> Self {
        PatientRes {
            id: p.id,
            name: p.name,
            address: p.address,
            phone_number: p.phone_number,
            external_identifier: p.external_identifier,
            date_of_birth: p.date_of_birth,
        }
    }
}

/// Multipart form accepted by the attachment upload route.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct AttachmentForm {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub attachment_type: String,
    #[schema(value_type = String, format = Binary)]
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRes {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub attachment_type: String,
    /// Base64 (standard alphabet) file contents.
    pub data: String,
}

impl From<Attachment> for AttachmentRes {
    fn from(a: Attachment) -> Self {
        AttachmentRes {
            id: a.id,
            patient_id: a.patient_id,
            name: a.name,
            description: a.description,
            attachment_type: a.attachment_type,
            data: STANDARD.encode(&a.data),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosedConditionReq {
    pub name: String,
    pub code: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
}

impl From<DiagnosedConditionReq> for NewDiagnosedCondition {
    fn from(req: DiagnosedConditionReq) -> Self {
        NewDiagnosedCondition {
            name: req.name,
            code: req.code,
            description: req.description,
            date: req.date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosedConditionRes {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl From<DiagnosedCondition> for DiagnosedConditionRes {
    fn from(c: DiagnosedCondition) -> Self {
        DiagnosedConditionRes {
            id: c.id,
            patient_id: c.patient_id,
            name: c.name,
            code: c.code,
            description: c.description,
            date: c.date,
        }
    }
}

/// A search hit: the patient with every attachment and condition it owns.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecordRes {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub external_identifier: String,
    pub date_of_birth: DateTime<Utc>,
    pub attachments: Vec<AttachmentRes>,
    pub diagnosed_conditions: Vec<DiagnosedConditionRes>,
}

impl From<PatientRecord> for PatientRecordRes {
    fn from(record: PatientRecord) -> Self {
        let PatientRecord {
            patient,
            attachments,
            diagnosed_conditions,
        } = record;
        PatientRecordRes {
            id: patient.id,
            name: patient.name,
            address: patient.address,
            phone_number: patient.phone_number,
            external_identifier: patient.external_identifier,
            date_of_birth: patient.date_of_birth,
            attachments: attachments.into_iter().map(AttachmentRes::from).collect(),
            diagnosed_conditions: diagnosed_conditions
                .into_iter()
                .map(DiagnosedConditionRes::from)
                .collect(),
        }
    }
}

/// Search criteria. A patient matches when any supplied criterion matches exactly.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub external_identifier: Option<String>,
    pub diagnosed_condition_name: Option<String>,
    pub diagnosed_condition_code: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_type: Option<String>,
}

impl From<SearchParams> for PatientSearch {
    fn from(p: SearchParams) -> Self {
        PatientSearch {
            name: p.name.unwrap_or_default(),
            address: p.address.unwrap_or_default(),
            phone: p.phone.unwrap_or_default(),
            external_identifier: p.external_identifier.unwrap_or_default(),
            diagnosed_condition_name: p.diagnosed_condition_name.unwrap_or_default(),
            diagnosed_condition_code: p.diagnosed_condition_code.unwrap_or_default(),
            attachment_name: p.attachment_name.unwrap_or_default(),
            attachment_type: p.attachment_type.unwrap_or_default(),
        }
    }
}
