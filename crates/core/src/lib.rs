//! # MCG Core
//!
//! Core business logic for the MCG patient records service.
//!
//! This crate holds everything that does not depend on a transport:
//! - the in-memory [`EntityStore`] for patients, attachments, diagnosed conditions and users
//! - permissive multi-criteria patient search ([`query`])
//! - referential integrity and cascading delete ([`integrity`])
//! - the domain services in [`services`]
//!
//! **No API concerns**: token handling, HTTP routing and configuration belong in `api-shared`
//! and `api-rest`.

pub mod constants;
pub mod error;
pub mod integrity;
pub mod models;
pub mod password;
pub mod query;
pub mod services;
pub mod store;
pub mod validation;

pub use error::{RecordError, RecordResult};
pub use integrity::CascadeSummary;
pub use models::{Attachment, DiagnosedCondition, Patient, PatientRecord, RecordId, User};
pub use password::{Argon2Hasher, PasswordHashing};
pub use query::PatientSearch;
pub use services::{
    AttachmentService, DiagnosedConditionService, NewAttachment, NewDiagnosedCondition,
    PatientDetails, PatientService, UserService,
};
pub use store::{EntityKind, EntityStore, Records, StoreError, StoreResult};

pub use mcg_types::{NonEmptyText, TextError};
