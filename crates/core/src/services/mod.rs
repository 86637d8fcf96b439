//! Domain services.
//!
//! Each service is a thin, cloneable handle over the shared [`EntityStore`](crate::EntityStore).
//! Construct them once at startup from the same store and hand clones to the transport layer.

pub mod attachments;
pub mod conditions;
pub mod patients;
pub mod users;

pub use attachments::{AttachmentService, NewAttachment};
pub use conditions::{DiagnosedConditionService, NewDiagnosedCondition};
pub use patients::{PatientDetails, PatientService};
pub use users::UserService;
