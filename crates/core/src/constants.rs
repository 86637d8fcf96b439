//! Constants used throughout the record core.
//!
//! Field lengths are counted in characters after trimming surrounding whitespace.

use crate::models::RecordId;

/// First id handed out for every entity kind.
pub const FIRST_RECORD_ID: RecordId = 1;

pub const PATIENT_NAME_MIN_LEN: usize = 3;
pub const PATIENT_PHONE_MIN_LEN: usize = 10;
pub const EXTERNAL_IDENTIFIER_MIN_LEN: usize = 3;

pub const ATTACHMENT_NAME_MIN_LEN: usize = 5;
pub const ATTACHMENT_TYPE_MIN_LEN: usize = 1;

pub const CONDITION_NAME_MIN_LEN: usize = 3;
pub const CONDITION_CODE_MIN_LEN: usize = 3;

pub const USERNAME_MIN_LEN: usize = 6;
pub const PASSWORD_MIN_LEN: usize = 6;
