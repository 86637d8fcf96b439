use crate::store::StoreError;

/// Domain error shared by every record operation.
///
/// The first three variants are the domain kinds the transport layer maps to distinct status
/// codes. `Internal` covers failures that are not the caller's fault (a poisoned lock, a hashing
/// or signing library failure) and must never be reported as one of the domain kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RecordError {
    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            RecordError::InvalidInput(m)
            | RecordError::AlreadyExists(m)
            | RecordError::Unauthorized(m)
            | RecordError::Internal(m) => m,
        }
    }
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => RecordError::InvalidInput(err.to_string()),
            StoreError::LockPoisoned => RecordError::Internal(err.to_string()),
        }
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntityKind;

    #[test]
    fn not_found_becomes_invalid_input() {
        let err: RecordError = StoreError::NotFound {
            kind: EntityKind::Attachment,
            key: "7".into(),
        }
        .into();
        assert_eq!(err, RecordError::InvalidInput("attachment not found: 7".into()));
    }

    #[test]
    fn poisoned_lock_is_internal() {
        let err: RecordError = StoreError::LockPoisoned.into();
        assert!(matches!(err, RecordError::Internal(_)));
    }

    #[test]
    fn message_strips_kind_prefix() {
        let err = RecordError::AlreadyExists("username is already taken".into());
        assert_eq!(err.message(), "username is already taken");
        assert_eq!(err.to_string(), "already exists: username is already taken");
    }
}
