//! In-memory entity store.
//!
//! One [`EntityStore`] owns the four record collections behind a single readers-writer lock.
//! Every operation runs inside [`EntityStore::with_read`] or [`EntityStore::with_write`], so a
//! closure passed to either sees all collections as of one consistent instant. Composite
//! operations (check-then-insert, cascading delete) must be written as a single closure; two
//! separate acquisitions would let another writer interleave.
//!
//! The store is volatile: all state is lost when the process exits.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::constants::FIRST_RECORD_ID;
use crate::models::{Attachment, DiagnosedCondition, Patient, RecordId, User};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patient,
    Attachment,
    DiagnosedCondition,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Patient => "patient",
            EntityKind::Attachment => "attachment",
            EntityKind::DiagnosedCondition => "diagnosed condition",
            EntityKind::User => "user",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },
    #[error("record store lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Records that carry a store-assigned id.
pub trait Identified {
    const KIND: EntityKind;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
}

impl Identified for Patient {
    const KIND: EntityKind = EntityKind::Patient;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Identified for Attachment {
    const KIND: EntityKind = EntityKind::Attachment;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Identified for DiagnosedCondition {
    const KIND: EntityKind = EntityKind::DiagnosedCondition;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// One id-keyed collection with its own id counter.
///
/// Ids start at [`FIRST_RECORD_ID`], increase by one per insert and are never reused, even
/// after the record holding them is deleted.
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

impl<T: Identified> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: FIRST_RECORD_ID,
        }
    }

    /// Stores `record` under a freshly allocated id, ignoring whatever id it carried.
    fn insert(&mut self, mut record: T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        record.set_id(id);
        self.rows.entry(id).or_insert(record)
    }

    fn replace(&mut self, record: T) -> StoreResult<T> {
        let id = record.id();
        match self.rows.get_mut(&id) {
            Some(slot) => Ok(std::mem::replace(slot, record)),
            None => Err(not_found::<T>(id)),
        }
    }

    fn delete(&mut self, id: RecordId) -> StoreResult<T> {
        self.rows.remove(&id).ok_or_else(|| not_found::<T>(id))
    }

    /// Removes every record matching `predicate` and returns how many were removed.
    /// Matching nothing is not an error.
    fn delete_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, record| !predicate(record));
        before - self.rows.len()
    }

    pub fn get(&self, id: RecordId) -> StoreResult<&T> {
        self.rows.get(&id).ok_or_else(|| not_found::<T>(id))
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Iterates over every record. Callers must not rely on the order.
    pub fn scan(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.values()
    }

    pub fn count(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        self.rows.values().filter(|record| predicate(record)).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The id the next insert will receive.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }
}

fn not_found<T: Identified>(id: RecordId) -> StoreError {
    StoreError::NotFound {
        kind: T::KIND,
        key: id.to_string(),
    }
}

/// The four collections guarded by the store lock.
///
/// Only reachable through [`EntityStore::with_read`] / [`EntityStore::with_write`].
#[derive(Debug)]
pub struct Records {
    patients: Table<Patient>,
    attachments: Table<Attachment>,
    diagnosed_conditions: Table<DiagnosedCondition>,
    users: BTreeMap<String, User>,
}

impl Records {
    fn new() -> Self {
        Self {
            patients: Table::new(),
            attachments: Table::new(),
            diagnosed_conditions: Table::new(),
            users: BTreeMap::new(),
        }
    }

    pub fn patients(&self) -> &Table<Patient> {
        &self.patients
    }

    pub fn attachments(&self) -> &Table<Attachment> {
        &self.attachments
    }

    pub fn diagnosed_conditions(&self) -> &Table<DiagnosedCondition> {
        &self.diagnosed_conditions
    }

    pub fn insert_patient(&mut self, patient: Patient) -> Patient {
        self.patients.insert(patient).clone()
    }

    /// Overwrites the patient with the same id. Fails if no such patient exists.
    pub fn replace_patient(&mut self, patient: Patient) -> StoreResult<Patient> {
        self.patients.replace(patient)
    }

    /// Removes the patient record only. Dependents are left in place; see
    /// [`crate::integrity::cascade_delete_patient`] for the owning delete.
    pub fn delete_patient(&mut self, id: RecordId) -> StoreResult<Patient> {
        self.patients.delete(id)
    }

    pub fn insert_attachment(&mut self, attachment: Attachment) -> Attachment {
        self.attachments.insert(attachment).clone()
    }

    pub fn delete_attachment(&mut self, id: RecordId) -> StoreResult<Attachment> {
        self.attachments.delete(id)
    }

    pub fn delete_attachments_of(&mut self, patient_id: RecordId) -> usize {
        self.attachments
            .delete_where(|attachment| attachment.patient_id == patient_id)
    }

    pub fn insert_diagnosed_condition(&mut self, condition: DiagnosedCondition) -> DiagnosedCondition {
        self.diagnosed_conditions.insert(condition).clone()
    }

    pub fn delete_diagnosed_condition(&mut self, id: RecordId) -> StoreResult<DiagnosedCondition> {
        self.diagnosed_conditions.delete(id)
    }

    pub fn delete_diagnosed_conditions_of(&mut self, patient_id: RecordId) -> usize {
        self.diagnosed_conditions
            .delete_where(|condition| condition.patient_id == patient_id)
    }

    pub fn user(&self, username: &str) -> StoreResult<&User> {
        self.users.get(username).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::User,
            key: username.to_string(),
        })
    }

    pub fn count_users(&self, mut predicate: impl FnMut(&User) -> bool) -> usize {
        self.users.values().filter(|user| predicate(user)).count()
    }

    /// Stores a user under its username. Uniqueness is checked by the caller inside the same
    /// critical section; an existing entry is never overwritten.
    pub fn insert_user(&mut self, user: User) {
        self.users.entry(user.username.clone()).or_insert(user);
    }
}

/// Process-lifetime record store handle.
///
/// Cloning is cheap and every clone refers to the same collections. Create one at startup and
/// hand it to each service explicitly.
#[derive(Clone, Debug)]
pub struct EntityStore {
    records: Arc<RwLock<Records>>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Records::new())),
        }
    }

    /// Runs `f` under the shared lock. Concurrent readers are allowed; writers are excluded.
    pub fn with_read<T, E>(&self, f: impl FnOnce(&Records) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let guard = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        f(&guard)
    }

    /// Runs `f` under the exclusive lock. All mutations are linearised through here.
    ///
    /// There is no rollback: `f` should validate everything before it starts mutating.
    pub fn with_write<T, E>(&self, f: impl FnOnce(&mut Records) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn patient(name: &str, external_identifier: &str) -> Patient {
        Patient {
            id: 0,
            name: name.into(),
            address: String::new(),
            phone_number: "8044955579".into(),
            external_identifier: external_identifier.into(),
            date_of_birth: Utc.with_ymd_and_hms(1980, 5, 17, 0, 0, 0).unwrap(),
        }
    }

    fn attachment(patient_id: RecordId, name: &str) -> Attachment {
        Attachment {
            id: 0,
            patient_id,
            name: name.into(),
            description: String::new(),
            attachment_type: "MRI".into(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn ids_start_at_one_and_increase_per_kind() {
        let store = EntityStore::new();
        let (p1, p2, a1) = store
            .with_write(|records| -> StoreResult<_> {
                let p1 = records.insert_patient(patient("John Smith", "123"));
                let p2 = records.insert_patient(patient("Jane Smith", "456"));
                let a1 = records.insert_attachment(attachment(p1.id, "scan one"));
                Ok((p1.id, p2.id, a1.id))
            })
            .expect("write should succeed");

        assert_eq!(p1, 1);
        assert_eq!(p2, 2);
        assert_eq!(a1, 1, "attachments have their own counter");
    }

    #[test]
    fn caller_supplied_id_is_ignored() {
        let store = EntityStore::new();
        let mut input = patient("John Smith", "123");
        input.id = 42;
        let stored = store
            .with_write(|records| -> StoreResult<_> { Ok(records.insert_patient(input)) })
            .expect("write should succeed");
        assert_eq!(stored.id, 1);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = EntityStore::new();
        store
            .with_write(|records| -> StoreResult<()> {
                let first = records.insert_patient(patient("John Smith", "123"));
                records.delete_patient(first.id)?;
                let second = records.insert_patient(patient("John Smith", "123"));
                assert!(second.id > first.id, "id must be strictly greater after delete");
                assert_eq!(records.patients().next_id(), 3);
                Ok(())
            })
            .expect("write should succeed");
    }

    #[test]
    fn delete_of_absent_id_is_not_found() {
        let store = EntityStore::new();
        let err = store
            .with_write(|records| records.delete_attachment(9))
            .expect_err("deleting an absent id should fail");
        assert_eq!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Attachment,
                key: "9".into()
            }
        );
    }

    #[test]
    fn replace_requires_existing_record() {
        let store = EntityStore::new();
        let mut ghost = patient("Ghost", "000");
        ghost.id = 5;
        let err = store
            .with_write(|records| records.replace_patient(ghost))
            .expect_err("replace of an absent patient should fail");
        assert!(matches!(err, StoreError::NotFound { kind: EntityKind::Patient, .. }));
    }

    #[test]
    fn delete_dependents_with_none_present_is_ok() {
        let store = EntityStore::new();
        let removed = store
            .with_write(|records| -> StoreResult<_> { Ok(records.delete_attachments_of(1)) })
            .expect("write should succeed");
        assert_eq!(removed, 0);
    }

    #[test]
    fn count_and_scan_see_all_rows() {
        let store = EntityStore::new();
        store
            .with_write(|records| -> StoreResult<()> {
                records.insert_patient(patient("John Smith", "123"));
                records.insert_patient(patient("Jane Smith", "123"));
                records.insert_patient(patient("Jane Doe", "789"));
                Ok(())
            })
            .expect("write should succeed");

        store
            .with_read(|records| -> StoreResult<()> {
                let patients = records.patients();
                assert_eq!(patients.count(|p| p.external_identifier == "123"), 2);
                assert_eq!(patients.scan().count(), 3);
                assert!(patients.contains(3));
                assert!(!patients.contains(4));
                Ok(())
            })
            .expect("read should succeed");
    }

    #[test]
    fn insert_user_never_overwrites() {
        let store = EntityStore::new();
        store
            .with_write(|records| -> StoreResult<()> {
                records.insert_user(User {
                    username: "doctor1".into(),
                    password_hash: "first".into(),
                });
                records.insert_user(User {
                    username: "doctor1".into(),
                    password_hash: "second".into(),
                });
                assert_eq!(records.user("doctor1")?.password_hash, "first");
                Ok(())
            })
            .expect("write should succeed");
    }

    #[test]
    fn panic_while_writing_poisons_the_store() {
        let store = EntityStore::new();
        let writer = store.clone();
        let outcome = std::thread::spawn(move || {
            let _ = writer.with_write(|_| -> StoreResult<()> { panic!("writer crashed") });
        })
        .join();
        assert!(outcome.is_err(), "writer thread should have panicked");

        let err = store
            .with_read(|records| -> StoreResult<usize> { Ok(records.patients().len()) })
            .expect_err("poisoned lock should surface as an error");
        assert_eq!(err, StoreError::LockPoisoned);
    }
}
