//! Guests: the people occupying the rooms during a stay.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posada_core::{DomainError, DomainResult, Entity, GuestId, SequenceGenerator};
use posada_events::AuditSink;

use crate::client::DocumentKind;
use crate::validate;

/// Registration request for a new guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuest {
    pub document_kind: DocumentKind,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub nationality: String,
    pub email: String,
}

/// A registered guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    id: GuestId,
    document_kind: DocumentKind,
    document_number: String,
    first_name: String,
    last_name: String,
    phone: String,
    nationality: String,
    email: String,
    registered_at: DateTime<Utc>,
}

impl Guest {
    pub fn id_typed(&self) -> GuestId {
        self.id
    }

    pub fn document_kind(&self) -> DocumentKind {
        self.document_kind
    }

    pub fn document_number(&self) -> &str {
        &self.document_number
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn nationality(&self) -> &str {
        &self.nationality
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

impl Entity for Guest {
    type Id = GuestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Resolution seam consumed by the reservation/invoicing core.
pub trait GuestLookup: Send + Sync {
    fn guest(&self, id: GuestId) -> Option<Guest>;
}

/// In-memory guest directory.
pub struct GuestDirectory {
    guests: RwLock<BTreeMap<GuestId, Guest>>,
    seq: SequenceGenerator,
    audit: Arc<dyn AuditSink>,
}

impl GuestDirectory {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            guests: RwLock::new(BTreeMap::new()),
            seq: SequenceGenerator::new(),
            audit,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<GuestId, Guest>> {
        self.guests.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<GuestId, Guest>> {
        self.guests.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new guest; duplicate document numbers are rejected.
    pub fn register(&self, new: NewGuest) -> DomainResult<Guest> {
        validate::name(&new.first_name, "first name")?;
        validate::name(&new.last_name, "last name")?;
        validate::document(&new.document_number, new.document_kind)?;
        validate::phone(&new.phone)?;
        validate::nationality(&new.nationality)?;
        validate::email(&new.email)?;

        let mut guests = self.write();
        if guests
            .values()
            .any(|g| g.document_number == new.document_number)
        {
            return Err(DomainError::conflict(format!(
                "a guest with document {} already exists",
                new.document_number
            )));
        }

        let id = GuestId::new(self.seq.next_id());
        let guest = Guest {
            id,
            document_kind: new.document_kind,
            document_number: new.document_number,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            nationality: new.nationality,
            email: new.email,
            registered_at: Utc::now(),
        };
        guests.insert(id, guest.clone());
        drop(guests);

        self.audit.record(
            "GUEST registered",
            "front desk",
            &format!("{} - nationality: {}", guest.full_name(), guest.nationality),
        );
        Ok(guest)
    }

    pub fn find_by_id(&self, id: GuestId) -> Option<Guest> {
        self.read().get(&id).cloned()
    }

    pub fn find_by_document(&self, document_number: &str) -> Option<Guest> {
        self.read()
            .values()
            .find(|g| g.document_number == document_number)
            .cloned()
    }

    pub fn list_all(&self) -> Vec<Guest> {
        self.read().values().cloned().collect()
    }

    /// Removal of an unknown id is a quiet no-op.
    pub fn remove(&self, id: GuestId) {
        self.write().remove(&id);
    }
}

impl GuestLookup for GuestDirectory {
    fn guest(&self, id: GuestId) -> Option<Guest> {
        self.find_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_events::InMemoryAuditSink;

    fn directory() -> GuestDirectory {
        GuestDirectory::new(Arc::new(InMemoryAuditSink::new()))
    }

    fn new_guest(document: &str, nationality: &str) -> NewGuest {
        NewGuest {
            document_kind: DocumentKind::CitizenCard,
            document_number: document.to_owned(),
            first_name: "Carlos".to_owned(),
            last_name: "Gómez".to_owned(),
            phone: "3109876543".to_owned(),
            nationality: nationality.to_owned(),
            email: String::new(),
        }
    }

    #[test]
    fn registration_assigns_sequential_ids() {
        let directory = directory();
        let first = directory.register(new_guest("2000001", "Colombia")).unwrap();
        let second = directory.register(new_guest("2000002", "Chile")).unwrap();

        assert_eq!(first.id_typed(), GuestId::new(1));
        assert_eq!(second.id_typed(), GuestId::new(2));
    }

    #[test]
    fn duplicate_document_is_a_conflict() {
        let directory = directory();
        directory.register(new_guest("2000001", "Colombia")).unwrap();

        let err = directory
            .register(new_guest("2000001", "Perú"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn nationality_must_be_letters_only() {
        let directory = directory();
        let err = directory
            .register(new_guest("2000001", "C0lombia"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn empty_email_is_accepted() {
        let directory = directory();
        let guest = directory.register(new_guest("2000001", "Colombia")).unwrap();
        assert_eq!(guest.email(), "");
    }

    #[test]
    fn lookup_resolves_registered_guests_only() {
        let directory = directory();
        let guest = directory.register(new_guest("2000001", "Colombia")).unwrap();

        assert_eq!(directory.guest(guest.id_typed()), Some(guest));
        assert!(directory.guest(GuestId::new(42)).is_none());
    }
}
