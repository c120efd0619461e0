//! Clients: the party holding the reservation and receiving the bill.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posada_core::{ClientId, DomainError, DomainResult, Entity, SequenceGenerator};
use posada_events::AuditSink;

use crate::validate;

/// Identity document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Cédula de ciudadanía (CC).
    CitizenCard,
    /// Tarjeta de identidad (TI).
    IdentityCard,
    /// Cédula de extranjería (CE).
    ForeignerCard,
    Passport,
}

impl DocumentKind {
    pub fn code(&self) -> &'static str {
        match self {
            DocumentKind::CitizenCard => "CC",
            DocumentKind::IdentityCard => "TI",
            DocumentKind::ForeignerCard => "CE",
            DocumentKind::Passport => "PA",
        }
    }

    /// Whether numbers of this kind are strictly numeric.
    pub fn numeric(&self) -> bool {
        !matches!(self, DocumentKind::Passport)
    }
}

impl core::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Registration request for a new client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub document_kind: DocumentKind,
    pub document_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// Recorded for billing reference only; never charged.
    pub credit_card_number: Option<String>,
    pub category: Option<String>,
    pub preferences: Option<String>,
}

/// A registered client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    id: ClientId,
    document_kind: DocumentKind,
    document_number: String,
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    credit_card_number: Option<String>,
    category: Option<String>,
    preferences: Option<String>,
    registered_at: DateTime<Utc>,
}

impl Client {
    pub fn id_typed(&self) -> ClientId {
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

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn credit_card_number(&self) -> Option<&str> {
        self.credit_card_number.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn preferences(&self) -> Option<&str> {
        self.preferences.as_deref()
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Resolution seam consumed by the reservation core.
pub trait ClientLookup: Send + Sync {
    fn client(&self, id: ClientId) -> Option<Client>;
}

/// In-memory client directory.
pub struct ClientDirectory {
    clients: RwLock<BTreeMap<ClientId, Client>>,
    seq: SequenceGenerator,
    audit: Arc<dyn AuditSink>,
}

impl ClientDirectory {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            clients: RwLock::new(BTreeMap::new()),
            seq: SequenceGenerator::new(),
            audit,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<ClientId, Client>> {
        // Mutations are validated before applied; a recovered guard still
        // holds a consistent map.
        self.clients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<ClientId, Client>> {
        self.clients.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new client; duplicate document numbers are rejected.
    pub fn register(&self, new: NewClient) -> DomainResult<Client> {
        validate_fields(
            new.document_kind,
            &new.document_number,
            &new.first_name,
            &new.last_name,
            &new.phone,
            &new.email,
        )?;

        let mut clients = self.write();
        if clients
            .values()
            .any(|c| c.document_number == new.document_number)
        {
            return Err(DomainError::conflict(format!(
                "a client with document {} already exists",
                new.document_number
            )));
        }

        let id = ClientId::new(self.seq.next_id());
        let client = Client {
            id,
            document_kind: new.document_kind,
            document_number: new.document_number,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            email: new.email,
            credit_card_number: new.credit_card_number,
            category: new.category,
            preferences: new.preferences,
            registered_at: Utc::now(),
        };
        clients.insert(id, client.clone());
        drop(clients);

        self.audit.record(
            "CLIENT registered",
            "front desk",
            &format!(
                "{} - doc: {} {}",
                client.full_name(),
                client.document_kind.code(),
                client.document_number
            ),
        );
        Ok(client)
    }

    pub fn find_by_id(&self, id: ClientId) -> Option<Client> {
        self.read().get(&id).cloned()
    }

    pub fn find_by_document(&self, document_number: &str) -> Option<Client> {
        self.read()
            .values()
            .find(|c| c.document_number == document_number)
            .cloned()
    }

    pub fn list_all(&self) -> Vec<Client> {
        self.read().values().cloned().collect()
    }

    /// Whole-record replacement of an existing client.
    pub fn update(&self, client: Client) -> DomainResult<()> {
        validate_fields(
            client.document_kind,
            &client.document_number,
            &client.first_name,
            &client.last_name,
            &client.phone,
            &client.email,
        )?;

        let mut clients = self.write();
        if !clients.contains_key(&client.id) {
            return Err(DomainError::not_found(format!(
                "client {} not found",
                client.id
            )));
        }
        if clients
            .values()
            .any(|c| c.document_number == client.document_number && c.id != client.id)
        {
            return Err(DomainError::conflict(format!(
                "another client already holds document {}",
                client.document_number
            )));
        }
        clients.insert(client.id, client);
        Ok(())
    }

    /// Removal of an unknown id is a quiet no-op.
    pub fn remove(&self, id: ClientId) {
        self.write().remove(&id);
    }
}

impl ClientLookup for ClientDirectory {
    fn client(&self, id: ClientId) -> Option<Client> {
        self.find_by_id(id)
    }
}

fn validate_fields(
    document_kind: DocumentKind,
    document_number: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
    email: &str,
) -> DomainResult<()> {
    validate::name(first_name, "first name")?;
    validate::name(last_name, "last name")?;
    validate::document(document_number, document_kind)?;
    validate::phone(phone)?;
    validate::email(email)?;
    Ok(())
}
