//! Shared credential access

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::model::ServiceKind;
use crate::session::{session_map, CredentialStore, ServiceCredential, SessionMap, SessionProvider};
use crate::Result;

/// Thread-safe handle over the credential store.
///
/// The store owns a single SQLite connection, so concurrent users go
/// through a mutex. Lookups are short and the store is off the scraping
/// hot path (it is read once per batch, before fan-out).
#[derive(Clone)]
pub struct CredentialManager {
    store: Arc<Mutex<CredentialStore>>,
}

impl CredentialManager {
    /// Create a manager backed by a database file
    pub fn new(db_path: &str) -> Result<Self> {
        let store = CredentialStore::new(db_path)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Create an in-memory manager (for testing)
    pub fn in_memory() -> Result<Self> {
        let store = CredentialStore::in_memory()?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    /// Save or replace one credential
    pub fn save(
        &self,
        user_id: &str,
        service: ServiceKind,
        credential: &ServiceCredential,
    ) -> Result<()> {
        self.store.lock().unwrap().save(user_id, service, credential)?;
        info!("Credential saved for user {}, service: {}", user_id, service);
        Ok(())
    }

    /// Delete one credential; returns whether an entry existed
    pub fn delete(&self, user_id: &str, service: ServiceKind) -> Result<bool> {
        let deleted = self.store.lock().unwrap().delete(user_id, service)?;
        if deleted {
            info!("Credential deleted for user {}, service: {}", user_id, service);
        }
        Ok(deleted)
    }

    /// Services a user has stored credentials for
    pub fn connected_services(&self, user_id: &str) -> Result<Vec<ServiceKind>> {
        self.store.lock().unwrap().connected_services(user_id)
    }

    /// Build the read-only credential map for one comparison batch
    pub fn session_map(&self, user_id: &str, services: &[ServiceKind]) -> Result<SessionMap> {
        let store = self.store.lock().unwrap();
        session_map(&*store, user_id, services)
    }
}

impl SessionProvider for CredentialManager {
    fn credential_for(
        &self,
        user_id: &str,
        service: ServiceKind,
    ) -> Result<Option<ServiceCredential>> {
        self.store.lock().unwrap().credential_for(user_id, service)
    }
}
