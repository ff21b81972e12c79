//! Per-user service credentials
//!
//! Callers capture cookies/tokens out of band (the gateway never runs a
//! login flow) and store them here, keyed by user and service. Agents get
//! read-only copies for the duration of one comparison.

mod manager;
mod store;
mod types;

pub use manager::CredentialManager;
pub use store::CredentialStore;
pub use types::{ServiceCredential, SessionCookie, SessionMap};

use crate::model::ServiceKind;
use crate::Result;

/// Read-only per-user, per-service credential lookup
pub trait SessionProvider {
    /// Returns the stored credential for `(user_id, service)`, if any
    fn credential_for(&self, user_id: &str, service: ServiceKind) -> Result<Option<ServiceCredential>>;
}

/// Collect the credential map one comparison batch reads from.
///
/// Services without a stored credential are simply absent; agents treat
/// that as "scrape anonymously".
pub fn session_map<P: SessionProvider + ?Sized>(
    provider: &P,
    user_id: &str,
    services: &[ServiceKind],
) -> Result<SessionMap> {
    let mut map = SessionMap::new();
    for &service in services {
        if let Some(credential) = provider.credential_for(user_id, service)? {
            map.insert(service, credential);
        }
    }
    Ok(map)
}
