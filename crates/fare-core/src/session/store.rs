//! Credential persistence using SQLite

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::model::ServiceKind;
use crate::session::{ServiceCredential, SessionCookie, SessionProvider};
use crate::{Error, Result};

/// SQLite-based credential store, keyed by (user_id, service)
pub struct CredentialStore {
    conn: Connection,
}

impl CredentialStore {
    /// Create a new store with the given database path
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS credentials (
                user_id TEXT NOT NULL,
                service TEXT NOT NULL,
                cookies TEXT NOT NULL,
                token TEXT,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, service)
            )",
            [],
        )?;
        Ok(())
    }

    /// Save or replace the credential for one (user, service) pair.
    ///
    /// Rejects credentials with no usable material: an entry with neither
    /// cookies nor a token could only make agents believe they are
    /// authenticated when they are not.
    pub fn save(
        &self,
        user_id: &str,
        service: ServiceKind,
        credential: &ServiceCredential,
    ) -> Result<()> {
        if !credential.has_material() {
            return Err(Error::Validation(
                "either cookies or token is required".to_string(),
            ));
        }
        let cookies_json = serde_json::to_string(&credential.cookies)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO credentials (user_id, service, cookies, token, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                service.as_str(),
                cookies_json,
                credential.token,
                credential.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Load the credential for one (user, service) pair
    pub fn credential_for(
        &self,
        user_id: &str,
        service: ServiceKind,
    ) -> Result<Option<ServiceCredential>> {
        let mut stmt = self.conn.prepare(
            "SELECT cookies, token, updated_at FROM credentials
             WHERE user_id = ?1 AND service = ?2",
        )?;

        let result = stmt.query_row(params![user_id, service.as_str()], |row| {
            let cookies_json: String = row.get(0)?;
            let cookies: Vec<SessionCookie> = serde_json::from_str(&cookies_json)
                .map_err(|_| rusqlite::Error::InvalidQuery)?;

            let token: Option<String> = row.get(1)?;

            let updated_at_str: String = row.get(2)?;
            let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
                .map_err(|_| rusqlite::Error::InvalidQuery)?
                .with_timezone(&Utc);

            Ok(ServiceCredential {
                cookies,
                token,
                updated_at,
            })
        });

        match result {
            Ok(credential) => Ok(Some(credential)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Delete one credential; returns whether an entry existed
    pub fn delete(&self, user_id: &str, service: ServiceKind) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM credentials WHERE user_id = ?1 AND service = ?2",
            params![user_id, service.as_str()],
        )?;
        Ok(affected > 0)
    }

    /// List the services a user has stored credentials for
    pub fn connected_services(&self, user_id: &str) -> Result<Vec<ServiceKind>> {
        let mut stmt = self.conn.prepare(
            "SELECT service FROM credentials WHERE user_id = ?1 ORDER BY service",
        )?;

        let names = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

        let mut services = Vec::new();
        for name in names {
            if let Ok(kind) = name?.parse::<ServiceKind>() {
                services.push(kind);
            }
        }
        Ok(services)
    }
}

impl SessionProvider for CredentialStore {
    fn credential_for(
        &self,
        user_id: &str,
        service: ServiceKind,
    ) -> Result<Option<ServiceCredential>> {
        CredentialStore::credential_for(self, user_id, service)
    }
}
