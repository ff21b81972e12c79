//! Credential types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ServiceKind;

/// One browser cookie captured from a logged-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Stored authentication material for one (user, service) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCredential {
    #[serde(default)]
    pub cookies: Vec<SessionCookie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceCredential {
    /// Create a credential; at least one of cookies/token must be present
    /// for the store to accept it.
    pub fn new(cookies: Vec<SessionCookie>, token: Option<String>) -> Self {
        Self {
            cookies,
            token,
            updated_at: Utc::now(),
        }
    }

    /// True when the credential carries any usable material
    pub fn has_material(&self) -> bool {
        !self.cookies.is_empty() || self.token.is_some()
    }
}

/// Per-service credential map handed to one comparison batch
pub type SessionMap = HashMap<ServiceKind, ServiceCredential>;
