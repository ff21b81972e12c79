//! fare-core: Fare Gateway Core Library
//!
//! Shared data model, configuration, deep-link building and credential
//! storage for the fare comparison gateway.

pub mod config;
pub mod deeplink;
pub mod error;
pub mod model;
pub mod session;

pub use config::{ApiConfig, BrowserSettings, Config, StoreConfig};
pub use deeplink::{app_links, booking_links, BookingLinks, DeepLinks};
pub use error::{Error, Result};
pub use model::{
    CandidateFare, ComparisonResult, FareStats, PriceRecord, Route, ServiceKind,
};
pub use session::{
    CredentialManager, CredentialStore, ServiceCredential, SessionCookie, SessionMap,
    SessionProvider,
};
