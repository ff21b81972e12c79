//! The shared scraping agent
//!
//! One generic agent drives every service: the per-service differences
//! live entirely in the [`ServiceProfile`]. An invocation launches its
//! own browser session, walks the navigate, locate, type and extract
//! sequence, and always terminates in a [`PriceRecord`]: agent-level
//! errors are captured, never raised.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use fare_browser::{BrowserError, BrowserLauncher, BrowserSession, NavWait};
use fare_core::{PriceRecord, Route, ServiceCredential, ServiceKind};

use crate::extract::{candidates_from, click_script, scan_script};
use crate::profile::{EmptyOutcome, ServiceProfile};
use crate::{Result, ScrapeError};

/// One service-specific scraping worker
pub struct ServiceAgent {
    profile: ServiceProfile,
}

impl ServiceAgent {
    pub fn new(profile: ServiceProfile) -> Self {
        Self { profile }
    }

    pub fn service(&self) -> ServiceKind {
        self.profile.service
    }

    /// Run one invocation against a fresh session.
    ///
    /// Never returns an error: every failure is converted into a failed
    /// record at this boundary. The session acquired here is released
    /// exactly once on every exit path.
    pub async fn run(
        &self,
        launcher: &dyn BrowserLauncher,
        route: &Route,
        credential: Option<&ServiceCredential>,
    ) -> PriceRecord {
        let service = self.profile.service;
        info!("Starting {} agent", service);

        let session = match launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                error!("{} agent could not launch a session: {}", service, e);
                return PriceRecord::failure(service, self.profile.currency, e.to_string());
            }
        };

        let outcome = self.drive(session.as_ref(), route, credential).await;

        if let Err(e) = session.close().await {
            warn!("{} agent failed to close its session: {}", service, e);
        }

        match outcome {
            Ok(record) => {
                info!("{} agent completed successfully", service);
                record
            }
            Err(e) => {
                error!("{} agent error: {}", service, e);
                PriceRecord::failure(service, self.profile.currency, e.to_string())
            }
        }
    }

    /// The fallible part of the invocation; the caller owns session
    /// release regardless of how this returns.
    async fn drive(
        &self,
        session: &dyn BrowserSession,
        route: &Route,
        credential: Option<&ServiceCredential>,
    ) -> Result<PriceRecord> {
        let profile = &self.profile;
        let service = profile.service;
        let waits = &profile.waits;

        if let Some(credential) = credential {
            if !credential.cookies.is_empty() {
                session.set_cookies(&credential.cookies).await?;
            }
        }

        bounded(
            "entry page",
            waits.navigation,
            session.navigate(profile.entry_url, NavWait::NetworkIdle, waits.navigation),
        )
        .await?;

        if credential.is_none() {
            if let Some(probe) = profile.login_probe {
                let wall = session.evaluate(probe).await?;
                if wall.as_bool().unwrap_or(false) {
                    return Err(ScrapeError::SessionRequired(service));
                }
            }
        }

        let pickup_field = bounded(
            "pickup field",
            waits.pickup_field,
            session.find_first(profile.pickup_selectors, waits.pickup_field),
        )
        .await?;
        session
            .type_into(&pickup_field, &route.pickup, profile.type_delay)
            .await?;
        self.confirm_first_suggestion(session).await?;

        let drop_field = bounded(
            "drop field",
            waits.drop_field,
            session.find_first(profile.drop_selectors, waits.drop_field),
        )
        .await?;
        session
            .type_into(&drop_field, &route.drop, profile.type_delay)
            .await?;
        self.confirm_first_suggestion(session).await?;

        if !profile.reveal_selectors.is_empty() {
            let clicked = session
                .evaluate(&click_script(profile.reveal_selectors))
                .await?;
            debug!(
                "{} reveal control clicked: {}",
                service,
                clicked.as_bool().unwrap_or(false)
            );
        }

        bounded(
            "fare estimates",
            waits.fare_surface,
            session.wait_for_any(profile.fare_selectors, waits.fare_surface),
        )
        .await?;

        let mut candidates = Vec::new();
        for scan in &profile.scans {
            let value = session.evaluate(&scan_script(scan)).await?;
            candidates = candidates_from(&value, scan, profile.currency)?;
            if !candidates.is_empty() {
                break;
            }
        }

        if candidates.is_empty() {
            return match &profile.empty_outcome {
                EmptyOutcome::Fail => Err(ScrapeError::NoFareFound(service)),
                EmptyOutcome::DegradedSuccess { ride_type, note } => {
                    warn!("{}: no visible price, reporting degraded success", service);
                    Ok(PriceRecord::degraded(
                        service,
                        profile.currency,
                        *ride_type,
                        *note,
                    ))
                }
            };
        }

        debug!("{} extracted {} candidates", service, candidates.len());

        match profile.selection.select(&candidates) {
            Some(selected) => Ok(PriceRecord::success(service, selected, candidates.clone())),
            None => Err(ScrapeError::NoFareFound(service)),
        }
    }

    /// Confirm the first autocomplete suggestion: wait for the suggestion
    /// surface to show up, then ArrowDown + Enter. The confirm is a
    /// heuristic; a suggestion poll miss falls through to the blind key
    /// sequence rather than failing the agent.
    async fn confirm_first_suggestion(&self, session: &dyn BrowserSession) -> Result<()> {
        let profile = &self.profile;
        if !profile.suggestion_selectors.is_empty() {
            let wait = session.wait_for_any(profile.suggestion_selectors, profile.waits.suggestion);
            match tokio::time::timeout(profile.waits.suggestion, wait).await {
                Ok(Ok(_)) => {}
                Ok(Err(_)) | Err(_) => {
                    debug!(
                        "{}: no suggestion surface within budget, confirming blind",
                        profile.service
                    );
                }
            }
        }
        session.press_key("ArrowDown").await?;
        session.press_key("Enter").await?;
        Ok(())
    }
}

/// Bound one suspending step by its budget. Both the session's own
/// timeout error and an elapsed outer budget map to the same taxonomy.
async fn bounded<T, F>(what: &str, budget: Duration, step: F) -> Result<T>
where
    F: Future<Output = fare_browser::Result<T>>,
{
    match tokio::time::timeout(budget, step).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(BrowserError::Timeout(_))) | Err(_) => Err(ScrapeError::Timeout {
            what: what.to_string(),
            budget,
        }),
        Ok(Err(BrowserError::ElementNotFound(msg))) => Err(ScrapeError::ElementNotFound(msg)),
        Ok(Err(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use fare_core::SessionCookie;

    use crate::services;
    use crate::testing::{MockBehavior, MockLauncher};

    fn route() -> Route {
        Route {
            pickup: "MG Road, Bengaluru".to_string(),
            drop: "Kempegowda Airport".to_string(),
            pickup_lat: 12.975,
            pickup_lng: 77.606,
            drop_lat: 13.199,
            drop_lng: 77.706,
        }
    }

    fn card_payload() -> String {
        serde_json::json!([
            { "label": "Mini", "price": "₹149", "eta": "3 min" },
            { "label": "Auto", "price": "₹92", "eta": "2 min" },
        ])
        .to_string()
    }

    #[tokio::test]
    async fn test_agent_selects_preferred_label() {
        let launcher = MockLauncher::single(MockBehavior::with_scans(vec![card_payload()]));
        let agent = ServiceAgent::new(services::ola::profile());

        let record = agent.run(&launcher, &route(), None).await;
        assert!(record.success);
        assert_eq!(record.amount, Some(92));
        assert_eq!(record.ride_type.as_deref(), Some("Auto"));
        assert_eq!(record.candidates.len(), 2);
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_login_wall_without_credential_fails() {
        let behavior = MockBehavior {
            login_wall: true,
            ..MockBehavior::with_scans(vec![card_payload()])
        };
        let launcher = MockLauncher::single(behavior);
        let agent = ServiceAgent::new(services::ola::profile());

        let record = agent.run(&launcher, &route(), None).await;
        assert!(!record.success);
        assert!(record.error.as_deref().unwrap_or("").contains("Login required"));
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_credential_seeds_cookies_and_skips_probe() {
        let behavior = MockBehavior {
            login_wall: true,
            ..MockBehavior::with_scans(vec![card_payload()])
        };
        let launcher = MockLauncher::single(behavior);
        let agent = ServiceAgent::new(services::ola::profile());

        let credential = ServiceCredential::new(
            vec![SessionCookie {
                name: "sid".to_string(),
                value: "abc".to_string(),
                domain: Some(".olacabs.com".to_string()),
                path: None,
            }],
            None,
        );

        let record = agent.run(&launcher, &route(), Some(&credential)).await;
        assert!(record.success);
        assert_eq!(launcher.sessions()[0].cookies_seeded.load(Ordering::SeqCst), 1);
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_navigation_timeout_is_reported_and_session_closed() {
        let behavior = MockBehavior {
            delay: Duration::from_millis(200),
            ..MockBehavior::with_scans(vec![card_payload()])
        };
        let launcher = MockLauncher::single(behavior);

        let mut profile = services::uber::profile();
        profile.waits.navigation = Duration::from_millis(20);
        let agent = ServiceAgent::new(profile);

        let record = agent.run(&launcher, &route(), None).await;
        assert!(!record.success);
        assert!(record.error.as_deref().unwrap_or("").contains("Timed out"));
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_missing_field_fails_with_timeout() {
        let behavior = MockBehavior {
            missing_fields: true,
            ..MockBehavior::with_scans(vec![card_payload()])
        };
        let launcher = MockLauncher::single(behavior);
        let mut profile = services::uber::profile();
        profile.waits.pickup_field = Duration::from_millis(20);
        let agent = ServiceAgent::new(profile);

        let record = agent.run(&launcher, &route(), None).await;
        assert!(!record.success);
        assert!(record
            .error
            .as_deref()
            .unwrap_or("")
            .contains("pickup field"));
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_empty_extraction_fails_for_strict_services() {
        let launcher = MockLauncher::single(MockBehavior::with_scans(vec![
            "[]".to_string(),
            "[]".to_string(),
        ]));
        let agent = ServiceAgent::new(services::rapido::profile());

        let record = agent.run(&launcher, &route(), None).await;
        assert!(!record.success);
        assert!(record
            .error
            .as_deref()
            .unwrap_or("")
            .contains("Could not extract price information"));
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_namma_yatri_empty_extraction_is_degraded_success() {
        let launcher = MockLauncher::single(MockBehavior::with_scans(vec![
            "[]".to_string(),
            "[]".to_string(),
        ]));
        let agent = ServiceAgent::new(services::nammayatri::profile());

        let record = agent.run(&launcher, &route(), None).await;
        assert!(record.success);
        assert!(record.amount.is_none());
        assert!(record.error.is_none());
        assert!(!record.note.as_deref().unwrap_or("").is_empty());
        assert_eq!(launcher.close_counts(), vec![1]);
    }

    #[tokio::test]
    async fn test_fallback_scan_used_when_cards_empty() {
        let flat_payload = serde_json::json!([
            { "label": null, "price": "₹45", "eta": null },
        ])
        .to_string();
        let launcher = MockLauncher::single(MockBehavior::with_scans(vec![
            "[]".to_string(),
            flat_payload,
        ]));
        let agent = ServiceAgent::new(services::rapido::profile());

        let record = agent.run(&launcher, &route(), None).await;
        assert!(record.success);
        assert_eq!(record.amount, Some(45));
        assert_eq!(record.ride_type.as_deref(), Some("Rapido Bike"));
    }

    #[tokio::test]
    async fn test_failed_launch_yields_failed_record() {
        let launcher = MockLauncher::failing();
        let agent = ServiceAgent::new(services::uber::profile());

        let record = agent.run(&launcher, &route(), None).await;
        assert!(!record.success);
        assert!(record.error.is_some());
        // No session was ever acquired, so nothing to close.
        assert!(launcher.close_counts().is_empty());
    }
}
