//! The comparison orchestrator
//!
//! Fans one route out to every configured service agent concurrently and
//! assembles the batch result after all of them settle. Agent failures
//! never abort the batch; only a malformed route is a hard error, raised
//! before any agent launches.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info};

use fare_browser::BrowserLauncher;
use fare_core::{ComparisonResult, PriceRecord, Route, SessionMap};

use crate::agent::ServiceAgent;
use crate::profile::ServiceProfile;

/// Compare fares across the configured services for one route.
///
/// Each agent runs in its own task with its own exclusive browser
/// session; there is no cross-task cancellation, so a hung agent is
/// bounded only by its own wait budgets. The records come back in
/// configuration order regardless of completion order, one per profile.
pub async fn compare(
    route: &Route,
    sessions: &SessionMap,
    profiles: Vec<ServiceProfile>,
    launcher: Arc<dyn BrowserLauncher>,
) -> fare_core::Result<ComparisonResult> {
    route.validate()?;

    info!("Starting price comparison across {} services", profiles.len());
    debug!("Route: {} -> {}", route.pickup, route.drop);

    let started = Instant::now();

    let mut meta = Vec::with_capacity(profiles.len());
    let mut handles = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let service = profile.service;
        meta.push((service, profile.currency));

        let launcher = Arc::clone(&launcher);
        let route = route.clone();
        let credential = sessions.get(&service).cloned();
        handles.push(tokio::spawn(async move {
            ServiceAgent::new(profile)
                .run(launcher.as_ref(), &route, credential.as_ref())
                .await
        }));
    }

    // Settle-all: wait for every task's terminal state. join_all yields
    // results in handle order, which is the configuration order.
    let outcomes = join_all(handles).await;

    let records: Vec<PriceRecord> = outcomes
        .into_iter()
        .zip(meta)
        .map(|(outcome, (service, currency))| match outcome {
            Ok(record) => record,
            Err(e) => {
                let error = crate::ScrapeError::Task(e.to_string());
                PriceRecord::failure(service, currency, error.to_string())
            }
        })
        .collect();

    let duration = (started.elapsed().as_secs_f64() * 100.0).round() / 100.0;
    let result = ComparisonResult::assemble(route.clone(), records, duration);

    info!(
        "Comparison completed in {:.2}s ({}/{} fares)",
        duration, result.stats.successful_services, result.stats.total_services
    );
    if let Some(cheapest) = &result.cheapest {
        info!(
            "Cheapest: {} at {} {}",
            cheapest.service,
            cheapest.currency,
            cheapest.amount.unwrap_or_default()
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use fare_core::ServiceKind;

    use crate::services::default_profiles;
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

    fn cards(label: &str, amount: i64) -> Vec<String> {
        vec![serde_json::json!([
            { "label": label, "price": format!("₹{}", amount), "eta": "4 min" },
        ])
        .to_string()]
    }

    #[tokio::test]
    async fn test_mixed_outcomes_keep_order_and_count() {
        let mut behaviors = HashMap::new();
        behaviors.insert("olacabs", MockBehavior::with_scans(cards("Auto", 120)));
        behaviors.insert("uber", MockBehavior::with_scans(cards("UberGo", 120)));
        // Rapido: both scans empty -> NoFareFound
        behaviors.insert(
            "rapido",
            MockBehavior::with_scans(vec!["[]".to_string(), "[]".to_string()]),
        );
        // Namma Yatri: both scans empty -> degraded success
        behaviors.insert(
            "nammayatri",
            MockBehavior::with_scans(vec!["[]".to_string(), "[]".to_string()]),
        );
        let launcher = Arc::new(MockLauncher::routed(behaviors));

        let result = compare(
            &route(),
            &SessionMap::new(),
            default_profiles(),
            Arc::clone(&launcher) as Arc<dyn BrowserLauncher>,
        )
        .await
        .unwrap();

        let services: Vec<ServiceKind> = result.records.iter().map(|r| r.service).collect();
        assert_eq!(services, ServiceKind::ALL.to_vec());
        assert_eq!(result.records.len(), 4);

        // Tie at 120: the first configured service wins.
        let cheapest = result.cheapest.as_ref().unwrap();
        assert_eq!(cheapest.service, ServiceKind::Ola);
        assert_eq!(cheapest.amount, Some(120));

        assert_eq!(result.stats.successful_services, 2);
        assert_eq!(result.stats.failed_services, 2);
        assert_eq!(result.stats.avg_amount, Some(120));
        assert_eq!(result.stats.amount_spread, Some(0));

        // Every agent acquired and released exactly one session.
        assert_eq!(launcher.close_counts(), vec![1, 1, 1, 1]);
    }

    #[tokio::test]
    async fn test_one_slow_agent_does_not_disturb_siblings() {
        let mut behaviors = HashMap::new();
        behaviors.insert(
            "olacabs",
            MockBehavior {
                delay: Duration::from_millis(10),
                ..MockBehavior::with_scans(cards("Auto", 90))
            },
        );
        behaviors.insert(
            "uber",
            MockBehavior {
                delay: Duration::from_millis(500),
                ..MockBehavior::with_scans(cards("UberGo", 150))
            },
        );
        behaviors.insert(
            "rapido",
            MockBehavior {
                delay: Duration::from_millis(30),
                ..MockBehavior::with_scans(cards("Bike", 60))
            },
        );
        behaviors.insert(
            "nammayatri",
            MockBehavior {
                delay: Duration::from_millis(20),
                ..MockBehavior::with_scans(cards("Auto", 70))
            },
        );
        let launcher = Arc::new(MockLauncher::routed(behaviors));

        let mut profiles = default_profiles();
        // Uber's navigation budget is far below its artificial delay.
        profiles[1].waits.navigation = Duration::from_millis(50);

        let result = compare(
            &route(),
            &SessionMap::new(),
            profiles,
            Arc::clone(&launcher) as Arc<dyn BrowserLauncher>,
        )
        .await
        .unwrap();

        assert_eq!(result.records.len(), 4);

        let uber = &result.records[1];
        assert!(!uber.success);
        assert!(uber.error.as_deref().unwrap_or("").contains("Timed out"));

        for record in [&result.records[0], &result.records[2], &result.records[3]] {
            assert!(record.success, "{} should be unaffected", record.service);
        }
        assert_eq!(result.cheapest.as_ref().unwrap().service, ServiceKind::Rapido);
        assert_eq!(launcher.close_counts(), vec![1, 1, 1, 1]);
    }

    #[tokio::test]
    async fn test_zero_successes_have_no_cheapest_and_no_amount_stats() {
        let launcher = Arc::new(MockLauncher::single(MockBehavior::failing_navigation()));

        let result = compare(
            &route(),
            &SessionMap::new(),
            default_profiles(),
            Arc::clone(&launcher) as Arc<dyn BrowserLauncher>,
        )
        .await
        .unwrap();

        assert_eq!(result.records.len(), 4);
        assert!(result.records.iter().all(|r| !r.success));
        assert!(result.cheapest.is_none());
        assert!(result.stats.min_amount.is_none());
        assert!(result.stats.max_amount.is_none());
        assert!(result.stats.avg_amount.is_none());
        assert!(result.stats.amount_spread.is_none());
        assert_eq!(result.stats.failed_services, 4);
    }

    #[tokio::test]
    async fn test_invalid_route_rejected_before_any_launch() {
        let launcher = Arc::new(MockLauncher::single(MockBehavior::with_scans(vec![])));

        let mut bad = route();
        bad.drop = String::new();

        let result = compare(
            &bad,
            &SessionMap::new(),
            default_profiles(),
            Arc::clone(&launcher) as Arc<dyn BrowserLauncher>,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(launcher.launch_count(), 0);
    }
}
