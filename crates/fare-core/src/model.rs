//! Comparison data model
//!
//! The record types exchanged between the scraping agents, the orchestrator
//! and the HTTP layer. Nothing here persists beyond one comparison batch.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The ride-hailing services the gateway knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Ola,
    Uber,
    Rapido,
    NammaYatri,
}

impl ServiceKind {
    /// All services in their configured comparison order
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Ola,
        ServiceKind::Uber,
        ServiceKind::Rapido,
        ServiceKind::NammaYatri,
    ];

    /// Stable lowercase wire name (also the storage key)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ola => "ola",
            Self::Uber => "uber",
            Self::Rapido => "rapido",
            Self::NammaYatri => "nammayatri",
        }
    }

    /// Human-facing service name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ola => "Ola",
            Self::Uber => "Uber",
            Self::Rapido => "Rapido",
            Self::NammaYatri => "Namma Yatri",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ServiceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ola" => Ok(Self::Ola),
            "uber" => Ok(Self::Uber),
            "rapido" => Ok(Self::Rapido),
            "nammayatri" | "namma yatri" => Ok(Self::NammaYatri),
            other => Err(Error::UnknownService(other.to_string())),
        }
    }
}

/// One pickup/drop route, immutable per comparison invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Pickup address text
    pub pickup: String,
    /// Drop address text
    pub drop: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub drop_lat: f64,
    pub drop_lng: f64,
}

impl Route {
    /// Reject malformed routes before any agent launches
    pub fn validate(&self) -> Result<()> {
        if self.pickup.trim().is_empty() {
            return Err(Error::Validation("pickup is required".to_string()));
        }
        if self.drop.trim().is_empty() {
            return Err(Error::Validation("drop is required".to_string()));
        }
        let coords = [
            ("pickup_lat", self.pickup_lat),
            ("pickup_lng", self.pickup_lng),
            ("drop_lat", self.drop_lat),
            ("drop_lng", self.drop_lng),
        ];
        for (name, value) in coords {
            if !value.is_finite() {
                return Err(Error::Validation(format!("{} must be a finite number", name)));
            }
        }
        Ok(())
    }
}

/// One extracted (label, amount) pair prior to service-specific selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFare {
    /// Ride option label as shown by the service (e.g. "Auto", "UberGo")
    pub label: String,
    /// Whole-unit fare amount
    pub amount: i64,
    pub currency: String,
    /// ETA text as displayed, when the card carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_display: Option<String>,
    /// The price text the amount was parsed from
    pub raw_text: String,
}

/// Terminal output of one agent invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub service: ServiceKind,
    pub success: bool,
    /// Selected fare amount; None for failures and for degraded successes
    pub amount: Option<i64>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    /// Every candidate the extraction step produced, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<CandidateFare>,
    /// Explanatory note for degraded successes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl PriceRecord {
    /// Record for a selected candidate
    pub fn success(
        service: ServiceKind,
        selected: &CandidateFare,
        candidates: Vec<CandidateFare>,
    ) -> Self {
        Self {
            service,
            success: true,
            amount: Some(selected.amount),
            currency: selected.currency.clone(),
            ride_type: Some(selected.label.clone()),
            eta: selected.eta_display.clone(),
            candidates,
            note: None,
            error: None,
            captured_at: Utc::now(),
        }
    }

    /// Degraded success: the service answered but exposes no visible price
    pub fn degraded(
        service: ServiceKind,
        currency: impl Into<String>,
        ride_type: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            service,
            success: true,
            amount: None,
            currency: currency.into(),
            ride_type: Some(ride_type.into()),
            eta: None,
            candidates: Vec::new(),
            note: Some(note.into()),
            error: None,
            captured_at: Utc::now(),
        }
    }

    /// Failed record carrying the captured agent error
    pub fn failure(
        service: ServiceKind,
        currency: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            service,
            success: false,
            amount: None,
            currency: currency.into(),
            ride_type: None,
            eta: None,
            candidates: Vec::new(),
            note: None,
            error: Some(error.into()),
            captured_at: Utc::now(),
        }
    }

    /// True when this record carries a comparable amount
    pub fn has_amount(&self) -> bool {
        self.success && self.amount.is_some()
    }
}

/// Aggregate statistics over one comparison batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareStats {
    pub total_services: usize,
    pub successful_services: usize,
    pub failed_services: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_spread: Option<i64>,
    pub duration_seconds: f64,
}

impl FareStats {
    /// Compute batch statistics from assembled records.
    ///
    /// Only records carrying an amount count as successful; a degraded
    /// success with no visible price lands on the failed side of the
    /// split, matching the cheapest-selection rule.
    pub fn from_records(records: &[PriceRecord], duration_seconds: f64) -> Self {
        let amounts: Vec<i64> = records
            .iter()
            .filter(|r| r.has_amount())
            .filter_map(|r| r.amount)
            .collect();

        let mut stats = Self {
            total_services: records.len(),
            successful_services: amounts.len(),
            failed_services: records.len() - amounts.len(),
            min_amount: None,
            max_amount: None,
            avg_amount: None,
            amount_spread: None,
            duration_seconds,
        };

        if !amounts.is_empty() {
            let min = amounts.iter().copied().min().unwrap_or(0);
            let max = amounts.iter().copied().max().unwrap_or(0);
            let sum: i64 = amounts.iter().sum();
            stats.min_amount = Some(min);
            stats.max_amount = Some(max);
            stats.avg_amount = Some(sum / amounts.len() as i64);
            stats.amount_spread = Some(max - min);
        }

        stats
    }
}

/// The combined outcome of one orchestrator invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub route: Route,
    /// One record per configured service, in configuration order
    pub records: Vec<PriceRecord>,
    /// The cheapest successful record; first-seen wins on ties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest: Option<PriceRecord>,
    pub stats: FareStats,
    pub generated_at: DateTime<Utc>,
}

impl ComparisonResult {
    /// Assemble the batch result: cheapest scan + statistics
    pub fn assemble(route: Route, records: Vec<PriceRecord>, duration_seconds: f64) -> Self {
        let stats = FareStats::from_records(&records, duration_seconds);
        let cheapest = cheapest_of(&records).cloned();
        Self {
            route,
            records,
            cheapest,
            stats,
            generated_at: Utc::now(),
        }
    }
}

/// Scan successful records in configured order keeping a running minimum;
/// a strict comparison makes the first-seen record win on ties.
pub fn cheapest_of(records: &[PriceRecord]) -> Option<&PriceRecord> {
    let mut cheapest: Option<&PriceRecord> = None;
    for record in records.iter().filter(|r| r.has_amount()) {
        match cheapest {
            Some(current) if record.amount >= current.amount => {}
            _ => cheapest = Some(record),
        }
    }
    cheapest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label: &str, amount: i64) -> CandidateFare {
        CandidateFare {
            label: label.to_string(),
            amount,
            currency: "INR".to_string(),
            eta_display: None,
            raw_text: format!("₹{}", amount),
        }
    }

    fn success(service: ServiceKind, amount: i64) -> PriceRecord {
        let c = candidate("Ride", amount);
        PriceRecord::success(service, &c, vec![c.clone()])
    }

    #[test]
    fn test_service_kind_round_trip() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.as_str().parse::<ServiceKind>().unwrap(), kind);
        }
        assert!("swiggy".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn test_route_validation() {
        let mut route = Route {
            pickup: "MG Road".to_string(),
            drop: "Airport".to_string(),
            pickup_lat: 12.97,
            pickup_lng: 77.59,
            drop_lat: 13.19,
            drop_lng: 77.70,
        };
        assert!(route.validate().is_ok());

        route.pickup = "  ".to_string();
        assert!(route.validate().is_err());

        route.pickup = "MG Road".to_string();
        route.drop_lat = f64::NAN;
        assert!(route.validate().is_err());
    }

    #[test]
    fn test_cheapest_first_seen_wins_on_tie() {
        let records = vec![
            success(ServiceKind::Ola, 120),
            success(ServiceKind::Uber, 120),
            success(ServiceKind::Rapido, 150),
        ];
        let cheapest = cheapest_of(&records).unwrap();
        assert_eq!(cheapest.service, ServiceKind::Ola);
        assert_eq!(cheapest.amount, Some(120));
    }

    #[test]
    fn test_cheapest_ignores_failures_and_degraded() {
        let records = vec![
            PriceRecord::failure(ServiceKind::Ola, "INR", "timed out"),
            PriceRecord::degraded(ServiceKind::NammaYatri, "INR", "Auto", "meter fare"),
            success(ServiceKind::Rapido, 80),
        ];
        assert_eq!(cheapest_of(&records).unwrap().service, ServiceKind::Rapido);
    }

    #[test]
    fn test_stats_floor_average_and_spread() {
        let records = vec![
            success(ServiceKind::Ola, 100),
            success(ServiceKind::Uber, 101),
            PriceRecord::failure(ServiceKind::Rapido, "INR", "no fare"),
        ];
        let stats = FareStats::from_records(&records, 1.5);
        assert_eq!(stats.total_services, 3);
        assert_eq!(stats.successful_services, 2);
        assert_eq!(stats.failed_services, 1);
        assert_eq!(stats.min_amount, Some(100));
        assert_eq!(stats.max_amount, Some(101));
        // 201 / 2 floors to 100
        assert_eq!(stats.avg_amount, Some(100));
        assert_eq!(stats.amount_spread, Some(1));
    }

    #[test]
    fn test_stats_absent_without_successes() {
        let records = vec![
            PriceRecord::failure(ServiceKind::Ola, "INR", "x"),
            PriceRecord::failure(ServiceKind::Uber, "INR", "y"),
        ];
        let stats = FareStats::from_records(&records, 0.2);
        assert_eq!(stats.successful_services, 0);
        assert_eq!(stats.failed_services, 2);
        assert!(stats.min_amount.is_none());
        assert!(stats.avg_amount.is_none());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("min_amount").is_none());
        assert!(json.get("avg_amount").is_none());
    }

    #[test]
    fn test_degraded_record_is_not_an_error() {
        let record =
            PriceRecord::degraded(ServiceKind::NammaYatri, "INR", "Auto", "meter fares apply");
        assert!(record.success);
        assert!(record.amount.is_none());
        assert!(record.error.is_none());
        assert!(record.note.as_deref().unwrap_or("").len() > 0);
    }
}
