//! Per-service agent configuration
//!
//! The four agents share one extraction loop and differ only in what is
//! declared here: entry page, selector lists, scan plans, waits and the
//! selection policy applied to extracted candidates.

use std::time::Duration;

use fare_core::{CandidateFare, ServiceKind};

/// How candidates are pulled out of the page. Plans run in order; the
/// first one that yields candidates wins.
#[derive(Debug, Clone)]
pub enum ScanKind {
    /// Ride-option cards with label/price/eta children
    Cards(CardScan),
    /// Flat scan over price-bearing elements, all under one fixed label
    FlatElements {
        selectors: &'static [&'static str],
        label: &'static str,
    },
    /// Last resort: regex over the whole body text, bounded to plausible
    /// fares (exclusive on both ends)
    BodyText {
        min: i64,
        max: i64,
        label: &'static str,
    },
}

/// Card-scan selector sets
#[derive(Debug, Clone)]
pub struct CardScan {
    pub container_selectors: &'static [&'static str],
    pub label_selectors: &'static [&'static str],
    pub price_selectors: &'static [&'static str],
    pub eta_selectors: &'static [&'static str],
    /// Label applied to cards without a name element; None skips them
    pub default_label: Option<&'static str>,
}

/// Which extracted candidate becomes the record
#[derive(Debug, Clone)]
pub enum SelectionPolicy {
    /// First candidate in document order. The source UIs list options
    /// pre-sorted by price; kept as documented policy.
    First,
    /// Prefer a label containing the needle (case-insensitive), falling
    /// back to the first candidate
    PreferLabel(&'static str),
}

impl SelectionPolicy {
    pub fn select<'a>(&self, candidates: &'a [CandidateFare]) -> Option<&'a CandidateFare> {
        match self {
            Self::First => candidates.first(),
            Self::PreferLabel(needle) => {
                let needle = needle.to_ascii_lowercase();
                candidates
                    .iter()
                    .find(|c| c.label.to_lowercase().contains(&needle))
                    .or_else(|| candidates.first())
            }
        }
    }
}

/// What an empty extraction means for this service
#[derive(Debug, Clone)]
pub enum EmptyOutcome {
    /// No plausible candidate is an agent failure
    Fail,
    /// The service answered but shows no price up front; report a
    /// degraded success with an explanatory note
    DegradedSuccess {
        ride_type: &'static str,
        note: &'static str,
    },
}

/// Wait budgets for the agent's suspending steps. Exceeding any of them
/// fails the agent with a timeout; none is retried.
#[derive(Debug, Clone)]
pub struct WaitBudgets {
    /// Entry page navigation
    pub navigation: Duration,
    /// Pickup field appearance
    pub pickup_field: Duration,
    /// Drop field appearance
    pub drop_field: Duration,
    /// Suggestion list appearance after typing; a miss falls through to
    /// the blind confirm instead of failing
    pub suggestion: Duration,
    /// Fare-bearing surface appearance
    pub fare_surface: Duration,
}

impl Default for WaitBudgets {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            pickup_field: Duration::from_secs(10),
            drop_field: Duration::from_secs(5),
            suggestion: Duration::from_millis(1500),
            fare_surface: Duration::from_secs(15),
        }
    }
}

/// Everything one agent invocation needs to know about its service
#[derive(Debug, Clone)]
pub struct ServiceProfile {
    pub service: ServiceKind,
    pub entry_url: &'static str,
    pub currency: &'static str,
    /// In-page probe returning true when the page demands a login.
    /// Checked only when the caller supplied no credential.
    pub login_probe: Option<&'static str>,
    pub pickup_selectors: &'static [&'static str],
    pub drop_selectors: &'static [&'static str],
    /// Autocomplete surfaces polled after typing
    pub suggestion_selectors: &'static [&'static str],
    /// Optional control clicked before extraction; absence is ignored
    pub reveal_selectors: &'static [&'static str],
    /// Fare-bearing surfaces waited on before extraction
    pub fare_selectors: &'static [&'static str],
    /// Scan plans, tried in order
    pub scans: Vec<ScanKind>,
    pub selection: SelectionPolicy,
    pub empty_outcome: EmptyOutcome,
    /// Per-character typing delay for services that debounce input
    pub type_delay: Option<Duration>,
    pub waits: WaitBudgets,
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

    #[test]
    fn test_prefer_label_finds_case_insensitive_match() {
        let candidates = vec![
            candidate("Mini", 150),
            candidate("Prime Auto", 90),
            candidate("Sedan", 200),
        ];
        let policy = SelectionPolicy::PreferLabel("auto");
        assert_eq!(policy.select(&candidates).unwrap().amount, 90);
    }

    #[test]
    fn test_prefer_label_falls_back_to_first() {
        let candidates = vec![candidate("Mini", 150), candidate("Sedan", 200)];
        let policy = SelectionPolicy::PreferLabel("auto");
        assert_eq!(policy.select(&candidates).unwrap().amount, 150);
    }

    #[test]
    fn test_first_policy() {
        let candidates = vec![candidate("UberGo", 180), candidate("UberXL", 320)];
        assert_eq!(SelectionPolicy::First.select(&candidates).unwrap().amount, 180);
        assert!(SelectionPolicy::First.select(&[]).is_none());
    }
}
