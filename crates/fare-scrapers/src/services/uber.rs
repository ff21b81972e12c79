//! Uber profile
//!
//! Drives the mobile web front end. The first ride card is normally
//! UberGo, the cheapest class; the UI lists options pre-sorted by price
//! and the selection relies on that ordering.

use fare_core::ServiceKind;

use crate::profile::{
    CardScan, EmptyOutcome, ScanKind, SelectionPolicy, ServiceProfile, WaitBudgets,
};

pub fn profile() -> ServiceProfile {
    ServiceProfile {
        service: ServiceKind::Uber,
        entry_url: "https://m.uber.com",
        currency: "INR",
        login_probe: Some(r#"document.querySelector('a[href*="login"]') !== null"#),
        pickup_selectors: &[
            r#"input[placeholder*="Pickup"]"#,
            r#"input[name*="pickup"]"#,
            r#"input[id*="pickup"]"#,
        ],
        drop_selectors: &[
            r#"input[placeholder*="Drop"]"#,
            r#"input[placeholder*="Where to"]"#,
            r#"input[name*="dropoff"]"#,
        ],
        suggestion_selectors: &[
            r#"[class*="suggestion"]"#,
            r#"[role="listbox"] [role="option"]"#,
            r#"ul[class*="results"] li"#,
        ],
        reveal_selectors: &[],
        fare_selectors: &[
            r#"[data-testid*="ride"]"#,
            r#"[class*="RideOption"]"#,
            r#"div[role="button"]"#,
        ],
        scans: vec![ScanKind::Cards(CardScan {
            container_selectors: &[
                r#"[data-testid*="ride"]"#,
                r#"[class*="RideOption"]"#,
                r#"[class*="vehicle-view"]"#,
            ],
            label_selectors: &[r#"[class*="title"]"#, r#"[class*="name"]"#, "h3", "h4"],
            price_selectors: &[
                r#"[class*="fare"]"#,
                r#"[class*="price"]"#,
                r#"[class*="amount"]"#,
            ],
            eta_selectors: &[r#"[class*="eta"]"#, r#"[class*="time"]"#, "small"],
            default_label: None,
        })],
        selection: SelectionPolicy::First,
        empty_outcome: EmptyOutcome::Fail,
        type_delay: None,
        waits: WaitBudgets::default(),
    }
}
