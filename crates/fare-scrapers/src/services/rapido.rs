//! Rapido profile
//!
//! Bike taxis are Rapido's cheapest class, so the selection prefers a
//! "bike" label. Vehicle cards sometimes carry the vehicle name only as
//! an image alt text, and some page variants render prices outside any
//! card structure; the flat scan covers those.

use std::time::Duration;

use fare_core::ServiceKind;

use crate::profile::{
    CardScan, EmptyOutcome, ScanKind, SelectionPolicy, ServiceProfile, WaitBudgets,
};

pub fn profile() -> ServiceProfile {
    ServiceProfile {
        service: ServiceKind::Rapido,
        entry_url: "https://www.rapido.bike",
        currency: "INR",
        login_probe: None,
        pickup_selectors: &[
            r#"input[placeholder*="Pickup"]"#,
            r#"input[name*="pickup"]"#,
            r#"input[id*="source"]"#,
        ],
        drop_selectors: &[
            r#"input[placeholder*="Drop"]"#,
            r#"input[placeholder*="destination"]"#,
            r#"input[name*="drop"]"#,
        ],
        suggestion_selectors: &[
            r#"[class*="suggestion"]"#,
            r#"[class*="autocomplete"]"#,
            r#"ul li[class*="place"]"#,
        ],
        // Some variants hide fares behind a booking button.
        reveal_selectors: &[r#"button[class*="book"]"#],
        fare_selectors: &[
            r#"[class*="fare"]"#,
            r#"[class*="price"]"#,
            r#"[class*="amount"]"#,
        ],
        scans: vec![
            ScanKind::Cards(CardScan {
                container_selectors: &[
                    r#"[class*="ride-card"]"#,
                    r#"[class*="vehicle-card"]"#,
                    r#"div[class*="option"]"#,
                ],
                label_selectors: &[
                    r#"[class*="name"]"#,
                    r#"[class*="type"]"#,
                    r#"[class*="title"]"#,
                    "img[alt]",
                ],
                price_selectors: &[
                    r#"[class*="fare"]"#,
                    r#"[class*="price"]"#,
                    r#"[class*="amount"]"#,
                ],
                eta_selectors: &[r#"[class*="eta"]"#, r#"[class*="time"]"#],
                default_label: Some("Bike"),
            }),
            ScanKind::FlatElements {
                selectors: &[r#"[class*="price"]"#, r#"[class*="fare"]"#],
                label: "Rapido Bike",
            },
        ],
        selection: SelectionPolicy::PreferLabel("bike"),
        empty_outcome: EmptyOutcome::Fail,
        type_delay: Some(Duration::from_millis(100)),
        waits: WaitBudgets::default(),
    }
}
