//! Namma Yatri profile
//!
//! An open network for auto rickshaws with government-mandated meter
//! fares. The web UI often shows no upfront price at all; that is a
//! degraded success (the ride exists, the meter decides), not an
//! extraction failure.

use std::time::Duration;

use fare_core::ServiceKind;

use crate::profile::{EmptyOutcome, ScanKind, SelectionPolicy, ServiceProfile, WaitBudgets};

pub fn profile() -> ServiceProfile {
    ServiceProfile {
        service: ServiceKind::NammaYatri,
        entry_url: "https://nammayatri.in/open",
        currency: "INR",
        login_probe: None,
        pickup_selectors: &[
            r#"input[placeholder*="Pickup"]"#,
            r#"input[placeholder*="pickup"]"#,
            r#"input[id*="source"]"#,
        ],
        drop_selectors: &[
            r#"input[placeholder*="Drop"]"#,
            r#"input[placeholder*="destination"]"#,
            r#"input[placeholder*="Where to"]"#,
        ],
        suggestion_selectors: &[
            r#"[class*="suggestion"]"#,
            r#"[class*="autocomplete"]"#,
            r#"[role="listbox"] [role="option"]"#,
        ],
        reveal_selectors: &[],
        fare_selectors: &[
            r#"[class*="fare"]"#,
            r#"[class*="price"]"#,
            r#"[class*="estimate"]"#,
        ],
        scans: vec![
            ScanKind::FlatElements {
                selectors: &[
                    r#"[class*="fare"]"#,
                    r#"[class*="price"]"#,
                    r#"[class*="estimate"]"#,
                    r#"[class*="amount"]"#,
                ],
                label: "Auto",
            },
            ScanKind::BodyText {
                min: 10,
                max: 5000,
                label: "Auto",
            },
        ],
        selection: SelectionPolicy::First,
        empty_outcome: EmptyOutcome::DegradedSuccess {
            ride_type: "Auto",
            note: "Namma Yatri uses government-mandated meter fares",
        },
        type_delay: Some(Duration::from_millis(100)),
        waits: WaitBudgets::default(),
    }
}
