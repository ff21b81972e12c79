//! Ola profile
//!
//! Ola's booking page lists ride categories as cards; auto rickshaws are
//! the cheapest class, so the selection prefers an "auto" label before
//! falling back to the first card. The page puts up a phone-number login
//! wall for anonymous visitors.

use fare_core::ServiceKind;

use crate::profile::{
    CardScan, EmptyOutcome, ScanKind, SelectionPolicy, ServiceProfile, WaitBudgets,
};

pub fn profile() -> ServiceProfile {
    ServiceProfile {
        service: ServiceKind::Ola,
        entry_url: "https://book.olacabs.com",
        currency: "INR",
        login_probe: Some(r#"document.querySelector('input[type="tel"]') !== null"#),
        pickup_selectors: &[r#"input[placeholder*="Pickup"]"#],
        drop_selectors: &[r#"input[placeholder*="Drop"]"#],
        suggestion_selectors: &[
            r#"[class*="suggestion"]"#,
            r#"[role="listbox"] [role="option"]"#,
            r#"[class*="autocomplete"]"#,
        ],
        reveal_selectors: &[],
        fare_selectors: &[r#"[class*="fare"]"#, r#"[class*="price"]"#],
        scans: vec![ScanKind::Cards(CardScan {
            container_selectors: &[
                r#"[class*="ride-option"]"#,
                r#"[class*="cab-card"]"#,
                r#"[class*="category"]"#,
            ],
            label_selectors: &[
                r#"[class*="name"]"#,
                r#"[class*="title"]"#,
                r#"[class*="category-name"]"#,
            ],
            price_selectors: &[
                r#"[class*="fare"]"#,
                r#"[class*="price"]"#,
                r#"[class*="amount"]"#,
            ],
            eta_selectors: &[r#"[class*="eta"]"#, r#"[class*="time"]"#],
            default_label: None,
        })],
        selection: SelectionPolicy::PreferLabel("auto"),
        empty_outcome: EmptyOutcome::Fail,
        type_delay: None,
        waits: WaitBudgets::default(),
    }
}
