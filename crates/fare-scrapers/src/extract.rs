//! Fare extraction helpers
//!
//! The in-page scan scripts are generated from a profile's selector lists
//! and always return `JSON.stringify(...)` so results cross the devtools
//! boundary as plain strings. Amount parsing happens on this side: the
//! first run of digits after an optional currency glyph.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use fare_core::CandidateFare;

use crate::profile::{CardScan, ScanKind};
use crate::Result;

/// Fares at or below this are parsing artifacts (ratings, counts, "₹0
/// booking fee" chips), not ride prices.
pub const MIN_PLAUSIBLE_AMOUNT: i64 = 10;

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"₹?\s*(\d+)").expect("static regex"))
}

/// Parse the first digit run out of a price text, e.g. `"₹ 123"` → 123.
/// Returns None when the text carries no digits at all.
pub fn parse_amount(text: &str) -> Option<i64> {
    amount_re()
        .captures(text)?
        .get(1)?
        .as_str()
        .parse::<i64>()
        .ok()
}

/// Quote a selector list into one JS string literal (comma-joined, so the
/// page matches any of the patterns)
fn js_selector(selectors: &[&str]) -> String {
    serde_json::to_string(&selectors.join(", ")).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script clicking the first element matching any selector; evaluates to
/// whether anything was clicked
pub fn click_script(selectors: &[&str]) -> String {
    format!(
        "(() => {{ const el = document.querySelector({sel}); if (el) {{ el.click(); return true; }} return false; }})()",
        sel = js_selector(selectors),
    )
}

/// Script scanning ride-option cards for (label, price, eta) triples
pub fn card_scan_script(scan: &CardScan) -> String {
    format!(
        concat!(
            "JSON.stringify((() => {{\n",
            "  const out = [];\n",
            "  document.querySelectorAll({containers}).forEach((el) => {{\n",
            "    const nameEl = el.querySelector({labels});\n",
            "    const priceEl = el.querySelector({prices});\n",
            "    const etaEl = el.querySelector({etas});\n",
            "    if (!priceEl) return;\n",
            "    const label = nameEl ? (nameEl.textContent || nameEl.getAttribute('alt') || '').trim() : null;\n",
            "    out.push({{ label: label || null, price: priceEl.textContent.trim(), eta: etaEl ? etaEl.textContent.trim() : null }});\n",
            "  }});\n",
            "  return out;\n",
            "}})())",
        ),
        containers = js_selector(scan.container_selectors),
        labels = js_selector(scan.label_selectors),
        prices = js_selector(scan.price_selectors),
        etas = js_selector(scan.eta_selectors),
    )
}

/// Script scanning flat price-bearing elements
pub fn flat_scan_script(selectors: &[&str]) -> String {
    format!(
        "JSON.stringify(Array.from(document.querySelectorAll({sel})).map((el) => ({{ label: null, price: el.textContent.trim(), eta: null }})))",
        sel = js_selector(selectors),
    )
}

/// Script collecting every `₹ <digits>` run in the page text
pub fn body_text_script() -> String {
    "JSON.stringify(document.body.textContent.match(/₹\\s*\\d+/g) || [])".to_string()
}

/// The script for one scan plan
pub fn scan_script(scan: &ScanKind) -> String {
    match scan {
        ScanKind::Cards(cards) => card_scan_script(cards),
        ScanKind::FlatElements { selectors, .. } => flat_scan_script(selectors),
        ScanKind::BodyText { .. } => body_text_script(),
    }
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    label: Option<String>,
    price: String,
    eta: Option<String>,
}

/// Turn one scan's evaluated value into candidates, in document order.
///
/// A non-string or unparsable value counts as a scan miss (empty list)
/// rather than an agent failure: the fallback plans exist for exactly
/// that case.
pub fn candidates_from(
    value: &serde_json::Value,
    scan: &ScanKind,
    currency: &str,
) -> Result<Vec<CandidateFare>> {
    let Some(payload) = value.as_str() else {
        return Ok(Vec::new());
    };

    let candidates = match scan {
        ScanKind::Cards(cards) => {
            let raw: Vec<RawCandidate> = match serde_json::from_str(payload) {
                Ok(raw) => raw,
                Err(_) => return Ok(Vec::new()),
            };
            raw.into_iter()
                .filter_map(|r| {
                    let label = match r.label.filter(|l| !l.trim().is_empty()) {
                        Some(label) => label.trim().to_string(),
                        None => cards.default_label?.to_string(),
                    };
                    let amount = parse_amount(&r.price)?;
                    if amount <= MIN_PLAUSIBLE_AMOUNT {
                        return None;
                    }
                    Some(CandidateFare {
                        label,
                        amount,
                        currency: currency.to_string(),
                        eta_display: r.eta.filter(|e| !e.trim().is_empty()),
                        raw_text: r.price,
                    })
                })
                .collect()
        }
        ScanKind::FlatElements { label, .. } => {
            let raw: Vec<RawCandidate> = match serde_json::from_str(payload) {
                Ok(raw) => raw,
                Err(_) => return Ok(Vec::new()),
            };
            raw.into_iter()
                .filter_map(|r| {
                    let amount = parse_amount(&r.price)?;
                    if amount <= MIN_PLAUSIBLE_AMOUNT {
                        return None;
                    }
                    Some(CandidateFare {
                        label: label.to_string(),
                        amount,
                        currency: currency.to_string(),
                        eta_display: None,
                        raw_text: r.price,
                    })
                })
                .collect()
        }
        ScanKind::BodyText { min, max, label } => {
            let raw: Vec<String> = match serde_json::from_str(payload) {
                Ok(raw) => raw,
                Err(_) => return Ok(Vec::new()),
            };
            raw.into_iter()
                .filter_map(|text| {
                    let amount = parse_amount(&text)?;
                    if amount <= *min || amount >= *max {
                        return None;
                    }
                    Some(CandidateFare {
                        label: label.to_string(),
                        amount,
                        currency: currency.to_string(),
                        eta_display: None,
                        raw_text: text,
                    })
                })
                .collect()
        }
    };

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("₹123"), Some(123));
        assert_eq!(parse_amount("₹ 45"), Some(45));
        assert_eq!(parse_amount("12"), Some(12));
        assert_eq!(parse_amount("Rs. 230 for 2 seats"), Some(230));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_card_candidates_respect_threshold() {
        let scan = ScanKind::Cards(CardScan {
            container_selectors: &["[class*=\"ride-option\"]"],
            label_selectors: &["[class*=\"name\"]"],
            price_selectors: &["[class*=\"fare\"]"],
            eta_selectors: &["[class*=\"eta\"]"],
            default_label: None,
        });
        let payload = json!([
            { "label": "Auto", "price": "₹5", "eta": null },
            { "label": "Mini", "price": "₹149", "eta": "3 min" },
            { "label": "Prime", "price": "no cabs", "eta": null },
        ])
        .to_string();

        let candidates =
            candidates_from(&serde_json::Value::String(payload), &scan, "INR").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "Mini");
        assert_eq!(candidates[0].amount, 149);
        assert_eq!(candidates[0].eta_display.as_deref(), Some("3 min"));
    }

    #[test]
    fn test_card_without_label_uses_default_or_skips() {
        let payload = json!([{ "label": null, "price": "₹80", "eta": null }]).to_string();
        let value = serde_json::Value::String(payload);

        let strict = ScanKind::Cards(CardScan {
            container_selectors: &["div"],
            label_selectors: &["span"],
            price_selectors: &["b"],
            eta_selectors: &["i"],
            default_label: None,
        });
        assert!(candidates_from(&value, &strict, "INR").unwrap().is_empty());

        let defaulted = ScanKind::Cards(CardScan {
            container_selectors: &["div"],
            label_selectors: &["span"],
            price_selectors: &["b"],
            eta_selectors: &["i"],
            default_label: Some("Bike"),
        });
        let candidates = candidates_from(&value, &defaulted, "INR").unwrap();
        assert_eq!(candidates[0].label, "Bike");
    }

    #[test]
    fn test_body_text_bounds_are_exclusive() {
        let scan = ScanKind::BodyText {
            min: 10,
            max: 5000,
            label: "Auto",
        };
        let payload = json!(["₹10", "₹11", "₹4999", "₹5000"]).to_string();
        let candidates =
            candidates_from(&serde_json::Value::String(payload), &scan, "INR").unwrap();
        let amounts: Vec<i64> = candidates.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![11, 4999]);
    }

    #[test]
    fn test_non_string_value_is_a_scan_miss() {
        let scan = ScanKind::FlatElements {
            selectors: &["[class*=\"price\"]"],
            label: "Rapido Bike",
        };
        assert!(candidates_from(&serde_json::Value::Null, &scan, "INR")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_scripts_quote_selectors() {
        let script = flat_scan_script(&["[class*=\"price\"]", "[class*=\"fare\"]"]);
        assert!(script.contains("JSON.stringify"));
        assert!(script.contains("[class*=\\\"price\\\"], [class*=\\\"fare\\\"]"));

        let click = click_script(&["button[class*=\"book\"]"]);
        assert!(click.contains(".click()"));
    }
}
