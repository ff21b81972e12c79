//! Extraction Benchmarks
//!
//! Measures the hot pure-code paths of a comparison batch:
//! - Price text parsing
//! - Candidate assembly from a scanned payload
//! - Batch statistics

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fare_core::{CandidateFare, FareStats, PriceRecord, ServiceKind};
use fare_scrapers::{parse_amount, CardScan, ScanKind};

fn bench_parse_amount(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_amount");

    group.bench_function("currency_glyph", |b| {
        b.iter(|| parse_amount(black_box("₹ 249")))
    });

    group.bench_function("embedded_digits", |b| {
        b.iter(|| parse_amount(black_box("Approx. fare ₹249 for 2 riders")))
    });

    group.bench_function("no_digits", |b| {
        b.iter(|| parse_amount(black_box("fare unavailable")))
    });

    group.finish();
}

fn bench_candidates(c: &mut Criterion) {
    let scan = ScanKind::Cards(CardScan {
        container_selectors: &["[class*=\"ride-option\"]"],
        label_selectors: &["[class*=\"name\"]"],
        price_selectors: &["[class*=\"fare\"]"],
        eta_selectors: &["[class*=\"eta\"]"],
        default_label: None,
    });

    let payload: String = serde_json::json!(
        (0..20)
            .map(|i| serde_json::json!({
                "label": format!("Option {}", i),
                "price": format!("₹{}", 80 + i * 7),
                "eta": "4 min",
            }))
            .collect::<Vec<_>>()
    )
    .to_string();
    let value = serde_json::Value::String(payload);

    c.bench_function("candidates_from_cards", |b| {
        b.iter(|| {
            fare_scrapers::extract::candidates_from(black_box(&value), &scan, "INR").unwrap()
        })
    });
}

fn bench_stats(c: &mut Criterion) {
    let records: Vec<PriceRecord> = (0..4)
        .map(|i| {
            let candidate = CandidateFare {
                label: "Ride".to_string(),
                amount: 90 + i * 13,
                currency: "INR".to_string(),
                eta_display: None,
                raw_text: format!("₹{}", 90 + i * 13),
            };
            PriceRecord::success(ServiceKind::ALL[i as usize], &candidate, vec![candidate.clone()])
        })
        .collect();

    c.bench_function("stats_from_records", |b| {
        b.iter(|| FareStats::from_records(black_box(&records), 1.23))
    });
}

criterion_group!(benches, bench_parse_amount, bench_candidates, bench_stats);
criterion_main!(benches);
