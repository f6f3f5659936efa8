use chrono::TimeZone;
use dropp_core::SourceConfig;
use dropp_scraper::{RawResponse, ScraperError};

use super::*;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, hour, 0, 0).unwrap()
}

fn item(name: &str, kinds: &[SourceKind]) -> ItemConfig {
    ItemConfig {
        name: name.to_string(),
        url: "https://shop.example.com/products/aurora".to_string(),
        status_selector: None,
        sources: kinds
            .iter()
            .map(|&kind| SourceConfig {
                kind,
                url: format!("https://shop.example.com/{kind}"),
            })
            .collect(),
        notes: None,
    }
}

fn fetch(responses: Vec<RawResponse>) -> ItemFetch {
    ItemFetch {
        responses,
        errors: vec![],
    }
}

fn status_body(message: &str, price: f64) -> String {
    serde_json::json!({ "message": message, "final_price": price }).to_string()
}

fn previous(availability: &str, on_marketplace: bool, price: f64) -> Snapshot {
    Snapshot {
        availability: availability.to_string(),
        on_marketplace,
        price,
        created_at: at(6),
    }
}

#[test]
fn first_observation_has_no_diff() {
    let cfg = item("Aurora", &[SourceKind::StatusJson]);
    let check = evaluate_item(
        &cfg,
        fetch(vec![RawResponse::new(
            SourceKind::StatusJson,
            status_body("In Stock", 19.99),
        )]),
        None,
        at(7),
    );
    assert_eq!(check.slug, "aurora");
    assert!(matches!(
        check.status,
        CheckStatus::Diffed(DiffOutcome::FirstObservation)
    ));
}

#[test]
fn availability_change_produces_diff() {
    let cfg = item(
        "Aurora",
        &[SourceKind::HtmlScrape, SourceKind::MarketplaceJson],
    );
    let prev = previous("In Stock", true, 0.0);
    let check = evaluate_item(
        &cfg,
        fetch(vec![
            RawResponse::new(
                SourceKind::HtmlScrape,
                r#"<span class="status">Out of Stock</span>"#,
            ),
            RawResponse::new(SourceKind::MarketplaceJson, r#"{"status":"Active"}"#),
        ]),
        Some(&prev),
        at(7),
    );
    match check.status {
        CheckStatus::Diffed(DiffOutcome::Changed(diff)) => {
            assert_eq!(diff.previous_availability, "In Stock");
            assert_eq!(diff.current_availability, "Out of Stock");
            assert!(diff.previous_on_marketplace && diff.current_on_marketplace);
        }
        other => panic!("expected a change, got {other:?}"),
    }
}

#[test]
fn unchanged_item_reports_no_change() {
    let cfg = item("Aurora", &[SourceKind::StatusJson]);
    let prev = previous("In Stock", false, 19.99);
    let check = evaluate_item(
        &cfg,
        fetch(vec![RawResponse::new(
            SourceKind::StatusJson,
            status_body("In Stock", 19.99),
        )]),
        Some(&prev),
        at(7),
    );
    assert!(matches!(
        check.status,
        CheckStatus::Diffed(DiffOutcome::NoChange)
    ));
}

#[test]
fn incomplete_build_is_not_diffed() {
    let cfg = item(
        "Aurora",
        &[SourceKind::StatusJson, SourceKind::MarketplaceJson],
    );
    let prev = previous("In Stock", true, 19.99);
    let check = evaluate_item(
        &cfg,
        ItemFetch {
            responses: vec![RawResponse::new(
                SourceKind::StatusJson,
                status_body("In Stock", 19.99),
            )],
            errors: vec![(
                SourceKind::MarketplaceJson,
                ScraperError::NotFound {
                    url: "https://shop.example.com/marketplace_json".to_string(),
                },
            )],
        },
        Some(&prev),
        at(7),
    );
    assert!(matches!(check.status, CheckStatus::Incomplete));
    assert_eq!(check.fetch_errors.len(), 1);
    assert!(check.fetch_errors[0].1.contains("endpoint not found"));
    assert_eq!(check.build.failures.len(), 1);
}

#[test]
fn select_items_without_filter_keeps_all() {
    let items = vec![
        item("Aurora", &[SourceKind::HtmlScrape]),
        item("Nimbus Lamp", &[SourceKind::HtmlScrape]),
    ];
    assert_eq!(select_items(items, None).unwrap().len(), 2);
}

#[test]
fn select_items_filters_by_slug() {
    let items = vec![
        item("Aurora", &[SourceKind::HtmlScrape]),
        item("Nimbus Lamp", &[SourceKind::HtmlScrape]),
    ];
    let selected = select_items(items, Some("nimbus-lamp")).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].name, "Nimbus Lamp");
}

#[test]
fn select_items_unknown_slug_is_an_error() {
    let items = vec![item("Aurora", &[SourceKind::HtmlScrape])];
    let err = select_items(items, Some("orbit")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
