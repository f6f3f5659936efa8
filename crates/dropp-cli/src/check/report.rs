//! Plain-text rendering of check results for stdout.

use std::fmt::Write as _;

use dropp_core::SnapshotDiff;

use super::ItemCheck;

pub(crate) fn render_diff(diff: &SnapshotDiff) -> String {
    let changed = diff.changed_fields();
    let mark = |field| if changed.contains(&field) { "*" } else { " " };

    let mut out = String::new();
    let _ = writeln!(out, "CHANGED {} <{}>", diff.item_name, diff.item_url);
    let _ = writeln!(
        out,
        " {} availability:   {:?} -> {:?}",
        mark(dropp_core::TrackedField::Availability),
        diff.previous_availability,
        diff.current_availability
    );
    let _ = writeln!(
        out,
        " {} on_marketplace: {} -> {}",
        mark(dropp_core::TrackedField::OnMarketplace),
        diff.previous_on_marketplace,
        diff.current_on_marketplace
    );
    let _ = write!(
        out,
        " {} price:          {} -> {}",
        mark(dropp_core::TrackedField::Price),
        diff.previous_price,
        diff.current_price
    );
    out
}

pub(crate) fn render_incomplete(check: &ItemCheck) -> String {
    let mut out = String::new();
    let _ = write!(out, "INCOMPLETE {}", check.slug);
    for (kind, error) in &check.fetch_errors {
        let _ = write!(out, "\n   fetch {kind}: {error}");
    }
    for failure in &check.build.failures {
        let _ = write!(out, "\n   {}: {}", failure.kind, failure.error);
    }
    out
}
