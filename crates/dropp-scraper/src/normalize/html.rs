//! Storefront page scrape: availability from a single status element.

use dropp_core::SourceKind;
use scraper::{Html, Selector};

use super::SnapshotUpdate;
use crate::error::NormalizeError;

pub const DEFAULT_STATUS_SELECTOR: &str = ".status";

/// Extracts the text of the elements matching `status_selector` and returns it
/// verbatim as `availability`.
///
/// Text from every match is concatenated in document order, descendants
/// included. Whitespace is preserved.
///
/// # Errors
///
/// - [`NormalizeError::MissingExpectedElement`] if nothing matches the selector.
/// - [`NormalizeError::MalformedSourceData`] if `status_selector` is not valid CSS.
pub fn normalize_html(
    body: &str,
    status_selector: &str,
) -> Result<SnapshotUpdate, NormalizeError> {
    let selector =
        Selector::parse(status_selector).map_err(|e| NormalizeError::MalformedSourceData {
            kind: SourceKind::HtmlScrape,
            reason: format!("invalid status selector '{status_selector}': {e}"),
        })?;

    let document = Html::parse_document(body);
    let mut matches = document.select(&selector).peekable();
    if matches.peek().is_none() {
        return Err(NormalizeError::MissingExpectedElement {
            selector: status_selector.to_owned(),
        });
    }

    let availability: String = matches.flat_map(|el| el.text()).collect();

    Ok(SnapshotUpdate {
        availability: Some(availability),
        ..SnapshotUpdate::default()
    })
}
