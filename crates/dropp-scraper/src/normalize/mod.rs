//! Source normalizers: raw response body → partial [`Snapshot`] update.
//!
//! Each normalizer is pure. It reads one body, returns the fields it can
//! vouch for as a [`SnapshotUpdate`] (plus an optional diagnostic note), and
//! never looks at fields owned by another source. Failures come back as
//! [`NormalizeError`] values instead of being logged here.

mod html;
mod marketplace;
mod status;

use dropp_core::{Snapshot, SourceKind};

use crate::error::NormalizeError;

pub use html::{normalize_html, DEFAULT_STATUS_SELECTOR};
pub use marketplace::{normalize_marketplace_json, MARKETPLACE_ACTIVE_STATUS};
pub use status::normalize_status_json;

/// Fields one normalizer wants written onto the in-progress snapshot.
///
/// `None` means "not mine": the snapshot keeps whatever value it had.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotUpdate {
    pub availability: Option<String>,
    pub on_marketplace: Option<bool>,
    pub price: Option<f64>,
    /// Human-readable diagnostic for the caller's log sink.
    pub note: Option<String>,
}

impl SnapshotUpdate {
    /// Writes the carried fields onto `snapshot`.
    pub fn apply(self, snapshot: &mut Snapshot) {
        if let Some(availability) = self.availability {
            snapshot.availability = availability;
        }
        if let Some(on_marketplace) = self.on_marketplace {
            snapshot.on_marketplace = on_marketplace;
        }
        if let Some(price) = self.price {
            snapshot.price = price;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.availability.is_none() && self.on_marketplace.is_none() && self.price.is_none()
    }
}

/// Dispatches `body` to the normalizer for `kind`.
///
/// `status_selector` is only consulted for [`SourceKind::HtmlScrape`].
///
/// # Errors
///
/// Returns whatever the selected normalizer reports; see
/// [`normalize_html`], [`normalize_status_json`], and
/// [`normalize_marketplace_json`].
pub fn normalize(
    kind: SourceKind,
    body: &str,
    status_selector: &str,
) -> Result<SnapshotUpdate, NormalizeError> {
    match kind {
        SourceKind::HtmlScrape => normalize_html(body, status_selector),
        SourceKind::StatusJson => normalize_status_json(body),
        SourceKind::MarketplaceJson => normalize_marketplace_json(body),
    }
}
