use dropp_core::SourceKind;

use super::SnapshotUpdate;
use crate::error::NormalizeError;
use crate::types::MarketplaceItem;

/// The only listing status that counts as "on the marketplace".
pub const MARKETPLACE_ACTIVE_STATUS: &str = "Active";

/// Decodes a marketplace listing and derives `on_marketplace`.
///
/// The match against [`MARKETPLACE_ACTIVE_STATUS`] is case-sensitive; any
/// other value, including an empty or absent status, yields `false`.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedSourceData`] when the body does not
/// decode as a listing object.
pub fn normalize_marketplace_json(body: &str) -> Result<SnapshotUpdate, NormalizeError> {
    let item: MarketplaceItem = serde_json::from_str(body)
        .map_err(|e| NormalizeError::malformed(SourceKind::MarketplaceJson, &e))?;

    let on_marketplace = item.status.as_deref() == Some(MARKETPLACE_ACTIVE_STATUS);
    let note = format!(
        "listing {} status {}",
        item.id.as_deref().unwrap_or("<unknown>"),
        item.status.as_deref().unwrap_or("<absent>")
    );

    Ok(SnapshotUpdate {
        on_marketplace: Some(on_marketplace),
        note: Some(note),
        ..SnapshotUpdate::default()
    })
}
