use dropp_core::SourceKind;

use super::SnapshotUpdate;
use crate::error::NormalizeError;
use crate::types::StatusData;

/// Decodes the product-status endpoint into `availability` and `price`.
///
/// Values pass through unchanged; no unit or currency conversion.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedSourceData`] when the body is not JSON
/// or a field has the wrong type.
pub fn normalize_status_json(body: &str) -> Result<SnapshotUpdate, NormalizeError> {
    let data: StatusData = serde_json::from_str(body)
        .map_err(|e| NormalizeError::malformed(SourceKind::StatusJson, &e))?;

    Ok(SnapshotUpdate {
        availability: Some(data.message),
        price: Some(data.final_price),
        ..SnapshotUpdate::default()
    })
}
