//! Assembles one [`Snapshot`] per item from its already-fetched responses.
//!
//! Normalizers run independently and hand back [`SnapshotUpdate`]s; this
//! module is the single owner that merges them, so no two sources ever race
//! on the same snapshot. A failing source never aborts the build: its error
//! is collected in [`BuildOutcome::failures`] and the remaining sources still
//! contribute.

use chrono::{DateTime, Utc};
use dropp_core::{ItemConfig, Snapshot, SourceKind};

use crate::error::NormalizeError;
use crate::normalize::{normalize, SnapshotUpdate, DEFAULT_STATUS_SELECTOR};

/// A raw response body tagged with the source kind it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub kind: SourceKind,
    pub body: String,
}

impl RawResponse {
    pub fn new(kind: SourceKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub kind: SourceKind,
    pub error: NormalizeError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNote {
    pub kind: SourceKind,
    pub message: String,
}

/// Everything one build produced for one item.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub snapshot: Snapshot,
    /// One entry per configured source that did not contribute.
    pub failures: Vec<SourceFailure>,
    /// Diagnostics emitted by normalizers that succeeded.
    pub notes: Vec<SourceNote>,
    /// Source whose text ended up in `snapshot.availability`, if any.
    pub availability_source: Option<SourceKind>,
    /// Responses that were supplied for kinds the item is not configured for,
    /// or duplicated an earlier response of the same kind.
    pub ignored: Vec<SourceKind>,
}

impl BuildOutcome {
    /// `true` when every configured source contributed its fields.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the snapshot for `item` from `responses`, stamped with `created_at`.
///
/// Updates are merged in [`SourceKind`] order. When an item is configured
/// for both the HTML scrape and the status endpoint, the status endpoint's
/// message therefore overwrites the scraped text; `availability_source`
/// records which one won.
#[must_use]
pub fn build_snapshot(
    item: &ItemConfig,
    responses: &[RawResponse],
    created_at: DateTime<Utc>,
) -> BuildOutcome {
    let configured = item.source_kinds();
    let selector = item
        .status_selector
        .as_deref()
        .unwrap_or(DEFAULT_STATUS_SELECTOR);

    let mut ignored = Vec::new();
    let mut seen = Vec::new();
    for response in responses {
        if !configured.contains(&response.kind) || seen.contains(&response.kind) {
            ignored.push(response.kind);
        } else {
            seen.push(response.kind);
        }
    }

    let updates: Vec<(SourceKind, Result<SnapshotUpdate, NormalizeError>)> = configured
        .iter()
        .map(|&kind| {
            let result = match responses.iter().find(|r| r.kind == kind) {
                Some(response) => normalize(kind, &response.body, selector),
                None => Err(NormalizeError::MissingResponse { kind }),
            };
            (kind, result)
        })
        .collect();

    let mut snapshot = Snapshot::empty(created_at);
    let mut failures = Vec::new();
    let mut notes = Vec::new();
    let mut availability_source = None;

    for (kind, result) in updates {
        match result {
            Ok(mut update) => {
                if update.availability.is_some() {
                    availability_source = Some(kind);
                }
                if let Some(message) = update.note.take() {
                    notes.push(SourceNote { kind, message });
                }
                update.apply(&mut snapshot);
            }
            Err(error) => failures.push(SourceFailure { kind, error }),
        }
    }

    BuildOutcome {
        snapshot,
        failures,
        notes,
        availability_source,
        ignored,
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
