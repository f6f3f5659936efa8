//! Change detection between consecutive snapshots of one item.

use crate::snapshot::{ItemIdentity, Snapshot, SnapshotDiff};

/// Result of comparing a new snapshot against the stored one.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// No prior snapshot exists. The caller seeds history and reports nothing.
    FirstObservation,
    /// Every tracked field matches the prior snapshot.
    NoChange,
    /// At least one tracked field differs.
    Changed(SnapshotDiff),
}

impl DiffOutcome {
    #[must_use]
    pub fn is_change(&self) -> bool {
        matches!(self, DiffOutcome::Changed(_))
    }

    #[must_use]
    pub fn into_diff(self) -> Option<SnapshotDiff> {
        match self {
            DiffOutcome::Changed(diff) => Some(diff),
            DiffOutcome::FirstObservation | DiffOutcome::NoChange => None,
        }
    }
}

/// Compares `current` against `previous` for the item identified by `identity`.
///
/// Never synthesizes a diff against a default snapshot: an absent `previous`
/// yields [`DiffOutcome::FirstObservation`].
#[must_use]
pub fn diff_snapshots(
    identity: &ItemIdentity,
    previous: Option<&Snapshot>,
    current: &Snapshot,
) -> DiffOutcome {
    let Some(previous) = previous else {
        return DiffOutcome::FirstObservation;
    };

    if previous.tracked_eq(current) {
        DiffOutcome::NoChange
    } else {
        DiffOutcome::Changed(SnapshotDiff::new(identity, previous, current))
    }
}
