use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical state of one tracked item at one point in time.
///
/// Assembled fresh each polling cycle by the snapshot builder and never
/// mutated once handed to the diff engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Free-text status exactly as the source reported it, e.g. `"In Stock"`.
    ///
    /// Scraped text and status-endpoint messages share this field without any
    /// shared vocabulary, so values from different source kinds should not be
    /// assumed comparable.
    pub availability: String,
    /// `true` iff the marketplace listing is currently active.
    pub on_marketplace: bool,
    /// Currency-agnostic price as the source reported it.
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// A snapshot with every tracked field at its default: empty availability,
    /// not on the marketplace, price `0.0`.
    #[must_use]
    pub fn empty(created_at: DateTime<Utc>) -> Self {
        Self {
            availability: String::new(),
            on_marketplace: false,
            price: 0.0,
            created_at,
        }
    }

    /// Compares the tracked fields only. `created_at` never participates.
    ///
    /// Prices are compared exactly; upstream values are already rounded
    /// currency amounts.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn tracked_eq(&self, other: &Snapshot) -> bool {
        self.availability == other.availability
            && self.on_marketplace == other.on_marketplace
            && self.price == other.price
    }
}

/// Identity metadata for a tracked item, supplied by the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Availability,
    OnMarketplace,
    Price,
}

impl std::fmt::Display for TrackedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackedField::Availability => write!(f, "availability"),
            TrackedField::OnMarketplace => write!(f, "on_marketplace"),
            TrackedField::Price => write!(f, "price"),
        }
    }
}

/// A change record between two consecutive snapshots of the same item.
///
/// Carries both sides of every tracked field, not only the ones that changed.
/// `previous_*` values are copied verbatim from the prior snapshot and
/// `current_*` values from the new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    pub item_name: String,
    pub item_url: String,
    pub previous_availability: String,
    pub previous_on_marketplace: bool,
    pub previous_price: f64,
    pub current_availability: String,
    pub current_on_marketplace: bool,
    pub current_price: f64,
}

impl SnapshotDiff {
    #[must_use]
    pub fn new(identity: &ItemIdentity, previous: &Snapshot, current: &Snapshot) -> Self {
        Self {
            item_name: identity.name.clone(),
            item_url: identity.url.clone(),
            previous_availability: previous.availability.clone(),
            previous_on_marketplace: previous.on_marketplace,
            previous_price: previous.price,
            current_availability: current.availability.clone(),
            current_on_marketplace: current.on_marketplace,
            current_price: current.price,
        }
    }

    /// Fields whose value differs between the two sides.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn changed_fields(&self) -> Vec<TrackedField> {
        let mut changed = Vec::new();
        if self.previous_availability != self.current_availability {
            changed.push(TrackedField::Availability);
        }
        if self.previous_on_marketplace != self.current_on_marketplace {
            changed.push(TrackedField::OnMarketplace);
        }
        if self.previous_price != self.current_price {
            changed.push(TrackedField::Price);
        }
        changed
    }
}
