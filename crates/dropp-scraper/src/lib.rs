pub mod builder;
pub mod client;
pub mod error;
pub mod normalize;
pub mod rate_limit;
pub mod types;

pub use builder::{build_snapshot, BuildOutcome, RawResponse, SourceFailure, SourceNote};
pub use client::{ItemFetch, SourceClient};
pub use error::{NormalizeError, ScraperError};
pub use normalize::{normalize, SnapshotUpdate, DEFAULT_STATUS_SELECTOR};
pub use types::{MarketplaceItem, MarketplacePrice, StatusData};
