//! Magnetar Search - Torrent index aggregation
//!
//! Fans one query out to several upstream torrent indexes, normalizes
//! their heterogeneous responses into one result schema and returns the
//! results grouped by provider.

#![warn(missing_docs)]
#![deny(clippy::missing_errors_doc)]

pub mod aggregator;
pub mod challenge;
pub mod errors;
pub mod normalizer;
pub mod providers;
pub mod registry;
pub mod types;

// Re-export main types
pub use aggregator::Aggregator;
pub use challenge::ChallengeSignatures;
pub use errors::{ProviderError, ProviderErrorKind, SearchError};
pub use providers::TorrentSearchProvider;
pub use registry::{ProviderDescriptor, ProviderRegistry};
pub use types::{
    AggregateResult, NormalizedResult, PeerCount, ProviderId, RawTorrent, SearchQuery,
};
