//! Data types for provider aggregation.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::SearchError;

/// Selector value that expands to every enabled provider.
pub const ALL_PROVIDERS: &str = "all";

/// Placeholder emitted for any value the upstream did not supply.
pub const UNKNOWN: &str = "?";

/// Identifier of a known upstream index.
///
/// The set is closed: adapters can only report ids listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// YTS movie index
    Yts,
    /// ThePirateBay (apibay JSON API)
    ThePirateBay,
    /// EZTV TV index
    Eztv,
    /// TorrentProject
    TorrentProject,
}

impl ProviderId {
    /// Every known provider in registration order.
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Yts,
        ProviderId::ThePirateBay,
        ProviderId::Eztv,
        ProviderId::TorrentProject,
    ];

    /// Canonical lowercase id.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Yts => "yts",
            ProviderId::ThePirateBay => "thepiratebay",
            ProviderId::Eztv => "eztv",
            ProviderId::TorrentProject => "torrentproject",
        }
    }

    /// Presentation name used when the caller does not ask for lowercase.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderId::Yts => "Yts",
            ProviderId::ThePirateBay => "ThePirateBay",
            ProviderId::Eztv => "Eztv",
            ProviderId::TorrentProject => "TorrentProject",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == lowered)
            .ok_or_else(|| SearchError::UnknownProvider {
                provider: s.to_string(),
            })
    }
}

/// One logical search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search term; must contain non-whitespace characters
    pub term: String,
    /// Provider category, case-insensitive
    pub category: String,
    /// Maximum results per provider
    pub limit: usize,
    /// Provider id or `"all"`
    pub source: String,
}

impl SearchQuery {
    /// Default per-provider result limit.
    pub const DEFAULT_LIMIT: usize = 100;

    /// Creates a query for `term` across all providers and categories.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: ALL_PROVIDERS.to_string(),
            limit: Self::DEFAULT_LIMIT,
            source: ALL_PROVIDERS.to_string(),
        }
    }

    /// Restricts the query to a category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the per-provider result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Selects a single provider, or `"all"`.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Checks the query shape before any provider is contacted.
    ///
    /// # Errors
    /// - `SearchError::InvalidQuery` - Blank term or zero limit
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.term.trim().is_empty() {
            return Err(SearchError::missing_term());
        }
        if self.limit == 0 {
            return Err(SearchError::InvalidQuery {
                reason: "Limit must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

/// Seed or peer count as reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerCount {
    /// A concrete count
    Known(u64),
    /// The upstream sent a sentinel such as `"N/A"`
    Unavailable,
}

impl PeerCount {
    /// Parses textual counts; anything that is not a non-negative integer
    /// (including the `"N/A"` sentinel) is unavailable.
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<u64>()
            .map(PeerCount::Known)
            .unwrap_or(PeerCount::Unavailable)
    }

    /// Count as a string, or `"?"` when unavailable.
    pub fn render(self) -> String {
        match self {
            PeerCount::Known(count) => count.to_string(),
            PeerCount::Unavailable => UNKNOWN.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for PeerCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Unsigned(u64),
            Signed(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Unsigned(count) => PeerCount::Known(count),
            Wire::Signed(count) => u64::try_from(count)
                .map(PeerCount::Known)
                .unwrap_or(PeerCount::Unavailable),
            Wire::Float(value) if value >= 0.0 && value.fract() == 0.0 => {
                PeerCount::Known(value as u64)
            }
            Wire::Float(_) => PeerCount::Unavailable,
            Wire::Text(text) => PeerCount::parse(&text),
        })
    }
}

/// Adapter-level result record, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTorrent {
    /// Release title
    pub title: String,
    /// Human readable size, possibly empty
    pub size: String,
    /// Publication time as the provider reports it
    pub time: Option<String>,
    /// Seeders
    pub seeds: PeerCount,
    /// Leechers / peers
    pub peers: PeerCount,
    /// Magnet URI built by the adapter
    pub magnet: Option<String>,
    /// Direct `.torrent` or detail link
    pub link: Option<String>,
    /// External id such as an IMDB id
    pub imdb: Option<String>,
}

/// Canonical result record returned to callers.
///
/// Every field is always present; missing values are `"?"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Provider that produced the record
    #[serde(rename = "source")]
    pub provider: ProviderId,
    /// Release title
    pub title: String,
    /// Human readable size
    pub size: String,
    /// Publication time
    pub time: String,
    /// Magnet URI or download link
    pub url: String,
    /// Seed count or `"?"`
    pub seeds: String,
    /// Peer count or `"?"`
    pub peers: String,
    /// External id or `"?"`
    pub imdb: String,
}

/// Results keyed by provider, in registry order.
///
/// Keys are exactly the providers that were dispatched; a provider that
/// returned nothing keeps its key with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    entries: Vec<(ProviderId, Vec<NormalizedResult>)>,
}

impl AggregateResult {
    /// Creates an empty result map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the results of one provider, replacing any previous entry.
    pub fn insert(&mut self, provider: ProviderId, results: Vec<NormalizedResult>) {
        match self.entries.iter_mut().find(|(id, _)| *id == provider) {
            Some((_, existing)) => *existing = results,
            None => self.entries.push((provider, results)),
        }
    }

    /// Results of one provider, `None` when it was not dispatched.
    pub fn get(&self, provider: ProviderId) -> Option<&[NormalizedResult]> {
        self.entries
            .iter()
            .find(|(id, _)| *id == provider)
            .map(|(_, results)| results.as_slice())
    }

    /// Dispatched providers in order.
    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Number of dispatched providers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no provider was dispatched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every dispatched provider returned no results.
    pub fn has_no_results(&self) -> bool {
        self.entries.iter().all(|(_, results)| results.is_empty())
    }

    /// Total number of results across providers.
    pub fn total_results(&self) -> usize {
        self.entries.iter().map(|(_, results)| results.len()).sum()
    }
}

impl Serialize for AggregateResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (provider, results) in &self.entries {
            map.serialize_entry(provider.as_str(), results)?;
        }
        map.end()
    }
}
