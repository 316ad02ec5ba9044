//! ThePirateBay provider backed by the apibay JSON API.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::magnet::{PIRATEBAY_TRACKERS, build_magnet};
use super::{
    TorrentSearchProvider, UpstreamClient, endpoint, format_unix_time, humanize_size,
    lenient_integer,
};
use crate::errors::{ProviderError, SearchError};
use crate::types::{PeerCount, ProviderId, RawTorrent};

/// Name apibay gives its single placeholder record when nothing matched.
pub const NO_RESULTS_SENTINEL: &str = "No results returned";

/// ThePirateBay search through `q.php`.
///
/// The API answers every query with an array; an empty search is
/// represented by one placeholder record rather than an empty array.
#[derive(Debug)]
pub struct PirateBayProvider {
    http: UpstreamClient,
    search_endpoint: Url,
}

/// Single record from `q.php`. Numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
pub struct ApiBayRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    info_hash: String,
    #[serde(default)]
    seeders: Option<PeerCount>,
    #[serde(default)]
    leechers: Option<PeerCount>,
    #[serde(default, deserialize_with = "lenient_integer")]
    size: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    added: Option<i64>,
    #[serde(default)]
    imdb: Option<String>,
}

impl PirateBayProvider {
    /// Creates the provider against `base_url` (e.g. `https://apibay.org`).
    ///
    /// # Errors
    /// - `SearchError::Configuration` - `base_url` is not a valid URL
    pub fn new(http: UpstreamClient, base_url: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http,
            search_endpoint: endpoint(base_url, "q.php")?,
        })
    }

    /// Maps a category name to apibay's numeric category filter.
    ///
    /// Unknown categories search everything.
    pub fn category_code(category: &str) -> &'static str {
        match category.trim().to_lowercase().as_str() {
            "audio" => "100",
            "video" => "200",
            "applications" => "300",
            "games" => "400",
            "porn" => "500",
            "other" => "600",
            _ => "",
        }
    }

    /// Full request URL for a search.
    pub fn search_url(&self, term: &str, category: &str) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", term)
            .append_pair("cat", Self::category_code(category));
        url
    }

    /// Converts apibay records, dropping the "no results" placeholder and
    /// keeping at most `limit` records in upstream order.
    pub fn into_raw(records: Vec<ApiBayRecord>, limit: usize) -> Vec<RawTorrent> {
        if is_no_results(&records) {
            return Vec::new();
        }

        records
            .into_iter()
            .take(limit)
            .map(|record| {
                let magnet = build_magnet(&record.info_hash, &record.name, PIRATEBAY_TRACKERS);
                RawTorrent {
                    size: record
                        .size
                        .and_then(|bytes| u64::try_from(bytes).ok())
                        .map(humanize_size)
                        .unwrap_or_default(),
                    time: record.added.and_then(format_unix_time),
                    seeds: record.seeders.unwrap_or(PeerCount::Known(0)),
                    peers: record.leechers.unwrap_or(PeerCount::Known(0)),
                    magnet,
                    link: None,
                    imdb: record.imdb.filter(|id| !id.trim().is_empty()),
                    title: record.name,
                }
            })
            .collect()
    }
}

fn is_no_results(records: &[ApiBayRecord]) -> bool {
    match records {
        [] => true,
        [only] => only.name == NO_RESULTS_SENTINEL,
        _ => false,
    }
}

#[async_trait]
impl TorrentSearchProvider for PirateBayProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ThePirateBay
    }

    async fn search_torrents(
        &self,
        term: &str,
        category: &str,
        limit: usize,
    ) -> Result<Vec<RawTorrent>, ProviderError> {
        let records: Vec<ApiBayRecord> = self
            .http
            .get_json(self.id(), self.search_url(term, category))
            .await?;

        if is_no_results(&records) {
            return Err(ProviderError::empty(self.id()));
        }
        Ok(Self::into_raw(records, limit))
    }
}
