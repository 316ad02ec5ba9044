//! EZTV provider backed by the `get-torrents` API.
//!
//! The API has no free-text search. Terms that look like an IMDB id are
//! looked up directly; anything else filters the latest listing by title.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use super::{
    TorrentSearchProvider, UpstreamClient, endpoint, format_unix_time, humanize_size,
    lenient_integer,
};
use crate::errors::{ProviderError, SearchError};
use crate::types::{PeerCount, ProviderId, RawTorrent};

/// Largest page the EZTV API serves.
const MAX_PAGE_SIZE: usize = 100;

/// EZTV search.
#[derive(Debug)]
pub struct EztvProvider {
    http: UpstreamClient,
    search_endpoint: Url,
    imdb_pattern: Regex,
}

/// Envelope of the get-torrents endpoint.
#[derive(Debug, Deserialize)]
pub struct EztvResponse {
    #[serde(default)]
    torrents: Option<Vec<EztvTorrent>>,
}

#[derive(Debug, Deserialize)]
struct EztvTorrent {
    #[serde(default)]
    title: String,
    #[serde(default)]
    magnet_url: Option<String>,
    #[serde(default)]
    torrent_url: Option<String>,
    #[serde(default)]
    imdb_id: Option<String>,
    #[serde(default)]
    seeds: Option<PeerCount>,
    #[serde(default)]
    peers: Option<PeerCount>,
    #[serde(default, deserialize_with = "lenient_integer")]
    date_released_unix: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    size_bytes: Option<i64>,
}

/// How a term is sent to EZTV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EztvLookup {
    /// Numeric IMDB id without the `tt` prefix
    Imdb(String),
    /// Case-insensitive title filter over the latest listing
    Title(String),
}

impl EztvProvider {
    /// Creates the provider against `base_url` (e.g. `https://eztvx.to`).
    ///
    /// # Errors
    /// - `SearchError::Configuration` - `base_url` is not a valid URL
    pub fn new(http: UpstreamClient, base_url: &str) -> Result<Self, SearchError> {
        let imdb_pattern =
            Regex::new(r"^(?i:tt)?(\d{5,10})$").map_err(|e| SearchError::Configuration {
                reason: format!("invalid IMDB pattern: {e}"),
            })?;

        Ok(Self {
            http,
            search_endpoint: endpoint(base_url, "api/get-torrents")?,
            imdb_pattern,
        })
    }

    /// Decides whether `term` is an IMDB id or a title.
    pub fn lookup(&self, term: &str) -> EztvLookup {
        let term = term.trim();
        match self.imdb_pattern.captures(term) {
            Some(captures) => EztvLookup::Imdb(captures[1].to_string()),
            None => EztvLookup::Title(term.to_lowercase()),
        }
    }

    /// Full request URL for a lookup.
    ///
    /// Title lookups always fetch a full page, since the filter runs on
    /// the listing afterwards and `limit` only caps what is returned.
    pub fn search_url(&self, lookup: &EztvLookup, limit: usize) -> Url {
        let page_size = match lookup {
            EztvLookup::Imdb(_) => limit.clamp(1, MAX_PAGE_SIZE),
            EztvLookup::Title(_) => MAX_PAGE_SIZE,
        };

        let mut url = self.search_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("limit", &page_size.to_string())
                .append_pair("page", "1");
            if let EztvLookup::Imdb(id) = lookup {
                query.append_pair("imdb_id", id);
            }
        }
        url
    }

    /// Converts listing records, applying the title filter when needed.
    pub fn into_raw(response: EztvResponse, lookup: &EztvLookup, limit: usize) -> Vec<RawTorrent> {
        response
            .torrents
            .unwrap_or_default()
            .into_iter()
            .filter(|torrent| match lookup {
                EztvLookup::Imdb(_) => true,
                EztvLookup::Title(needle) => torrent.title.to_lowercase().contains(needle),
            })
            .take(limit)
            .map(|torrent| RawTorrent {
                size: torrent
                    .size_bytes
                    .and_then(|bytes| u64::try_from(bytes).ok())
                    .map(humanize_size)
                    .unwrap_or_default(),
                time: torrent.date_released_unix.and_then(format_unix_time),
                seeds: torrent.seeds.unwrap_or(PeerCount::Known(0)),
                peers: torrent.peers.unwrap_or(PeerCount::Known(0)),
                magnet: torrent.magnet_url,
                link: torrent.torrent_url,
                imdb: torrent
                    .imdb_id
                    .filter(|id| !id.is_empty() && id.as_str() != "0")
                    .map(|id| format!("tt{id}")),
                title: torrent.title,
            })
            .collect()
    }
}

#[async_trait]
impl TorrentSearchProvider for EztvProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Eztv
    }

    /// EZTV only indexes TV, so the category is not forwarded.
    async fn search_torrents(
        &self,
        term: &str,
        _category: &str,
        limit: usize,
    ) -> Result<Vec<RawTorrent>, ProviderError> {
        let lookup = self.lookup(term);
        let response: EztvResponse = self
            .http
            .get_json(self.id(), self.search_url(&lookup, limit))
            .await?;

        Ok(Self::into_raw(response, &lookup, limit))
    }
}
