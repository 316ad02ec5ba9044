//! YTS movie provider.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::magnet::{YTS_TRACKERS, build_magnet};
use super::{TorrentSearchProvider, UpstreamClient, endpoint};
use crate::errors::{ProviderError, SearchError};
use crate::types::{PeerCount, ProviderId, RawTorrent, UNKNOWN};

/// YTS search through `list_movies.json`.
///
/// Results are grouped by movie, each carrying one torrent per quality.
/// Every (movie, quality) pair becomes a separate record.
#[derive(Debug)]
pub struct YtsProvider {
    http: UpstreamClient,
    search_endpoint: Url,
}

/// Envelope of the list_movies endpoint.
#[derive(Debug, Deserialize)]
pub struct YtsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    data: Option<YtsData>,
}

#[derive(Debug, Deserialize)]
struct YtsData {
    #[serde(default)]
    movies: Option<Vec<YtsMovie>>,
}

#[derive(Debug, Deserialize)]
struct YtsMovie {
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default)]
    imdb_code: Option<String>,
    #[serde(default)]
    torrents: Option<Vec<YtsTorrent>>,
}

#[derive(Debug, Deserialize)]
struct YtsTorrent {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    quality: String,
    #[serde(default)]
    seeds: Option<PeerCount>,
    #[serde(default)]
    peers: Option<PeerCount>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    date_uploaded: Option<String>,
}

impl YtsProvider {
    /// Creates the provider against `base_url` (e.g. `https://yts.lt`).
    ///
    /// # Errors
    /// - `SearchError::Configuration` - `base_url` is not a valid URL
    pub fn new(http: UpstreamClient, base_url: &str) -> Result<Self, SearchError> {
        Ok(Self {
            http,
            search_endpoint: endpoint(base_url, "api/v2/list_movies.json")?,
        })
    }

    /// Full request URL for a search, most seeded first.
    pub fn search_url(&self, term: &str, limit: usize) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query_term", term)
            .append_pair("sort_by", "seeds")
            .append_pair("order_by", "desc")
            .append_pair("limit", &limit.to_string());
        url
    }

    /// Flattens movies into one record per quality variant.
    ///
    /// # Errors
    /// - `ProviderErrorKind::UpstreamUnavailable` - The API reported an error status
    pub fn into_raw(response: YtsResponse) -> Result<Vec<RawTorrent>, ProviderError> {
        if response.status.as_deref() == Some("error") {
            return Err(ProviderError::unavailable(
                ProviderId::Yts,
                response
                    .status_message
                    .unwrap_or_else(|| "API reported an error".to_string()),
            ));
        }

        let movies = response
            .data
            .and_then(|data| data.movies)
            .unwrap_or_default();

        let mut raw = Vec::new();
        for movie in movies {
            let year = movie
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());

            for torrent in movie.torrents.iter().flatten() {
                raw.push(RawTorrent {
                    title: format!("{} ({}) {}", movie.title, year, torrent.quality),
                    size: torrent.size.clone().unwrap_or_default(),
                    time: torrent.date_uploaded.clone(),
                    seeds: torrent.seeds.unwrap_or(PeerCount::Known(0)),
                    peers: torrent.peers.unwrap_or(PeerCount::Known(0)),
                    magnet: torrent
                        .hash
                        .as_deref()
                        .and_then(|hash| build_magnet(hash, &movie.title, YTS_TRACKERS)),
                    link: torrent.url.clone(),
                    imdb: movie.imdb_code.clone(),
                });
            }
        }

        Ok(raw)
    }
}

#[async_trait]
impl TorrentSearchProvider for YtsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Yts
    }

    /// YTS only indexes movies, so the category is not forwarded.
    async fn search_torrents(
        &self,
        term: &str,
        _category: &str,
        limit: usize,
    ) -> Result<Vec<RawTorrent>, ProviderError> {
        let response: YtsResponse = self
            .http
            .get_json(self.id(), self.search_url(term, limit))
            .await?;

        Self::into_raw(response)
    }
}
