//! Mock provider implementations for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::TorrentSearchProvider;
use crate::errors::{ProviderError, ProviderErrorKind};
use crate::types::{PeerCount, ProviderId, RawTorrent};

/// Provider that answers every search with the same canned records.
#[derive(Debug)]
pub struct StaticProvider {
    id: ProviderId,
    records: Vec<RawTorrent>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticProvider {
    /// Creates a provider serving `records` under `id`.
    pub fn new(id: ProviderId, records: Vec<RawTorrent>) -> Self {
        Self {
            id,
            records,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a provider that always finds nothing.
    pub fn empty(id: ProviderId) -> Self {
        Self::new(id, Vec::new())
    }

    /// Creates a provider serving `count` generated records titled after
    /// the provider.
    pub fn with_generated(id: ProviderId, count: usize) -> Self {
        let records = (0..count)
            .map(|i| mock_torrent(&format!("{id} result {i}")))
            .collect();
        Self::new(id, records)
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of searches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TorrentSearchProvider for StaticProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn search_torrents(
        &self,
        _term: &str,
        _category: &str,
        _limit: usize,
    ) -> Result<Vec<RawTorrent>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.records.clone())
    }
}

/// Provider that fails every search with a fixed error kind.
#[derive(Debug)]
pub struct FailingProvider {
    id: ProviderId,
    kind: ProviderErrorKind,
}

impl FailingProvider {
    /// Creates a provider failing with `kind` under `id`.
    pub fn new(id: ProviderId, kind: ProviderErrorKind) -> Self {
        Self { id, kind }
    }
}

#[async_trait]
impl TorrentSearchProvider for FailingProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn search_torrents(
        &self,
        _term: &str,
        _category: &str,
        _limit: usize,
    ) -> Result<Vec<RawTorrent>, ProviderError> {
        Err(ProviderError::new(self.id, self.kind, "mock failure"))
    }
}

const MOCK_MAGNET: &str = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567";

/// A complete raw record with the given title.
pub fn mock_torrent(title: &str) -> RawTorrent {
    RawTorrent {
        title: title.to_string(),
        size: "1.00 GB".to_string(),
        time: Some("Tue, 14 Nov 2023 22:13:20 GMT".to_string()),
        seeds: PeerCount::Known(10),
        peers: PeerCount::Known(2),
        magnet: Some(MOCK_MAGNET.to_string()),
        link: Some("https://example.org/download.torrent".to_string()),
        imdb: None,
    }
}
