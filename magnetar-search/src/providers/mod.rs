//! Provider adapters for upstream torrent indexes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use magnetar_core::NetworkConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::challenge::ChallengeSignatures;
use crate::errors::{ProviderError, SearchError};
use crate::types::{ProviderId, RawTorrent};

pub mod eztv;
pub mod magnet;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod piratebay;
pub mod yts;

pub use eztv::EztvProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{FailingProvider, StaticProvider, mock_torrent};
pub use piratebay::PirateBayProvider;
pub use yts::YtsProvider;

/// Trait for torrent search providers.
///
/// One implementation per upstream index; each keeps its provider's
/// response quirks to itself and reports failures through [`ProviderError`].
#[async_trait]
pub trait TorrentSearchProvider: Send + Sync + std::fmt::Debug {
    /// Registry id this adapter serves.
    fn id(&self) -> ProviderId;

    /// Search for torrents by term and category.
    ///
    /// Zero results is `Ok` with an empty list, never an error.
    ///
    /// # Errors
    /// - `ProviderErrorKind::UpstreamUnavailable` - Network failure, timeout or HTTP error
    /// - `ProviderErrorKind::ChallengeBlocked` - Anti-bot page instead of data
    /// - `ProviderErrorKind::MalformedResponse` - Unexpected response shape
    async fn search_torrents(
        &self,
        term: &str,
        category: &str,
        limit: usize,
    ) -> Result<Vec<RawTorrent>, ProviderError>;
}

/// HTTP client shared by the adapters.
///
/// Applies the request timeout, user agent and challenge classification
/// uniformly before a body reaches an adapter's parser.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    signatures: Arc<ChallengeSignatures>,
    timeout: Duration,
}

impl UpstreamClient {
    /// Creates the client from network configuration.
    ///
    /// # Errors
    /// - `SearchError::Configuration` - The HTTP client could not be built
    pub fn new(
        config: &NetworkConfig,
        signatures: Arc<ChallengeSignatures>,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .map_err(|e| SearchError::Configuration {
                reason: format!("HTTP client creation failed: {e}"),
            })?;

        Ok(Self {
            client,
            signatures,
            timeout: config.request_timeout,
        })
    }

    /// Fetches `url` and decodes the JSON body.
    ///
    /// # Errors
    /// - `ProviderErrorKind::UpstreamUnavailable` - Network failure, timeout or HTTP error
    /// - `ProviderErrorKind::ChallengeBlocked` - Anti-bot page instead of data
    /// - `ProviderErrorKind::MalformedResponse` - Body is not the expected JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: ProviderId,
        url: Url,
    ) -> Result<T, ProviderError> {
        tracing::debug!(provider = %provider, url = %url, "Querying upstream");

        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        // The client timeout covers each phase; this bounds the whole exchange.
        let (status, body) = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(exchange)) => exchange,
            Ok(Err(e)) if e.is_timeout() => {
                return Err(ProviderError::unavailable(
                    provider,
                    format!("timed out after {:?}", self.timeout),
                ));
            }
            Ok(Err(e)) => {
                return Err(ProviderError::unavailable(
                    provider,
                    format!("request failed: {e}"),
                ));
            }
            Err(_) => {
                return Err(ProviderError::unavailable(
                    provider,
                    format!("timed out after {:?}", self.timeout),
                ));
            }
        };

        decode_body(provider, status, &body, &self.signatures)
    }
}

/// Classifies an upstream response and decodes its JSON body.
///
/// # Errors
/// - `ProviderErrorKind::ChallengeBlocked` - Challenge signature or unexpected HTML
/// - `ProviderErrorKind::UpstreamUnavailable` - Non-success status
/// - `ProviderErrorKind::MalformedResponse` - Body does not decode into `T`
pub fn decode_body<T: DeserializeOwned>(
    provider: ProviderId,
    status: u16,
    body: &str,
    signatures: &ChallengeSignatures,
) -> Result<T, ProviderError> {
    signatures.classify(provider, status, body)?;
    serde_json::from_str(body)
        .map_err(|e| ProviderError::malformed(provider, format!("invalid JSON: {e}")))
}

/// Parses a base URL from configuration and appends an endpoint path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, SearchError> {
    let joined = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| SearchError::Configuration {
        reason: format!("invalid provider URL '{joined}': {e}"),
    })
}

/// Convert a byte count into a human readable size with two decimals.
pub fn humanize_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.2} {}", UNITS[unit])
}

/// Format unix seconds as an RFC 1123 UTC date.
pub fn format_unix_time(seconds: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|time| time.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Deserializes an integer that upstreams send either as a number or as
/// numeric text; anything else becomes `None`.
pub(crate) fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(number)) => number.as_i64(),
        Some(serde_json::Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}
