//! Concurrent fan-out of one query to every selected provider.
//!
//! Provider failures are contained here: a failing adapter is logged and
//! contributes an empty list, so callers only ever see query-level errors.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use magnetar_core::MagnetarConfig;

use crate::challenge::ChallengeSignatures;
use crate::errors::{ProviderErrorKind, SearchError};
use crate::normalizer::normalize_all;
use crate::providers::{
    EztvProvider, PirateBayProvider, TorrentSearchProvider, UpstreamClient, YtsProvider,
};
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::types::{AggregateResult, NormalizedResult, ProviderId, SearchQuery};

/// Category value passed to adapters when the requested one is unsupported.
const ANY_CATEGORY: &str = "all";

/// Aggregation engine over a fixed registry and adapter set.
///
/// Cheap to share behind an `Arc`; searches hold no mutable state.
#[derive(Debug)]
pub struct Aggregator {
    registry: Arc<ProviderRegistry>,
    providers: HashMap<ProviderId, Arc<dyn TorrentSearchProvider>>,
}

impl Aggregator {
    /// Assembles an aggregator from a registry and its adapters.
    ///
    /// # Errors
    /// - `SearchError::Configuration` - An adapter serves an unregistered id,
    ///   two adapters serve the same id, or an enabled provider has no adapter
    pub fn new(
        registry: Arc<ProviderRegistry>,
        adapters: Vec<Arc<dyn TorrentSearchProvider>>,
    ) -> Result<Self, SearchError> {
        let mut providers = HashMap::new();
        for adapter in adapters {
            let id = adapter.id();
            if registry.descriptor(id).is_none() {
                return Err(SearchError::Configuration {
                    reason: format!("adapter for unregistered provider '{id}'"),
                });
            }
            if providers.insert(id, adapter).is_some() {
                return Err(SearchError::Configuration {
                    reason: format!("provider '{id}' has more than one adapter"),
                });
            }
        }

        if let Some(missing) = registry.enabled().find(|d| !providers.contains_key(&d.id)) {
            return Err(SearchError::Configuration {
                reason: format!("provider '{}' is enabled but has no adapter", missing.id),
            });
        }

        Ok(Self {
            registry,
            providers,
        })
    }

    /// Builds the registry, HTTP client and built-in adapters from
    /// configuration.
    ///
    /// # Errors
    /// - `SearchError::Configuration` - Invalid provider list, challenge
    ///   pattern or base URL
    pub fn from_config(config: &MagnetarConfig) -> Result<Self, SearchError> {
        let registry = Arc::new(ProviderRegistry::from_config(&config.search)?);
        let signatures =
            ChallengeSignatures::with_extra_patterns(&config.search.challenge_patterns)?;
        let http = UpstreamClient::new(&config.network, Arc::new(signatures))?;

        let yts = YtsProvider::new(http.clone(), &config.network.yts_base_url)?;
        let tpb = PirateBayProvider::new(http.clone(), &config.network.tpb_base_url)?;
        let eztv = EztvProvider::new(http, &config.network.eztv_base_url)?;
        let adapters: Vec<Arc<dyn TorrentSearchProvider>> =
            vec![Arc::new(yts), Arc::new(tpb), Arc::new(eztv)];

        tracing::info!(
            enabled = ?registry.enabled().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            "Provider registry ready"
        );

        Self::new(registry, adapters)
    }

    /// The registry this aggregator dispatches against.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Runs `query` against every selected provider concurrently.
    ///
    /// All adapters are started before any is awaited. Dropping the returned
    /// future cancels the in-flight requests.
    ///
    /// # Errors
    /// - `SearchError::InvalidQuery` - Blank term or zero limit
    /// - `SearchError::InvalidProvider` - Unknown or disabled provider selector
    /// - `SearchError::NotFound` - Every dispatched provider came back empty
    pub async fn search(&self, query: &SearchQuery) -> Result<AggregateResult, SearchError> {
        query.validate()?;
        let targets = self.registry.resolve(&query.source)?;
        let term = query.term.trim();

        let searches = targets.iter().map(|descriptor| {
            let category = effective_category(descriptor, &query.category);
            self.search_provider(descriptor.id, term, category, query.limit)
        });
        let outcomes = join_all(searches).await;

        let mut aggregate = AggregateResult::new();
        for (id, results) in outcomes {
            aggregate.insert(id, results);
        }

        tracing::info!(
            query = %term,
            source = %query.source,
            providers = aggregate.len(),
            results = aggregate.total_results(),
            "Search completed"
        );

        if aggregate.has_no_results() {
            return Err(SearchError::NotFound);
        }
        Ok(aggregate)
    }

    async fn search_provider(
        &self,
        id: ProviderId,
        term: &str,
        category: String,
        limit: usize,
    ) -> (ProviderId, Vec<NormalizedResult>) {
        let Some(adapter) = self.providers.get(&id) else {
            tracing::warn!(provider = %id, "No adapter registered for provider");
            return (id, Vec::new());
        };

        match adapter.search_torrents(term, &category, limit).await {
            Ok(mut raw) => {
                raw.truncate(limit);
                (id, normalize_all(raw, id))
            }
            Err(e) if e.kind == ProviderErrorKind::EmptyResult => {
                tracing::debug!(
                    provider = %id,
                    query = %term,
                    category = %category,
                    "Provider reported no results"
                );
                (id, Vec::new())
            }
            Err(e) => {
                tracing::warn!(
                    provider = %id,
                    query = %term,
                    category = %category,
                    kind = %e.kind,
                    error = %e.reason,
                    "Provider search failed"
                );
                (id, Vec::new())
            }
        }
    }
}

/// Lowercased category when the provider supports it, `"all"` otherwise.
fn effective_category(descriptor: &ProviderDescriptor, requested: &str) -> String {
    let requested = requested.trim();
    let supported = descriptor
        .supported_categories
        .iter()
        .any(|c| c.eq_ignore_ascii_case(requested));

    if supported {
        requested.to_lowercase()
    } else {
        ANY_CATEGORY.to_string()
    }
}
