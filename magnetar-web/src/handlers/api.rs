//! API handlers for search and provider discovery

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use magnetar_search::{AggregateResult, SearchQuery};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::ApiError;
use crate::server::AppState;

/// Provider list entry that stands for every enabled provider.
const ALL_LABEL: &str = "All";

/// Query string of `GET /search`. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search term
    pub query: Option<String>,
    /// Category, defaults to the configured category
    pub category: Option<String>,
    /// Provider id or `all`
    pub source: Option<String>,
    /// Per-provider result limit, kept as text so a bad value gets a JSON 400
    pub limit: Option<String>,
}

/// Query string of the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PresentationParams {
    /// `"true"` to lowercase names
    pub lowercase: Option<String>,
}

impl PresentationParams {
    fn lowercase(&self) -> bool {
        self.lowercase.as_deref() == Some("true")
    }
}

/// Body of `GET /providers`.
#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    /// `All` followed by enabled provider names
    pub providers: Vec<String>,
}

/// Body of `GET /categories`: provider name to categories, registry order.
#[derive(Debug)]
pub struct CategoriesResponse(Vec<(String, Vec<String>)>);

impl Serialize for CategoriesResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (provider, categories) in &self.0 {
            map.serialize_entry(provider, categories)?;
        }
        map.end()
    }
}

/// Runs an aggregated search.
///
/// # Errors
/// - `ApiError::BadRequest` - Malformed query string, missing term, bad
///   limit or invalid provider
/// - `ApiError::NotFound` - No provider returned results
pub async fn api_search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<AggregateResult>, ApiError> {
    let Query(params) = params?;
    let limit = match params.limit.as_deref() {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ApiError::bad_request("Limit must be a positive integer"))?,
        None => state.default_limit,
    };

    let mut query = SearchQuery::new(params.query.unwrap_or_default())
        .category(
            params
                .category
                .unwrap_or_else(|| state.default_category.clone()),
        )
        .limit(limit);
    if let Some(source) = params.source {
        query = query.source(source);
    }

    let results = state.aggregator.search(&query).await?;
    Ok(Json(results))
}

/// Lists `All` and the enabled providers.
///
/// # Errors
/// - `ApiError::BadRequest` - Malformed query string
pub async fn api_providers(
    State(state): State<AppState>,
    params: Result<Query<PresentationParams>, QueryRejection>,
) -> Result<Json<ProvidersResponse>, ApiError> {
    let Query(params) = params?;
    let lowercase = params.lowercase();
    let providers = std::iter::once(ALL_LABEL)
        .chain(
            state
                .aggregator
                .registry()
                .list_providers()
                .iter()
                .filter(|d| d.enabled)
                .map(|d| d.id.display_name()),
        )
        .map(|name| present(name, lowercase))
        .collect();

    Ok(Json(ProvidersResponse { providers }))
}

/// Lists the categories of every enabled provider.
///
/// # Errors
/// - `ApiError::BadRequest` - Malformed query string
pub async fn api_categories(
    State(state): State<AppState>,
    params: Result<Query<PresentationParams>, QueryRejection>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let Query(params) = params?;
    let lowercase = params.lowercase();
    let registry = state.aggregator.registry();

    let mut categories = Vec::new();
    for descriptor in registry.list_providers().iter().filter(|d| d.enabled) {
        let names = registry
            .categories_for(descriptor.id.as_str())?
            .iter()
            .map(|c| present(c, lowercase))
            .collect();
        categories.push((present(descriptor.id.display_name(), lowercase), names));
    }

    Ok(Json(CategoriesResponse(categories)))
}

/// Health check.
pub async fn api_ping() -> Json<&'static str> {
    Json("pong")
}

/// Plain-text liveness answer on `/`.
pub async fn root() -> &'static str {
    "pong"
}

fn present(name: &str, lowercase: bool) -> String {
    if lowercase {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}
