//! Error types for the aggregation engine.

use std::fmt;

use magnetar_core::MagnetarError;
use thiserror::Error;

use crate::types::ProviderId;

/// Errors surfaced to callers of the aggregation engine.
///
/// Provider failures never appear here; they are recovered inside the
/// aggregator and show up as an empty result list for that provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query is unusable (blank term, zero limit).
    #[error("{reason}")]
    InvalidQuery {
        /// Human readable description of what is wrong
        reason: String,
    },

    /// The provider selector names an unknown or disabled provider.
    #[error("Invalid provider: {provider}")]
    InvalidProvider {
        /// The selector as sent by the caller
        provider: String,
    },

    /// The provider id is not part of the registry.
    #[error("Unknown provider: {provider}")]
    UnknownProvider {
        /// The id as sent by the caller
        provider: String,
    },

    /// Every dispatched provider came back empty.
    #[error("No results found")]
    NotFound,

    /// The engine could not be assembled from its configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// The reason for the configuration failure
        reason: String,
    },
}

impl SearchError {
    /// Blank or whitespace-only search term.
    pub fn missing_term() -> Self {
        SearchError::InvalidQuery {
            reason: "Query parameter is required".to_string(),
        }
    }
}

impl From<SearchError> for MagnetarError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::Configuration { reason } => MagnetarError::Configuration { reason },
            other => MagnetarError::Search {
                reason: other.to_string(),
            },
        }
    }
}

/// Classification of a single provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Network failure, timeout or an HTTP error status.
    UpstreamUnavailable,
    /// The upstream served an anti-bot or challenge page instead of data.
    ChallengeBlocked,
    /// The response could not be parsed into the expected shape.
    MalformedResponse,
    /// The upstream signalled "no results" through a sentinel.
    EmptyResult,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::UpstreamUnavailable => write!(f, "upstream unavailable"),
            ProviderErrorKind::ChallengeBlocked => write!(f, "challenge blocked"),
            ProviderErrorKind::MalformedResponse => write!(f, "malformed response"),
            ProviderErrorKind::EmptyResult => write!(f, "empty result"),
        }
    }
}

/// Failure of one provider adapter during a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider} {kind}: {reason}")]
pub struct ProviderError {
    /// Provider that failed
    pub provider: ProviderId,
    /// Failure classification
    pub kind: ProviderErrorKind,
    /// Detail for logs
    pub reason: String,
}

impl ProviderError {
    /// Creates a provider error of the given kind.
    pub fn new(provider: ProviderId, kind: ProviderErrorKind, reason: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            reason: reason.into(),
        }
    }

    /// Network failure, timeout or HTTP error status.
    pub fn unavailable(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::UpstreamUnavailable, reason)
    }

    /// Anti-bot page served instead of data.
    pub fn challenge(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::ChallengeBlocked, reason)
    }

    /// Unparseable or unexpected response.
    pub fn malformed(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::MalformedResponse, reason)
    }

    /// Upstream reported no results through a sentinel value.
    pub fn empty(provider: ProviderId) -> Self {
        Self::new(provider, ProviderErrorKind::EmptyResult, "no results")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchError::missing_term().to_string(),
            "Query parameter is required"
        );
        assert_eq!(SearchError::NotFound.to_string(), "No results found");
        assert_eq!(
            SearchError::InvalidProvider {
                provider: "kat".to_string()
            }
            .to_string(),
            "Invalid provider: kat"
        );

        let error = ProviderError::unavailable(ProviderId::Yts, "timed out after 10s");
        assert_eq!(
            error.to_string(),
            "yts upstream unavailable: timed out after 10s"
        );
    }

    #[test]
    fn test_conversion_to_process_error() {
        let error: MagnetarError = SearchError::NotFound.into();
        assert_eq!(error.user_message(), "No results found");

        let error: MagnetarError = SearchError::Configuration {
            reason: "bad url".to_string(),
        }
        .into();
        assert!(matches!(error, MagnetarError::Configuration { .. }));
    }
}
