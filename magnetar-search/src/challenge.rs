//! Anti-bot challenge detection.
//!
//! Index sites sitting behind Cloudflare and similar services answer
//! automated clients with an interstitial HTML page instead of the data
//! that was asked for. Recognising those pages is heuristic, so the
//! signatures are an explicit pattern set that configuration can extend.

use regex::RegexSet;

use crate::errors::{ProviderError, SearchError};
use crate::types::ProviderId;

/// Built-in challenge page signatures (regular expressions).
pub const DEFAULT_CHALLENGE_PATTERNS: &[&str] = &[
    r"Enable JavaScript and cookies",
    r"(?i)<!DOCTYPE html>",
    r"Just a moment",
    r"cf-browser-verification",
    r"Attention Required!",
];

/// Compiled set of challenge page signatures.
#[derive(Debug, Clone)]
pub struct ChallengeSignatures {
    patterns: Vec<String>,
    set: RegexSet,
}

impl ChallengeSignatures {
    /// Builds the built-in signature set extended with `extra` patterns.
    ///
    /// # Errors
    /// - `SearchError::Configuration` - A pattern is not a valid regular expression
    pub fn with_extra_patterns(extra: &[String]) -> Result<Self, SearchError> {
        let patterns: Vec<String> = DEFAULT_CHALLENGE_PATTERNS
            .iter()
            .map(|pattern| pattern.to_string())
            .chain(extra.iter().cloned())
            .collect();

        let set = RegexSet::new(&patterns).map_err(|e| SearchError::Configuration {
            reason: format!("invalid challenge pattern: {e}"),
        })?;

        Ok(Self { patterns, set })
    }

    /// All patterns in the set, built-in ones first.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// First pattern matching `body`, if any.
    pub fn matching_pattern(&self, body: &str) -> Option<&str> {
        self.set
            .matches(body)
            .into_iter()
            .next()
            .map(|index| self.patterns[index].as_str())
    }

    /// Classifies an upstream response before its body is parsed as JSON.
    ///
    /// A body that already looks like JSON on a successful status is never
    /// treated as a challenge, so result titles cannot trigger a false match.
    ///
    /// # Errors
    /// - `ProviderErrorKind::ChallengeBlocked` - Signature match, or HTML where JSON was expected
    /// - `ProviderErrorKind::UpstreamUnavailable` - Any other non-success status
    pub fn classify(
        &self,
        provider: ProviderId,
        status: u16,
        body: &str,
    ) -> Result<(), ProviderError> {
        let trimmed = body.trim_start();
        let success = (200..300).contains(&status);
        let looks_like_json = trimmed.starts_with('[') || trimmed.starts_with('{');

        if success && looks_like_json {
            return Ok(());
        }

        if let Some(pattern) = self.matching_pattern(body) {
            return Err(ProviderError::challenge(
                provider,
                format!("HTTP {status}, body matches challenge signature '{pattern}'"),
            ));
        }

        if !success {
            return Err(ProviderError::unavailable(provider, format!("HTTP {status}")));
        }

        if trimmed.starts_with('<') {
            return Err(ProviderError::challenge(
                provider,
                "HTML document where structured data was expected",
            ));
        }

        Ok(())
    }
}
