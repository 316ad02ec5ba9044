//! Mapping of adapter records into the canonical result schema.
//!
//! Provider differences are expressed as rows of [`NORMALIZATION_RULES`];
//! the mapping code itself never branches on a provider id.

use crate::types::{NormalizedResult, ProviderId, RawTorrent, UNKNOWN};

/// Field of a raw record that can serve as the result's download reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadRef {
    /// Magnet URI synthesized by the adapter
    Magnet,
    /// Direct `.torrent` or detail link
    DirectLink,
}

/// Per-provider normalization behaviour.
#[derive(Debug, Clone, Copy)]
pub struct NormalizationRule {
    /// Provider the rule applies to
    pub provider: ProviderId,
    /// Download reference candidates, most preferred first
    pub download_ref: &'static [DownloadRef],
}

/// One row per provider with an adapter.
pub const NORMALIZATION_RULES: &[NormalizationRule] = &[
    NormalizationRule {
        provider: ProviderId::Yts,
        download_ref: &[DownloadRef::DirectLink, DownloadRef::Magnet],
    },
    NormalizationRule {
        provider: ProviderId::ThePirateBay,
        download_ref: &[DownloadRef::Magnet, DownloadRef::DirectLink],
    },
    NormalizationRule {
        provider: ProviderId::Eztv,
        download_ref: &[DownloadRef::Magnet, DownloadRef::DirectLink],
    },
];

/// Rule for `provider`, if it has one.
pub fn rule_for(provider: ProviderId) -> Option<&'static NormalizationRule> {
    NORMALIZATION_RULES.iter().find(|rule| rule.provider == provider)
}

/// Maps one raw record into the canonical schema.
pub fn normalize(raw: RawTorrent, provider: ProviderId) -> NormalizedResult {
    let url = select_download_ref(&raw, provider).unwrap_or_else(|| UNKNOWN.to_string());

    NormalizedResult {
        provider,
        title: raw.title,
        size: or_unknown(Some(raw.size)),
        time: or_unknown(raw.time),
        url,
        seeds: raw.seeds.render(),
        peers: raw.peers.render(),
        imdb: or_unknown(raw.imdb),
    }
}

/// Maps a provider's records, keeping their order.
pub fn normalize_all(raw: Vec<RawTorrent>, provider: ProviderId) -> Vec<NormalizedResult> {
    raw.into_iter().map(|r| normalize(r, provider)).collect()
}

fn select_download_ref(raw: &RawTorrent, provider: ProviderId) -> Option<String> {
    let rule = rule_for(provider)?;
    rule.download_ref
        .iter()
        .filter_map(|candidate| match candidate {
            DownloadRef::Magnet => raw.magnet.as_deref(),
            DownloadRef::DirectLink => raw.link.as_deref(),
        })
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn or_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}
