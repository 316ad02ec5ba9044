//! Provider registry.
//!
//! The registry is built once at startup and never mutated. It is the only
//! authority on which provider ids exist, which are enabled and which
//! categories each one understands.

use std::collections::HashSet;

use magnetar_core::SearchConfig;

use crate::errors::SearchError;
use crate::types::{ALL_PROVIDERS, ProviderId};

/// Static description of one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Provider id
    pub id: ProviderId,
    /// Whether searches may be dispatched to it
    pub enabled: bool,
    /// Categories in presentation case, `All` first
    pub supported_categories: Vec<String>,
}

impl ProviderDescriptor {
    /// Creates a descriptor from a static category list.
    pub fn new(id: ProviderId, enabled: bool, categories: &[&str]) -> Self {
        Self {
            id,
            enabled,
            supported_categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Immutable set of provider descriptors.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    descriptors: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Creates a registry from descriptors, keeping their order.
    ///
    /// # Errors
    /// - `SearchError::Configuration` - The same id is described twice
    pub fn new(descriptors: Vec<ProviderDescriptor>) -> Result<Self, SearchError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.id) {
                return Err(SearchError::Configuration {
                    reason: format!("provider '{}' registered twice", descriptor.id),
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// The built-in provider list.
    ///
    /// TorrentProject is known but ships without an adapter, so it stays
    /// disabled.
    pub fn builtin() -> Self {
        Self {
            descriptors: vec![
                ProviderDescriptor::new(ProviderId::Yts, true, &["All", "Movies"]),
                ProviderDescriptor::new(
                    ProviderId::ThePirateBay,
                    true,
                    &[
                        "All",
                        "Audio",
                        "Video",
                        "Applications",
                        "Games",
                        "Porn",
                        "Other",
                    ],
                ),
                ProviderDescriptor::new(ProviderId::Eztv, true, &["All", "TV"]),
                ProviderDescriptor::new(
                    ProviderId::TorrentProject,
                    false,
                    &[
                        "All",
                        "Movies",
                        "TV",
                        "Music",
                        "Games",
                        "Applications",
                        "Books",
                        "Other",
                    ],
                ),
            ],
        }
    }

    /// The built-in list with the enabled set taken from configuration.
    ///
    /// # Errors
    /// - `SearchError::Configuration` - The configured set names an unknown provider
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let mut registry = Self::builtin();

        let Some(enabled) = &config.enabled_providers else {
            return Ok(registry);
        };

        let mut wanted = HashSet::new();
        for raw in enabled {
            let id = raw
                .parse::<ProviderId>()
                .map_err(|_| SearchError::Configuration {
                    reason: format!("unknown provider '{raw}' in enabled provider list"),
                })?;
            wanted.insert(id);
        }

        for descriptor in &mut registry.descriptors {
            descriptor.enabled = wanted.contains(&descriptor.id);
        }

        Ok(registry)
    }

    /// All descriptors in registration order, enabled or not.
    pub fn list_providers(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }

    /// Enabled descriptors in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &ProviderDescriptor> + '_ {
        self.descriptors.iter().filter(|d| d.enabled)
    }

    /// Descriptor for a known id.
    pub fn descriptor(&self, id: ProviderId) -> Option<&ProviderDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Expands a provider selector into the descriptors to dispatch to.
    ///
    /// `"all"` yields every enabled provider; anything else must name an
    /// enabled provider. Matching is case-insensitive.
    ///
    /// # Errors
    /// - `SearchError::InvalidProvider` - Unknown or disabled provider
    pub fn resolve(&self, selector: &str) -> Result<Vec<&ProviderDescriptor>, SearchError> {
        let selector = selector.trim();
        if selector.eq_ignore_ascii_case(ALL_PROVIDERS) {
            return Ok(self.enabled().collect());
        }

        let invalid = || SearchError::InvalidProvider {
            provider: selector.to_string(),
        };

        let id = selector.parse::<ProviderId>().map_err(|_| invalid())?;
        match self.descriptor(id) {
            Some(descriptor) if descriptor.enabled => Ok(vec![descriptor]),
            _ => Err(invalid()),
        }
    }

    /// Categories a provider supports.
    ///
    /// # Errors
    /// - `SearchError::UnknownProvider` - The id is not registered
    pub fn categories_for(&self, id: &str) -> Result<&[String], SearchError> {
        let unknown = || SearchError::UnknownProvider {
            provider: id.to_string(),
        };
        let provider = id.parse::<ProviderId>().map_err(|_| unknown())?;
        self.descriptor(provider)
            .map(|d| d.supported_categories.as_slice())
            .ok_or_else(unknown)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(descriptors: &[&ProviderDescriptor]) -> Vec<ProviderId> {
        descriptors.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_resolve_all_yields_enabled_providers() {
        let registry = ProviderRegistry::builtin();
        let resolved = registry.resolve("ALL").unwrap();
        assert_eq!(
            ids(&resolved),
            vec![ProviderId::Yts, ProviderId::ThePirateBay, ProviderId::Eztv]
        );
    }

    #[test]
    fn test_resolve_single_provider_is_case_insensitive() {
        let registry = ProviderRegistry::builtin();
        let resolved = registry.resolve("ThePirateBay").unwrap();
        assert_eq!(ids(&resolved), vec![ProviderId::ThePirateBay]);
    }

    #[test]
    fn test_resolve_rejects_unknown_and_disabled() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            registry.resolve("kickass").unwrap_err(),
            SearchError::InvalidProvider {
                provider: "kickass".to_string()
            }
        );
        assert!(matches!(
            registry.resolve("torrentproject"),
            Err(SearchError::InvalidProvider { .. })
        ));
        assert!(registry.resolve("").is_err());
    }

    #[test]
    fn test_categories_for() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.categories_for("YTS").unwrap(), ["All", "Movies"]);
        // Disabled providers still describe their categories
        assert!(registry.categories_for("torrentproject").is_ok());
        assert_eq!(
            registry.categories_for("all").unwrap_err(),
            SearchError::UnknownProvider {
                provider: "all".to_string()
            }
        );
    }

    #[test]
    fn test_from_config_overrides_enabled_set() {
        let config = SearchConfig {
            enabled_providers: Some(vec!["thepiratebay".to_string()]),
            ..SearchConfig::default()
        };
        let registry = ProviderRegistry::from_config(&config).unwrap();
        assert_eq!(
            ids(&registry.resolve("all").unwrap()),
            vec![ProviderId::ThePirateBay]
        );
        assert!(registry.resolve("yts").is_err());
        assert_eq!(registry.list_providers().len(), 4);
    }

    #[test]
    fn test_from_config_rejects_unknown_ids() {
        let config = SearchConfig {
            enabled_providers: Some(vec!["rarbg".to_string()]),
            ..SearchConfig::default()
        };
        assert!(matches!(
            ProviderRegistry::from_config(&config),
            Err(SearchError::Configuration { .. })
        ));
    }

    #[test]
    fn test_duplicate_descriptors_rejected() {
        let result = ProviderRegistry::new(vec![
            ProviderDescriptor::new(ProviderId::Yts, true, &["All"]),
            ProviderDescriptor::new(ProviderId::Yts, false, &["All"]),
        ]);
        assert!(matches!(result, Err(SearchError::Configuration { .. })));
    }
}
