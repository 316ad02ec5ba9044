//! CLI command implementations

use clap::Subcommand;
use magnetar_core::{MagnetarConfig, MagnetarError, Result};
use magnetar_search::{Aggregator, ProviderRegistry, SearchQuery};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides MAGNETAR_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides PORT / MAGNETAR_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one aggregated search and print the results as JSON
    Search {
        /// Search term, or an IMDB id for EZTV
        term: String,
        /// Category, e.g. movies or video
        #[arg(short, long)]
        category: Option<String>,
        /// Provider id or "all"
        #[arg(short, long, default_value = "all")]
        source: String,
        /// Maximum results per provider
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List searchable providers
    Providers {
        /// Print ids instead of display names
        #[arg(long)]
        lowercase: bool,
    },
    /// List categories of every enabled provider
    Categories {
        /// Print lowercase names
        #[arg(long)]
        lowercase: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, config: MagnetarConfig) -> Result<()> {
    match command {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Search {
            term,
            category,
            source,
            limit,
        } => search(config, term, category, source, limit).await,
        Commands::Providers { lowercase } => list_providers(&config, lowercase),
        Commands::Categories { lowercase } => list_categories(&config, lowercase),
    }
}

/// Run the HTTP gateway until Ctrl-C
///
/// # Errors
/// - `MagnetarError::Configuration` - Invalid provider configuration
/// - `MagnetarError::Io` - Failed to bind the listener
pub async fn serve(
    mut config: MagnetarConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    magnetar_web::run_server(config).await
}

/// Run one search and print the JSON result map
///
/// # Errors
/// - `MagnetarError::Search` - Invalid query or no results
/// - `MagnetarError::Configuration` - Invalid provider configuration
pub async fn search(
    config: MagnetarConfig,
    term: String,
    category: Option<String>,
    source: String,
    limit: Option<usize>,
) -> Result<()> {
    let aggregator = Aggregator::from_config(&config)?;
    let query = SearchQuery::new(term)
        .category(category.unwrap_or_else(|| config.search.default_category.clone()))
        .source(source)
        .limit(limit.unwrap_or(config.search.default_limit));

    let results = aggregator.search(&query).await?;
    let json = serde_json::to_string_pretty(&results).map_err(|e| MagnetarError::Search {
        reason: format!("failed to encode results: {e}"),
    })?;

    println!("{json}");
    Ok(())
}

/// Print "All" followed by every enabled provider
///
/// # Errors
/// - `MagnetarError::Configuration` - Invalid provider configuration
pub fn list_providers(config: &MagnetarConfig, lowercase: bool) -> Result<()> {
    let registry = ProviderRegistry::from_config(&config.search)?;

    for name in provider_names(&registry, lowercase) {
        println!("{name}");
    }
    Ok(())
}

/// Print the categories of every enabled provider, one provider per line
///
/// # Errors
/// - `MagnetarError::Configuration` - Invalid provider configuration
pub fn list_categories(config: &MagnetarConfig, lowercase: bool) -> Result<()> {
    let registry = ProviderRegistry::from_config(&config.search)?;

    for line in category_lines(&registry, lowercase)? {
        println!("{line}");
    }
    Ok(())
}

fn provider_names(registry: &ProviderRegistry, lowercase: bool) -> Vec<String> {
    let enabled = registry.list_providers().iter().filter(|d| d.enabled);
    std::iter::once("All")
        .chain(enabled.map(|d| d.id.display_name()))
        .map(|name| present(name, lowercase))
        .collect()
}

fn category_lines(registry: &ProviderRegistry, lowercase: bool) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for descriptor in registry.list_providers().iter().filter(|d| d.enabled) {
        let categories = registry.categories_for(descriptor.id.as_str())?;
        let name = descriptor.id.display_name();
        let line = format!("{name}: {}", categories.join(", "));
        lines.push(present(&line, lowercase));
    }
    Ok(lines)
}

fn present(text: &str, lowercase: bool) -> String {
    if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}
