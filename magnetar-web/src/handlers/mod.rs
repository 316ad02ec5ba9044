//! HTTP request handlers

pub mod api;

// Re-export handler functions
pub use api::{
    CategoriesResponse, PresentationParams, ProvidersResponse, SearchParams, api_categories,
    api_ping, api_providers, api_search, root,
};
