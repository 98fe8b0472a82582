//! Catalog Chat API Library
//!
//! Customer chat backend for a construction-materials store: product search
//! over a JSON catalog, canned answers about the business, and model-written
//! replies for everything else.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod cache;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod services;
pub mod tracing;

use axum::Router;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::services::{
    catalog_store::CatalogStore,
    chat::{ChatService, GenerationSettings},
    completion::{CompletionClient, OpenAiCompletionClient},
    search::SearchOptions,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<CatalogStore>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    /// Wires the chat service to an existing store and completion client.
    pub fn new(
        config: AppConfig,
        store: Arc<CatalogStore>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        let chat = ChatService::new(
            store.clone(),
            completion,
            SearchOptions {
                limit: config.search.limit,
                index_hit_policy: config.search.index_hit_policy,
            },
            GenerationSettings {
                model: config.completion.model.clone(),
                temperature: config.completion.temperature,
                max_tokens: config.completion.max_tokens,
            },
            config.chat.products_in_response,
        );
        Self {
            config: Arc::new(config),
            store,
            chat: Arc::new(chat),
        }
    }

    /// Builds the file-backed store and the OpenAI-compatible client from config.
    pub fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let store = Arc::new(CatalogStore::from_files(
            config.catalog_path(),
            config.company_path(),
        ));

        let api_key = config.completion.api_key.clone().unwrap_or_default();
        if api_key.is_empty() {
            ::tracing::warn!("no completion API key configured; product questions will fail");
        }
        let completion = Arc::new(OpenAiCompletionClient::new(
            &config.completion.base_url,
            api_key,
            config.completion.timeout(),
        )?);

        Ok(Self::new(config, store, completion))
    }
}

/// All HTTP routes with tracing and request ids applied.
///
/// CORS and compression are left to the binary.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(handlers::chat::chat_routes())
        .merge(handlers::products::product_routes())
        .merge(handlers::company::company_routes());

    Router::new()
        .nest("/api", api)
        .nest("/health", handlers::health::health_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
