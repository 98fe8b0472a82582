use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::auto_reply::auto_reply;
use super::catalog_store::CatalogStore;
use super::completion::{CompletionClient, CompletionRequest};
use super::prompt::{build_messages, build_product_context, build_system_prompt, ChatMessage};
use super::search::{search_with, SearchOptions};
use crate::errors::ServiceError;
use crate::models::Product;

/// Model settings sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: super::completion::DEFAULT_MODEL.to_string(),
            temperature: super::completion::DEFAULT_TEMPERATURE,
            max_tokens: super::completion::DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub respuesta: String,
    pub productos: Vec<Product>,
    pub timestamp: String,
}

impl ChatReply {
    fn new(respuesta: String, productos: Vec<Product>, at: DateTime<Utc>) -> Self {
        Self {
            respuesta,
            productos,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Answers one customer message: canned reply if it matches an intent,
/// otherwise catalog search plus a model completion.
pub struct ChatService {
    store: Arc<CatalogStore>,
    completion: Arc<dyn CompletionClient>,
    search: SearchOptions,
    generation: GenerationSettings,
    products_in_reply: usize,
}

impl ChatService {
    pub fn new(
        store: Arc<CatalogStore>,
        completion: Arc<dyn CompletionClient>,
        search: SearchOptions,
        generation: GenerationSettings,
        products_in_reply: usize,
    ) -> Self {
        Self {
            store,
            completion,
            search,
            generation,
            products_in_reply,
        }
    }

    #[instrument(skip_all, fields(history = history.len()))]
    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply, ServiceError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ServiceError::InvalidRequest("Mensaje requerido".to_string()));
        }
        info!(text = %message, "chat message received");

        let company = self.store.get_company_info().await?;
        if let Some(reply) = auto_reply(message, &company) {
            info!(intent = ?reply.intent, "answered with automatic reply");
            return Ok(ChatReply::new(reply.text, Vec::new(), Utc::now()));
        }

        let catalog = self.store.get_catalog().await?;
        let matches = search_with(message, &catalog, self.search);
        info!(matches = matches.len(), "catalog search done");

        let messages = build_messages(
            build_system_prompt(&company),
            build_product_context(matches.iter().map(|m| m.product)),
            history,
            message,
        );
        let respuesta = self
            .completion
            .complete(CompletionRequest {
                model: self.generation.model.clone(),
                messages,
                temperature: self.generation.temperature,
                max_tokens: self.generation.max_tokens,
            })
            .await?;

        let productos = matches
            .iter()
            .take(self.products_in_reply)
            .map(|m| m.product.clone())
            .collect();
        Ok(ChatReply::new(respuesta, productos, Utc::now()))
    }
}
