use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error envelope returned by every endpoint.
///
/// The field names are part of the public contract consumed by the chat
/// widget, so they stay in Spanish.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, user-facing description of what failed
    pub error: String,
    /// Additional detail, only sent by the chat endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalles: Option<String>,
    /// Empty product list kept for clients that always read `productos`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub productos: Option<Vec<serde_json::Value>>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Catalog or company document missing, unreadable or failing validation
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The completion service call failed
    #[error("Generation failure: {0}")]
    GenerationFailure(String),
}

impl ServiceError {
    pub fn data_unavailable(context: &str, err: impl std::fmt::Display) -> Self {
        ServiceError::DataUnavailable(format!("{context}: {err}"))
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::DataUnavailable(_) | Self::GenerationFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DataUnavailable(_) => "Datos no disponibles".to_string(),
            Self::GenerationFailure(_) => "Error al generar respuesta".to_string(),
            Self::InvalidRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let err = ErrorResponse {
            error: self.response_message(),
            detalles: None,
            productos: None,
            request_id: current_request_id(),
        };

        (status, Json(err)).into_response()
    }
}

/// HTTP-facing error: a [`ServiceError`] tagged with the endpoint that raised
/// it, so each route keeps its own envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Chat error: {0}")]
    Chat(ServiceError),

    #[error("Catalog error: {0}")]
    Catalog(ServiceError),

    #[error("Company info error: {0}")]
    Company(ServiceError),
}

impl ApiError {
    fn source_error(&self) -> &ServiceError {
        match self {
            ApiError::Chat(e) | ApiError::Catalog(e) | ApiError::Company(e) => e,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.source_error().status_code()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let inner = self.source_error();

        // Logged with full detail; the body only carries the generic message.
        if status.is_server_error() {
            error!(error = %inner, "{}", self);
        }

        let mut body = ErrorResponse {
            error: String::new(),
            detalles: None,
            productos: None,
            request_id: current_request_id(),
        };

        match &self {
            ApiError::Chat(ServiceError::InvalidRequest(msg)) => {
                body.error = msg.clone();
            }
            ApiError::Chat(e) => {
                body.error = "Error al procesar mensaje".to_string();
                body.detalles = Some(e.response_message());
            }
            ApiError::Catalog(_) => {
                body.error = "Error al cargar productos".to_string();
                body.productos = Some(Vec::new());
            }
            ApiError::Company(_) => {
                body.error = "Error al cargar información".to_string();
            }
        }

        (status, Json(body)).into_response()
    }
}
