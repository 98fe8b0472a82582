#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use catalog_chat_api::{
    app_router,
    config::{AppConfig, ProductListing},
    errors::ServiceError,
    services::{
        catalog_store::CatalogStore,
        completion::{CompletionClient, CompletionRequest},
    },
    AppState,
};

pub const MODEL_REPLY: &str = "Te recomiendo el Cemento Loma Negra.";

/// Completion client that records requests and answers with [`MODEL_REPLY`].
#[derive(Default)]
pub struct StubCompletion {
    pub requests: Mutex<Vec<CompletionRequest>>,
    pub fail: bool,
}

impl StubCompletion {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(ServiceError::GenerationFailure("stub failure".into()));
        }
        Ok(MODEL_REPLY.to_string())
    }
}

pub fn sample_catalog() -> Value {
    json!({
        "metadata": { "generado": "2024-05-01", "total_productos": 4 },
        "indices": {
            "por_categoria": {
                "Cementos": [0, 1],
                "Ladrillos": [2]
            },
            "por_marca": {
                "Loma Negra": [0],
                "Avellaneda": [1]
            }
        },
        "productos": [
            {
                "nombre": "Cemento Loma Negra 50kg",
                "sku": "CEM-LN-50",
                "precio": 12500,
                "stock": 40,
                "categoria_principal": "Cementos",
                "marca": "Loma Negra",
                "material": "portland",
                "keywords": ["cemento", "bolsa"],
                "activo": true,
                "visible": true
            },
            {
                "nombre": "Cemento Avellaneda 50kg",
                "sku": "CEM-AV-50",
                "precio": 11800.5,
                "stock": 0,
                "categoria_principal": "Cementos",
                "marca": "Avellaneda",
                "activo": true,
                "visible": true
            },
            {
                "nombre": "Ladrillo hueco 12x18x33",
                "sku": "LAD-12",
                "precio": 450,
                "stock": 1200,
                "categoria_principal": "Ladrillos",
                "material": "cerámico",
                "medidas": "12x18x33",
                "activo": true,
                "visible": false
            },
            {
                "nombre": "Arena fina por m3",
                "sku": "ARE-F",
                "precio": 38000,
                "stock": 0,
                "categoria_principal": "Áridos",
                "activo": false,
                "visible": true
            }
        ]
    })
}

pub fn sample_company() -> Value {
    json!({
        "empresa": {
            "nombre_completo": "Corralón Ejemplo S.A.",
            "slogan": "Todo para la obra",
            "historia": "Desde 1974 abasteciendo obras en Concordia."
        },
        "contacto": {
            "telefono": { "formateado": "(0345) 427-3333" },
            "whatsapp": {
                "numero": "+54 9 345 417 8310",
                "link": "https://wa.me/5493454178310",
                "mensaje_predeterminado": "Hola, quiero hacer una consulta"
            },
            "email": { "ventas": "ventas@example.com" }
        },
        "ubicacion": {
            "direccion": { "completa": "Monseñor Tavella 1234, Concordia, Entre Ríos" },
            "google_maps": { "link": "https://maps.example.com/corralon" }
        },
        "horarios": { "descripcion": "Lunes a Viernes 07.30 a 19.00hs, Sábados 08 a 12.30hs" },
        "metodos_pago": { "descripcion": "Efectivo, débito, crédito y transferencia" },
        "envios": {
            "disponible": true,
            "zona_cobertura": "Concordia y zona",
            "retiro_sucursal": { "disponible": true }
        },
        "informacion_adicional": { "especialidades": ["Construcción en seco", "Sanitarios"] },
        "redes_sociales": { "facebook": "corralon", "instagram": "@corralon" }
    })
}

/// Knobs for [`TestApp::with_options`].
pub struct TestOptions {
    pub listing: ProductListing,
    pub completion: Arc<StubCompletion>,
    pub catalog: Option<Value>,
    pub company: Option<Value>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            listing: ProductListing::Active,
            completion: Arc::new(StubCompletion::default()),
            catalog: Some(sample_catalog()),
            company: Some(sample_company()),
        }
    }
}

/// Router over fixture files in a temporary data directory.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    pub completion: Arc<StubCompletion>,
    data_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(TestOptions::default())
    }

    pub fn with_options(options: TestOptions) -> Self {
        let data_dir = TempDir::new().expect("failed to create data dir");

        let config = AppConfig {
            data_dir: data_dir.path().to_path_buf(),
            environment: "test".to_string(),
            product_listing: options.listing,
            ..AppConfig::default()
        };

        let app = Self::assemble(config, data_dir, options.completion);
        if let Some(catalog) = &options.catalog {
            app.write_catalog(catalog);
        }
        if let Some(company) = &options.company {
            app.write_company(company);
        }
        app
    }

    fn assemble(config: AppConfig, data_dir: TempDir, completion: Arc<StubCompletion>) -> Self {
        let store = Arc::new(CatalogStore::from_files(
            config.catalog_path(),
            config.company_path(),
        ));
        let state = Arc::new(AppState::new(config, store, completion.clone()));
        Self {
            router: app_router(state.clone()),
            state,
            completion,
            data_dir,
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.state.config.catalog_path()
    }

    pub fn company_path(&self) -> PathBuf {
        self.state.config.company_path()
    }

    pub fn write_catalog(&self, catalog: &Value) {
        std::fs::write(self.catalog_path(), catalog.to_string()).expect("failed to write catalog");
    }

    pub fn write_company(&self, company: &Value) {
        std::fs::write(self.company_path(), company.to_string()).expect("failed to write company");
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    /// Send a request with a raw body and explicit content type.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &str,
    ) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}
