use axum::{extract::State, response::Response, routing::get, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    config::ProductListing,
    errors::ApiError,
    handlers::{common::success_response, AppState},
    models::{Catalog, CatalogIndices, Product},
};

/// Catalog dump served to the quoting front end.
#[derive(Debug, Serialize)]
pub struct CatalogListing<'a> {
    pub metadata: &'a Value,
    pub indices: &'a CatalogIndices,
    pub productos: Vec<&'a Product>,
}

impl<'a> CatalogListing<'a> {
    pub fn new(catalog: &'a Catalog, listing: ProductListing) -> Self {
        let productos = match listing {
            ProductListing::Active => catalog.listed_products().collect(),
            ProductListing::All => catalog.productos.iter().collect(),
        };
        Self {
            metadata: &catalog.metadata,
            indices: &catalog.indices,
            productos,
        }
    }
}

async fn list_products(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let catalog = state.store.get_catalog().await.map_err(ApiError::Catalog)?;
    Ok(success_response(CatalogListing::new(
        &catalog,
        state.config.product_listing,
    )))
}

pub fn product_routes() -> Router<Arc<AppState>> {
    Router::new().route("/productos", get(list_products))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        serde_json::from_value(serde_json::json!({
            "metadata": { "total": 3 },
            "indices": { "por_categoria": { "arena": [0, 1] } },
            "productos": [
                { "nombre": "Arena fina", "sku": "A1", "precio": 10, "stock": 1, "activo": true, "visible": true },
                { "nombre": "Arena gruesa", "sku": "A2", "precio": 10, "stock": 1, "activo": true, "visible": false },
                { "nombre": "Cal", "sku": "C1", "precio": 10, "stock": 1, "activo": false, "visible": true }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn active_listing_keeps_only_active_and_visible() {
        let catalog = catalog();
        let listing = CatalogListing::new(&catalog, ProductListing::Active);
        let skus: Vec<&str> = listing.productos.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, ["A1"]);
    }

    #[test]
    fn full_listing_keeps_everything_and_indices() {
        let catalog = catalog();
        let json = serde_json::to_value(CatalogListing::new(&catalog, ProductListing::All)).unwrap();
        assert_eq!(json["productos"].as_array().unwrap().len(), 3);
        assert_eq!(json["metadata"]["total"], 3);
        assert_eq!(json["indices"]["por_categoria"]["arena"], serde_json::json!([0, 1]));
    }
}
