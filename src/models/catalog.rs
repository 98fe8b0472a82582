use rust_decimal::Decimal;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};
use std::fmt;
use validator::{Validate, ValidationError};

use super::Document;

/// A sellable product. Its identity is its position in [`Catalog::productos`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1, message = "nombre cannot be empty"))]
    pub nombre: String,

    #[validate(length(min = 1, message = "sku cannot be empty"))]
    pub sku: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_price")]
    pub precio: Decimal,

    pub stock: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria_principal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medidas: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default)]
    pub activo: bool,

    #[serde(default)]
    pub visible: bool,

    /// Fields this service does not interpret, kept for the raw catalog dump.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn is_listed(&self) -> bool {
        self.activo && self.visible
    }
}

fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("precio must be non-negative"));
    }
    Ok(())
}

/// One `name -> [positions]` entry of a precomputed index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub positions: Vec<usize>,
}

/// Index entries in source-document order.
///
/// Order matters: the search engine collects candidates in the order the
/// entries appear, and ties in score keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntries(Vec<IndexEntry>);

impl IndexEntries {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for IndexEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.key, &entry.positions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IndexEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = IndexEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to product positions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, positions)) = access.next_entry::<String, Vec<usize>>()? {
                    entries.push(IndexEntry { key, positions });
                }
                Ok(IndexEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogIndices {
    #[serde(default)]
    pub por_categoria: IndexEntries,
    #[serde(default)]
    pub por_marca: IndexEntries,
}

/// Product catalog as stored in `productos.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub indices: CatalogIndices,
    pub productos: Vec<Product>,
}

impl Catalog {
    pub fn product(&self, position: usize) -> Option<&Product> {
        self.productos.get(position)
    }

    pub fn len(&self) -> usize {
        self.productos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productos.is_empty()
    }

    /// Products that are both active and visible, in catalog order.
    pub fn listed_products(&self) -> impl Iterator<Item = &Product> {
        self.productos.iter().filter(|p| p.is_listed())
    }
}

impl Document for Catalog {
    const KIND: &'static str = "product catalog";

    fn check(&self) -> Result<(), String> {
        for (position, product) in self.productos.iter().enumerate() {
            product
                .validate()
                .map_err(|e| format!("product #{position} ({}): {e}", product.sku))?;
        }

        let indices = [
            ("por_categoria", &self.indices.por_categoria),
            ("por_marca", &self.indices.por_marca),
        ];
        for (name, entries) in indices {
            for entry in entries.iter() {
                if let Some(bad) = entry.positions.iter().find(|&&p| p >= self.len()) {
                    return Err(format!(
                        "index {name}[{:?}] references product #{bad} but the catalog has {} products",
                        entry.key,
                        self.len()
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use assert_matches::assert_matches;

    fn dec_str(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    const SAMPLE: &str = r#"{
        "metadata": { "version": "2024-05" },
        "indices": {
            "por_categoria": { "cemento": [0], "ladrillos": [1] },
            "por_marca": { "Loma Negra": [0] }
        },
        "productos": [
            {
                "nombre": "Cemento Loma Negra 50kg",
                "sku": "CEM-001",
                "precio": 12500,
                "stock": 40,
                "categoria_principal": "cemento",
                "marca": "Loma Negra",
                "keywords": ["cemento", "portland"],
                "activo": true,
                "visible": true,
                "imagen": "cemento.jpg"
            },
            {
                "nombre": "Ladrillo hueco 12x18x33",
                "sku": "LAD-012",
                "precio": 450.5,
                "stock": 0,
                "categoria_principal": "ladrillos",
                "material": "ceramico"
            }
        ]
    }"#;

    #[test]
    fn parses_sample_catalog() {
        let catalog = Catalog::parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.productos[0].precio, dec_str("12500"));
        assert_eq!(catalog.productos[1].precio, dec_str("450.5"));
        assert!(catalog.productos[0].in_stock());
        assert!(!catalog.productos[1].in_stock());
        assert_eq!(catalog.productos[0].extra["imagen"], "cemento.jpg");
        assert_eq!(catalog.indices.por_categoria.len(), 2);
    }

    #[test]
    fn index_entries_keep_document_order() {
        let json = r#"{ "zeta": [2], "alfa": [0, 1], "medio": [] }"#;
        let entries: IndexEntries = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["zeta", "alfa", "medio"]);

        let back = serde_json::to_string(&entries).unwrap();
        assert_eq!(back, r#"{"zeta":[2],"alfa":[0,1],"medio":[]}"#);
    }

    #[test]
    fn flags_default_to_hidden() {
        let catalog = Catalog::parse(SAMPLE.as_bytes()).unwrap();
        let listed: Vec<&str> = catalog.listed_products().map(|p| p.sku.as_str()).collect();
        assert_eq!(listed, ["CEM-001"]);
    }

    #[test]
    fn missing_required_field_is_data_unavailable() {
        let json = r#"{ "productos": [ { "nombre": "Arena", "precio": 10, "stock": 1 } ] }"#;
        assert_matches!(
            Catalog::parse(json.as_bytes()),
            Err(ServiceError::DataUnavailable(msg)) if msg.contains("sku")
        );
    }

    #[test]
    fn negative_stock_is_rejected() {
        let json = r#"{ "productos": [ { "nombre": "Arena", "sku": "A", "precio": 10, "stock": -3 } ] }"#;
        assert_matches!(
            Catalog::parse(json.as_bytes()),
            Err(ServiceError::DataUnavailable(_))
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let json = r#"{ "productos": [ { "nombre": "Arena", "sku": "A", "precio": -1, "stock": 3 } ] }"#;
        assert_matches!(
            Catalog::parse(json.as_bytes()),
            Err(ServiceError::DataUnavailable(_))
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let json = r#"{ "productos": [ { "nombre": "", "sku": "A", "precio": 1, "stock": 3 } ] }"#;
        assert_matches!(
            Catalog::parse(json.as_bytes()),
            Err(ServiceError::DataUnavailable(_))
        );
    }

    #[test]
    fn dangling_index_position_is_rejected() {
        let json = r#"{
            "indices": { "por_marca": { "Acme": [0, 7] } },
            "productos": [ { "nombre": "Arena", "sku": "A", "precio": 1, "stock": 3 } ]
        }"#;
        assert_matches!(
            Catalog::parse(json.as_bytes()),
            Err(ServiceError::DataUnavailable(msg)) if msg.contains("#7")
        );
    }

    #[test]
    fn malformed_json_is_data_unavailable() {
        assert_matches!(
            Catalog::parse(b"{ not json"),
            Err(ServiceError::DataUnavailable(_))
        );
    }

    #[test]
    fn catalog_without_indices_is_valid() {
        let json = r#"{ "productos": [] }"#;
        let catalog = Catalog::parse(json.as_bytes()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.indices.por_categoria.is_empty());
        assert_eq!(catalog.metadata, Value::Null);
    }
}
