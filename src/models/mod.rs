//! Documents loaded from the data directory.
//!
//! Both documents are parsed wholesale and checked before they are cached, so
//! the rest of the crate never sees a half-valid catalog.

pub mod catalog;
pub mod company;

pub use catalog::{Catalog, CatalogIndices, IndexEntries, IndexEntry, Product};
pub use company::CompanyInfo;

use crate::errors::ServiceError;
use serde::de::DeserializeOwned;

/// A JSON document that can be loaded by a [`crate::cache::DocumentSource`].
pub trait Document: DeserializeOwned + Send + Sync + 'static {
    /// Human readable name used in logs and error messages.
    const KIND: &'static str;

    /// Checks invariants serde cannot express.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    fn parse(bytes: &[u8]) -> Result<Self, ServiceError> {
        let doc: Self = serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::data_unavailable(Self::KIND, e))?;
        doc.check()
            .map_err(|e| ServiceError::data_unavailable(Self::KIND, e))?;
        Ok(doc)
    }
}
