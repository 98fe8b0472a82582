//! Keyword search over the in-memory product catalog.
//!
//! A query is tokenized, probed against the category and brand indices, and
//! falls back to scoring every product when the probe finds nothing. Both
//! paths rank candidates with the same [`score_product`] function.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Catalog, IndexEntries, Product};

/// Default number of matches returned by [`search`].
pub const DEFAULT_LIMIT: usize = 10;

/// Tokens with this many characters or fewer are ignored.
const MAX_NOISE_TOKEN_CHARS: usize = 2;

const NAME_WEIGHT: u32 = 3;
const KEYWORD_WEIGHT: u32 = 2;
const CATEGORY_WEIGHT: u32 = 2;
const MATERIAL_WEIGHT: u32 = 1;
const BRAND_WEIGHT: u32 = 1;
const IN_STOCK_BONUS: u32 = 1;

/// What to do with products reached through the index probe that score zero.
///
/// The fallback scan never returns zero-score products; the index probe can,
/// because an index key may match a token that appears in none of the scored
/// fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexHitPolicy {
    /// Keep zero-score index hits; they sort to the bottom.
    #[default]
    KeepZeroScore,
    /// Drop zero-score index hits, same as the fallback scan.
    DropZeroScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
    pub index_hit_policy: IndexHitPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            index_hit_policy: IndexHitPolicy::default(),
        }
    }
}

/// A product and its relevance score for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMatch<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub score: u32,
}

/// Lowercases the query, splits on whitespace and drops noise tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > MAX_NOISE_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

fn contains_token(field: Option<&str>, token: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(token))
}

/// Weighted match score of `product` against already-normalized `tokens`.
///
/// Every token is checked against every field independently, so a token found
/// in both the name and the category adds both weights. Keywords are matched
/// as stored: only the other fields are lowercased.
pub fn score_product(product: &Product, tokens: &[String]) -> u32 {
    let name = product.nombre.to_lowercase();
    let keywords = product.keywords.as_deref().unwrap_or_default();

    let mut score = 0;
    for token in tokens {
        let token = token.as_str();
        if name.contains(token) {
            score += NAME_WEIGHT;
        }
        if keywords.iter().any(|k| k.contains(token)) {
            score += KEYWORD_WEIGHT;
        }
        if contains_token(product.categoria_principal.as_deref(), token) {
            score += CATEGORY_WEIGHT;
        }
        if contains_token(product.material.as_deref(), token) {
            score += MATERIAL_WEIGHT;
        }
        if contains_token(product.marca.as_deref(), token) {
            score += BRAND_WEIGHT;
        }
    }

    if product.in_stock() {
        score += IN_STOCK_BONUS;
    }
    score
}

/// Insertion-ordered set of product positions.
#[derive(Default)]
struct Candidates {
    order: Vec<usize>,
    seen: HashSet<usize>,
}

impl Candidates {
    fn insert(&mut self, position: usize) {
        if self.seen.insert(position) {
            self.order.push(position);
        }
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn probe_index(entries: &IndexEntries, tokens: &[String], candidates: &mut Candidates) {
    for entry in entries.iter() {
        let key = entry.key.to_lowercase();
        if tokens.iter().any(|token| key.contains(token.as_str())) {
            for &position in &entry.positions {
                candidates.insert(position);
            }
        }
    }
}

/// Searches `catalog` for `query` with the default options.
pub fn search<'a>(query: &str, catalog: &'a Catalog) -> Vec<ScoredMatch<'a>> {
    search_with(query, catalog, SearchOptions::default())
}

/// Ranks catalog products for `query`, highest score first.
///
/// Ties keep the order in which candidates were found: index entry order for
/// the probe, catalog order for the fallback scan.
pub fn search_with<'a>(
    query: &str,
    catalog: &'a Catalog,
    options: SearchOptions,
) -> Vec<ScoredMatch<'a>> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut candidates = Candidates::default();
    probe_index(&catalog.indices.por_categoria, &tokens, &mut candidates);
    probe_index(&catalog.indices.por_marca, &tokens, &mut candidates);

    let mut matches: Vec<ScoredMatch<'a>> = if candidates.is_empty() {
        catalog
            .productos
            .iter()
            .map(|product| ScoredMatch {
                product,
                score: score_product(product, &tokens),
            })
            .filter(|m| m.score > 0)
            .collect()
    } else {
        let keep_zero = options.index_hit_policy == IndexHitPolicy::KeepZeroScore;
        candidates
            .order
            .iter()
            .filter_map(|&position| catalog.product(position))
            .map(|product| ScoredMatch {
                product,
                score: score_product(product, &tokens),
            })
            .filter(|m| keep_zero || m.score > 0)
            .collect()
    };

    // `sort_by` is stable, so equal scores keep discovery order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(options.limit);

    tracing::debug!(
        query,
        tokens = tokens.len(),
        results = matches.len(),
        "catalog search finished"
    );
    matches
}
