use std::collections::BTreeSet;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

/// At most this many products side by side.
pub const MAX_COMPARED: usize = 4;

/// Ordered, bounded set of products picked for side-by-side comparison.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareAdd {
    Added,
    AlreadyPresent,
    Full,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.ids.contains(&product_id)
    }

    pub fn add(&mut self, product_id: Uuid) -> CompareAdd {
        if self.contains(product_id) {
            return CompareAdd::AlreadyPresent;
        }
        if self.ids.len() >= MAX_COMPARED {
            return CompareAdd::Full;
        }
        self.ids.push(product_id);
        CompareAdd::Added
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| *id != product_id);
        self.ids.len() < before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// One row of the comparison table: an attribute name and, per compared
/// product, its value (or nothing when the product lacks the attribute).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SpecRow {
    pub name: String,
    pub values: Vec<Option<String>>,
}

/// Build the spec table over the union of all compared products'
/// attribute keys, sorted by name. Column order is the products' order.
pub fn comparison_table(products: &[Product]) -> Vec<SpecRow> {
    let keys: BTreeSet<&String> = products.iter().flat_map(|p| p.specs.keys()).collect();

    keys.into_iter()
        .map(|key| SpecRow {
            name: key.clone(),
            values: products
                .iter()
                .map(|p| p.specs.get(key).cloned())
                .collect(),
        })
        .collect()
}
