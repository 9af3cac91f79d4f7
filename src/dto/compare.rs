use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::compare::SpecRow;
use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCompareRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonView {
    pub products: Vec<Product>,
    /// One row per attribute across the compared products.
    pub rows: Vec<SpecRow>,
}
