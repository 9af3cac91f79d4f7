use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Product};

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchData {
    pub items: Vec<Product>,
    /// Distinct brands on this page, for the brand facet options.
    pub available_brands: Vec<String>,
    /// Removable-chip labels for every non-default facet.
    pub active_filters: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
