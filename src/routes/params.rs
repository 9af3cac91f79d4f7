use serde::Deserialize;
use utoipa::ToSchema;

use crate::engine::search::{SearchFilters, SortBy, SortDir};

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for SortDir {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDir::Asc,
            SortOrder::Desc => SortDir::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    Relevance,
    Price,
    Rating,
    Sales,
    CreatedAt,
}

impl From<ProductSortBy> for SortBy {
    fn from(sort: ProductSortBy) -> Self {
        match sort {
            ProductSortBy::Relevance => SortBy::Relevance,
            ProductSortBy::Price => SortBy::Price,
            ProductSortBy::Rating => SortBy::Rating,
            ProductSortBy::Sales => SortBy::Sales,
            ProductSortBy::CreatedAt => SortBy::CreatedAt,
        }
    }
}

/// Full product search query. Multi-value facets (`categories`, `brands`)
/// arrive comma-separated because the query layer does not parse repeated
/// keys into a Vec. Prices are cents.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub q: Option<String>,
    pub categories: Option<String>,
    pub brands: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_rating: Option<f32>,
    pub has_discount: Option<bool>,
    pub in_stock_only: Option<bool>,
    pub free_shipping: Option<bool>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    /// Lower into engine filters; anything absent keeps the engine default
    /// (notably `in_stock_only`, which defaults to on).
    pub fn into_filters(self) -> SearchFilters {
        let (page, per_page, _) = self.pagination.normalize();
        let defaults = SearchFilters::default();
        SearchFilters {
            query: self.q,
            categories: csv(self.categories),
            brands: csv(self.brands),
            min_price: self.min_price.unwrap_or(defaults.min_price),
            max_price: self.max_price.unwrap_or(defaults.max_price),
            min_rating: self.min_rating.unwrap_or(defaults.min_rating),
            has_discount: self.has_discount.unwrap_or(defaults.has_discount),
            in_stock_only: self.in_stock_only.unwrap_or(defaults.in_stock_only),
            free_shipping: self.free_shipping.unwrap_or(defaults.free_shipping),
            sort_by: self.sort_by.map(Into::into).unwrap_or(defaults.sort_by),
            sort_dir: self.sort_order.map(Into::into).unwrap_or(defaults.sort_dir),
            page,
            per_page,
        }
    }
}

fn csv(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}
