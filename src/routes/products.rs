use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{CategoryList, SearchData},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_products))
        .route("/{id}", get(get_product))
}

pub fn category_router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Free-text query over title and brand"),
        ("categories" = Option<String>, Query, description = "Comma-separated category slugs"),
        ("brands" = Option<String>, Query, description = "Comma-separated brand names"),
        ("min_price" = Option<i64>, Query, description = "Minimum price in cents"),
        ("max_price" = Option<i64>, Query, description = "Maximum price in cents"),
        ("min_rating" = Option<f32>, Query, description = "Minimum rating tier"),
        ("has_discount" = Option<bool>, Query, description = "Only discounted products"),
        ("in_stock_only" = Option<bool>, Query, description = "Hide out-of-stock products, default true"),
        ("free_shipping" = Option<bool>, Query, description = "Only free-shipping products"),
        ("sort_by" = Option<String>, Query, description = "relevance | price | rating | sales | created_at"),
        ("sort_order" = Option<String>, Query, description = "asc | desc"),
    ),
    responses(
        (status = 200, description = "Filtered, sorted product page", body = ApiResponse<SearchData>)
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<SearchData>>> {
    let response = product_service::search_products(&state, query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let response = product_service::get_product(&state, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Active categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Products"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let response = product_service::list_categories(&state).await?;
    Ok(Json(response))
}
