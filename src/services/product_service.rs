use uuid::Uuid;

use crate::{
    dto::products::{CategoryList, SearchData},
    engine::search,
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

pub async fn search_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<SearchData>> {
    let filters = query.into_filters();
    let catalog = state.catalog.snapshot();
    let outcome = search::search(&catalog, &filters);

    let meta = Meta::new(outcome.page, outcome.per_page, outcome.total);
    let data = SearchData {
        items: outcome.items,
        available_brands: outcome.available_brands,
        active_filters: outcome.active_filters,
    };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = state
        .catalog
        .get(id)
        .filter(|p| p.is_active)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.catalog.categories();
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}
