use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ritkart_api::{
    engine::pricing::PricingConfig,
    models::{Category, Product},
    routes::params::{Pagination, ProductQuery, ProductSortBy, SortOrder},
    services::product_service,
    state::AppState,
};

fn product(title: &str, brand: &str, category: &str, price: i64, rating: f32, stock: i32) -> Product {
    Product {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        brand: brand.to_string(),
        category_id: category.to_string(),
        price,
        original_price: None,
        rating,
        review_count: 0,
        stock,
        free_shipping: false,
        specs: BTreeMap::new(),
        is_active: true,
        total_sales: 0,
        created_at: Utc::now(),
    }
}

// A $40 electronics (brand X), B $60 electronics out of stock (brand Y),
// C $20 fashion (brand X).
fn test_state() -> AppState {
    let products = vec![
        product("A", "X", "electronics", 4000, 4.5, 5),
        product("B", "Y", "electronics", 6000, 3.0, 0),
        product("C", "X", "fashion", 2000, 5.0, 10),
    ];
    let categories = vec![
        Category {
            id: "electronics".to_string(),
            name: "Electronics".to_string(),
            is_active: true,
        },
        Category {
            id: "fashion".to_string(),
            name: "Fashion".to_string(),
            is_active: true,
        },
    ];
    AppState::with_catalog(products, categories, PricingConfig::default())
}

fn query() -> ProductQuery {
    ProductQuery {
        pagination: Pagination {
            page: None,
            per_page: None,
        },
        q: None,
        categories: None,
        brands: None,
        min_price: None,
        max_price: None,
        min_rating: None,
        has_discount: None,
        in_stock_only: None,
        free_shipping: None,
        sort_by: None,
        sort_order: None,
    }
}

fn titles(items: &[Product]) -> Vec<String> {
    items.iter().map(|p| p.title.clone()).collect()
}

#[tokio::test]
async fn electronics_in_stock_narrows_to_a() -> anyhow::Result<()> {
    let state = test_state();
    let response = product_service::search_products(
        &state,
        ProductQuery {
            categories: Some("electronics".to_string()),
            ..query()
        },
    )
    .await?;

    let data = response.data.unwrap();
    assert_eq!(titles(&data.items), ["A"]);
    assert_eq!(response.meta.unwrap().total, Some(1));
    assert_eq!(data.active_filters, ["Categories: electronics"]);

    Ok(())
}

#[tokio::test]
async fn default_search_hides_out_of_stock_and_lists_page_brands() -> anyhow::Result<()> {
    let state = test_state();
    let response = product_service::search_products(&state, query()).await?;

    let data = response.data.unwrap();
    assert_eq!(titles(&data.items), ["A", "C"]);
    assert_eq!(data.available_brands, ["X"]);
    assert!(data.active_filters.is_empty());

    Ok(())
}

#[tokio::test]
async fn price_sort_is_applied_before_pagination() -> anyhow::Result<()> {
    let state = test_state();

    let mut all_titles = Vec::new();
    for page in 1..=2 {
        let response = product_service::search_products(
            &state,
            ProductQuery {
                pagination: Pagination {
                    page: Some(page),
                    per_page: Some(2),
                },
                in_stock_only: Some(false),
                sort_by: Some(ProductSortBy::Price),
                sort_order: Some(SortOrder::Asc),
                ..query()
            },
        )
        .await?;

        let meta = response.meta.unwrap();
        assert_eq!(meta.total, Some(3));
        assert_eq!(meta.total_pages, Some(2));
        all_titles.extend(titles(&response.data.unwrap().items));
    }

    assert_eq!(all_titles, ["C", "A", "B"]);

    Ok(())
}

#[tokio::test]
async fn no_matches_is_a_normal_empty_page() -> anyhow::Result<()> {
    let state = test_state();
    let response = product_service::search_products(
        &state,
        ProductQuery {
            q: Some("does-not-exist".to_string()),
            ..query()
        },
    )
    .await?;

    let data = response.data.unwrap();
    assert!(data.items.is_empty());
    assert_eq!(response.meta.unwrap().total, Some(0));

    Ok(())
}

#[tokio::test]
async fn product_detail_and_categories() -> anyhow::Result<()> {
    let state = test_state();
    let catalog = state.catalog.snapshot();
    let first = &catalog[0];

    let detail = product_service::get_product(&state, first.id).await?;
    assert_eq!(detail.data.unwrap().title, "A");

    let missing = product_service::get_product(&state, Uuid::new_v4()).await;
    assert!(missing.is_err());

    let categories = product_service::list_categories(&state).await?.data.unwrap();
    assert_eq!(categories.items.len(), 2);

    Ok(())
}
