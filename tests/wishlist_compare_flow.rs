use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ritkart_api::{
    dto::{compare::AddCompareRequest, wishlist::AddWishlistRequest},
    engine::pricing::PricingConfig,
    error::AppError,
    middleware::session::SessionId,
    models::Product,
    routes::params::Pagination,
    services::{compare_service, wishlist_service},
    state::AppState,
};

fn product(title: &str, specs: &[(&str, &str)]) -> Product {
    Product {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        brand: "Acme".to_string(),
        category_id: "electronics".to_string(),
        price: 1000,
        original_price: None,
        rating: 4.0,
        review_count: 0,
        stock: 5,
        free_shipping: false,
        specs: specs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        is_active: true,
        total_sales: 0,
        created_at: Utc::now(),
    }
}

fn test_state() -> AppState {
    let products = vec![
        product("P1", &[("Color", "Black"), ("Weight", "1 kg")]),
        product("P2", &[("Color", "Silver")]),
        product("P3", &[]),
        product("P4", &[]),
        product("P5", &[]),
    ];
    AppState::with_catalog(products, Vec::new(), PricingConfig::default())
}

fn session() -> SessionId {
    SessionId("test-session".to_string())
}

#[tokio::test]
async fn wishlist_add_is_idempotent() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();
    let first = &catalog[0];

    for _ in 0..2 {
        wishlist_service::add_to_wishlist(
            &state,
            &session,
            AddWishlistRequest {
                product_id: first.id,
            },
        )
        .await?;
    }

    let list = wishlist_service::list_wishlist(
        &state,
        &session,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await?;
    assert_eq!(list.meta.unwrap().total, Some(1));
    assert_eq!(list.data.unwrap().items[0].id, first.id);

    Ok(())
}

#[tokio::test]
async fn wishlist_remove_of_absent_product_is_not_found() {
    let state = test_state();
    let result =
        wishlist_service::remove_from_wishlist(&state, &session(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn comparison_is_capped_at_four() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();

    for product in &catalog[..4] {
        compare_service::add_to_comparison(
            &state,
            &session,
            AddCompareRequest {
                product_id: product.id,
            },
        )
        .await?;
    }

    let fifth = compare_service::add_to_comparison(
        &state,
        &session,
        AddCompareRequest {
            product_id: catalog[4].id,
        },
    )
    .await;
    assert!(matches!(fifth, Err(AppError::BadRequest(_))));

    // Re-adding a member is a no-op success, not a capacity error.
    let re_add = compare_service::add_to_comparison(
        &state,
        &session,
        AddCompareRequest {
            product_id: catalog[0].id,
        },
    )
    .await?;
    assert_eq!(re_add.message, "Product is already in comparison");

    Ok(())
}

#[tokio::test]
async fn comparison_table_unions_spec_keys() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();

    for product in &catalog[..2] {
        compare_service::add_to_comparison(
            &state,
            &session,
            AddCompareRequest {
                product_id: product.id,
            },
        )
        .await?;
    }

    let view = compare_service::view_comparison(&state, &session).await?.data.unwrap();
    assert_eq!(view.products.len(), 2);

    let names: Vec<&str> = view.rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["Color", "Weight"]);
    let weight = &view.rows[1];
    assert_eq!(weight.values[0].as_deref(), Some("1 kg"));
    assert_eq!(weight.values[1], None);

    compare_service::clear_comparison(&state, &session).await?;
    let view = compare_service::view_comparison(&state, &session).await?.data.unwrap();
    assert!(view.products.is_empty());

    Ok(())
}
