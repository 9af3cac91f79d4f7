use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use ritkart_api::{
    dto::{
        cart::{AddToCartRequest, ApplyCouponRequest, SelectionRequest, UpdateCartItemRequest},
        orders::{CheckoutRequest, PayOrderRequest},
    },
    engine::pricing::PricingConfig,
    error::AppError,
    middleware::session::SessionId,
    models::Product,
    services::{cart_service, order_service},
    state::AppState,
};

fn product(title: &str, price: i64, stock: i32) -> Product {
    Product {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        brand: "Acme".to_string(),
        category_id: "electronics".to_string(),
        price,
        original_price: None,
        rating: 4.0,
        review_count: 0,
        stock,
        free_shipping: false,
        specs: BTreeMap::new(),
        is_active: true,
        total_sales: 0,
        created_at: Utc::now(),
    }
}

/// Widget at $30 with stock 10, trinket at $10 with stock 5.
fn test_state() -> AppState {
    let products = vec![product("Widget", 3000, 10), product("Trinket", 1000, 5)];
    AppState::with_catalog(products, Vec::new(), PricingConfig::default())
}

fn session() -> SessionId {
    SessionId("test-session".to_string())
}

// Full flow: add -> coupon -> summary -> checkout -> pay.
#[tokio::test]
async fn checkout_with_coupon_flow() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();
    let widget = &catalog[0];

    // $30 x 2; the new line starts selected.
    let view = cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: widget.id,
            quantity: 2,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(view.items.len(), 1);
    assert!(view.items[0].selected);
    assert_eq!(view.display_subtotal, 6000);

    let coupon = cart_service::apply_coupon(
        &state,
        &session,
        ApplyCouponRequest {
            code: "save10".to_string(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(coupon.accepted);

    let summary = cart_service::summary(&state, &session).await?.data.unwrap();
    assert_eq!(summary.subtotal, 6000);
    assert_eq!(summary.tax, 480);
    assert_eq!(summary.shipping, 0);
    assert_eq!(summary.discount, 1000);
    assert_eq!(summary.total, 5480);

    let checkout = order_service::checkout(
        &state,
        &session,
        CheckoutRequest {
            address: "Somewhere".to_string(),
            payment_method: "cash".to_string(),
        },
    )
    .await?
    .data
    .unwrap();
    let order = checkout.order;
    assert_eq!(order.total, 5480);
    assert_eq!(order.coupon_code.as_deref(), Some("SAVE10"));
    assert_eq!(checkout.items.len(), 1);
    assert_eq!(checkout.items[0].unit_price, 3000);
    assert!(order.invoice_number.starts_with("INV-"));

    // Stock decremented, purchased line gone, coupon consumed.
    assert_eq!(state.catalog.get(widget.id).unwrap().stock, 8);
    let view = cart_service::view_cart(&state, &session).await?.data.unwrap();
    assert!(view.items.is_empty());
    assert!(view.coupon.is_none());

    let paid = order_service::pay_order(
        &state,
        &session,
        order.id,
        PayOrderRequest {
            invoice_number: order.invoice_number.clone(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paid.order.status, "paid");
    assert!(paid.order.paid_at.is_some());

    let double_pay = order_service::pay_order(
        &state,
        &session,
        order.id,
        PayOrderRequest {
            invoice_number: order.invoice_number.clone(),
        },
    )
    .await;
    assert!(matches!(double_pay, Err(AppError::BadRequest(_))));

    Ok(())
}

// $10 x 1 without a coupon pays the flat shipping fee.
#[tokio::test]
async fn small_cart_summary() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();
    let trinket = &catalog[1];

    cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: trinket.id,
            quantity: 1,
        },
    )
    .await?;

    let summary = cart_service::summary(&state, &session).await?.data.unwrap();
    assert_eq!(summary.subtotal, 1000);
    assert_eq!(summary.tax, 80);
    assert_eq!(summary.shipping, 999);
    assert_eq!(summary.discount, 0);
    assert_eq!(summary.total, 2079);

    Ok(())
}

#[tokio::test]
async fn invalid_coupon_keeps_the_valid_one() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();
    let widget = &catalog[0];

    cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: widget.id,
            quantity: 1,
        },
    )
    .await?;

    cart_service::apply_coupon(
        &state,
        &session,
        ApplyCouponRequest {
            code: "SAVE10".to_string(),
        },
    )
    .await?;

    let rejected = cart_service::apply_coupon(
        &state,
        &session,
        ApplyCouponRequest {
            code: "BOGUS".to_string(),
        },
    )
    .await?;
    assert!(!rejected.data.unwrap().accepted);
    assert_eq!(rejected.message, "Invalid coupon code");

    let view = cart_service::view_cart(&state, &session).await?.data.unwrap();
    assert_eq!(view.coupon.unwrap().code, "SAVE10");

    Ok(())
}

#[tokio::test]
async fn checkout_requires_a_selection() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();
    let widget = &catalog[0];

    cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: widget.id,
            quantity: 1,
        },
    )
    .await?;
    cart_service::set_selection(&state, &session, SelectionRequest { selected: false }).await?;

    let result = order_service::checkout(
        &state,
        &session,
        CheckoutRequest {
            address: "Somewhere".to_string(),
            payment_method: "cash".to_string(),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

// Checkout acts on the selection only; the unselected line stays behind.
#[tokio::test]
async fn checkout_leaves_unselected_lines_in_the_cart() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();

    cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: catalog[0].id,
            quantity: 1,
        },
    )
    .await?;
    let view = cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: catalog[1].id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();

    let trinket_line = view
        .items
        .iter()
        .find(|line| line.product.id == catalog[1].id)
        .unwrap()
        .id;
    cart_service::update_cart_item(
        &state,
        &session,
        trinket_line,
        UpdateCartItemRequest {
            quantity: None,
            selected: Some(false),
        },
    )
    .await?;

    let checkout = order_service::checkout(
        &state,
        &session,
        CheckoutRequest {
            address: "Somewhere".to_string(),
            payment_method: "cash".to_string(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(checkout.items.len(), 1);
    assert_eq!(checkout.items[0].product_id, catalog[0].id);

    let view = cart_service::view_cart(&state, &session).await?.data.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product.id, catalog[1].id);

    Ok(())
}

#[tokio::test]
async fn quantity_update_clamps_and_removes() -> anyhow::Result<()> {
    let state = test_state();
    let session = session();
    let catalog = state.catalog.snapshot();
    let trinket = &catalog[1];

    let view = cart_service::add_to_cart(
        &state,
        &session,
        AddToCartRequest {
            product_id: trinket.id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();
    let line = view.items[0].id;

    // Stock is 5; asking for 9 clamps.
    let response = cart_service::update_cart_item(
        &state,
        &session,
        line,
        UpdateCartItemRequest {
            quantity: Some(9),
            selected: None,
        },
    )
    .await?;
    assert_eq!(response.message, "Quantity limited to available stock");
    assert_eq!(response.data.unwrap().items[0].quantity, 5);

    // Zero removes.
    let response = cart_service::update_cart_item(
        &state,
        &session,
        line,
        UpdateCartItemRequest {
            quantity: Some(0),
            selected: None,
        },
    )
    .await?;
    assert!(response.data.unwrap().items.is_empty());

    Ok(())
}

#[tokio::test]
async fn adding_an_unknown_product_is_rejected() {
    let state = test_state();
    let result = cart_service::add_to_cart(
        &state,
        &session(),
        AddToCartRequest {
            product_id: Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

// Sessions are isolated: another session's cart stays empty.
#[tokio::test]
async fn carts_are_per_session() -> anyhow::Result<()> {
    let state = test_state();
    let catalog = state.catalog.snapshot();
    let widget = &catalog[0];

    cart_service::add_to_cart(
        &state,
        &SessionId("alice".to_string()),
        AddToCartRequest {
            product_id: widget.id,
            quantity: 1,
        },
    )
    .await?;

    let view = cart_service::view_cart(&state, &SessionId("bob".to_string()))
        .await?
        .data
        .unwrap();
    assert!(view.items.is_empty());

    Ok(())
}
